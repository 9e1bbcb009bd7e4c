use std::io::{self, Write};

use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::{as_24_bit_terminal_escaped, LinesWithEndings};
use tracing::{debug, warn};

use crate::application::Renderer;

pub const DEFAULT_THEME: &str = "base16-ocean.dark";
const RESET: &str = "\x1b[0m";

/// Writes answers to stdout, highlighting them as Markdown.
///
/// Highlighting uses syntect's bundled Markdown grammar and themes. When no
/// theme is loaded (plain mode, or an unknown theme name) or highlighting
/// fails, the text is written unchanged.
pub struct TerminalRenderer {
    syntaxes: SyntaxSet,
    theme: Option<Theme>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::with_theme(DEFAULT_THEME)
    }

    pub fn with_theme(name: &str) -> Self {
        let mut themes = ThemeSet::load_defaults();
        let theme = themes.themes.remove(name);
        if theme.is_none() {
            warn!("Unknown theme '{name}', rendering plain text");
        }
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            theme,
        }
    }

    pub fn plain() -> Self {
        Self {
            syntaxes: SyntaxSet::new(),
            theme: None,
        }
    }

    pub fn is_plain(&self) -> bool {
        self.theme.is_none()
    }

    fn highlight(&self, markdown: &str) -> Option<String> {
        let theme = self.theme.as_ref()?;
        let syntax = self
            .syntaxes
            .find_syntax_by_extension("md")
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut out = String::with_capacity(markdown.len() * 2);
        for line in LinesWithEndings::from(markdown) {
            let ranges = match highlighter.highlight_line(line, &self.syntaxes) {
                Ok(ranges) => ranges,
                Err(e) => {
                    debug!("Highlighting failed, falling back to plain text: {e}");
                    return None;
                }
            };
            out.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
        }
        out.push_str(RESET);
        Some(out)
    }

    pub fn render_to<W: Write>(&self, markdown: &str, out: &mut W) -> io::Result<()> {
        match self.highlight(markdown) {
            Some(highlighted) => out.write_all(highlighted.as_bytes())?,
            None => out.write_all(markdown.as_bytes())?,
        }
        if !markdown.ends_with('\n') {
            out.write_all(b"\n")?;
        }
        out.flush()
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for TerminalRenderer {
    fn render(&self, markdown: &str) {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        if let Err(e) = self.render_to(markdown, &mut lock) {
            debug!("Could not write answer to stdout: {e}");
        }
    }
}
