/// Displays an answer document to the user.
///
/// The contract is "render and return nothing": a renderer that cannot
/// write (closed stdout, broken pipe) drops the output.
pub trait Renderer: Send + Sync {
    fn render(&self, markdown: &str);
}
