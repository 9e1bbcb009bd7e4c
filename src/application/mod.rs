//! # Application Layer
//!
//! The ask-and-render use case and the traits it is wired through.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
