//! # Domain Layer
//!
//! Questions, answers, client configuration and the error taxonomy.
//! This layer is independent of HTTP and terminal concerns.

pub mod error;
pub mod models;

pub use error::*;
pub use models::*;
