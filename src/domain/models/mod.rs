mod client_config;
mod exchange;

pub use client_config::*;
pub use exchange::*;
