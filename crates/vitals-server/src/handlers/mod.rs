//! HTTP request handlers
//!
//! Each submodule contains handlers for a specific API area.

pub mod reason;
pub mod status;

// Re-export all handlers for use in router
pub use reason::*;
pub use status::*;
