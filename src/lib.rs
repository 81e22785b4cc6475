//! Biblio application library
//!
//! Composes the resource modules served by the biblio HTTP service.

pub mod modules;

/// Re-export commonly used types
pub use modules::*;
