//! Infrastructure layer providing external service integrations.
//!
//! This module contains implementations for external concerns like
//! state persistence and system clipboard access.

pub mod persistence;
pub mod clipboard;

pub use persistence::*;
pub use clipboard::*;
