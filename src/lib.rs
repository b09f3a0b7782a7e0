//! VARCALC - Variable Calculator Library
//!
//! A terminal calculator notebook with named variables and multiple sheets, built in Rust.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
