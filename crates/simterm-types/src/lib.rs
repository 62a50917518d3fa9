//! Foundation types and traits for simterm.
//!
//! This crate contains the platform-agnostic types shared by all simterm
//! crates: key events, the display backend trait, configuration, and error
//! types.

pub mod backend;
pub mod config;
pub mod error;
pub mod input;
