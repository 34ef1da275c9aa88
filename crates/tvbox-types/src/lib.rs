//! Foundation types for the TV Box launcher.
//!
//! This crate contains the platform-agnostic types shared by all launcher
//! crates: key events, the TOML runtime configuration, and error types.

pub mod config;
pub mod error;
pub mod input;
