//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`cache`] - Speed limit store management (stats, prune, clear)
//! - [`resolve`] - Annotate a track file with speed limits

pub mod cache;
pub mod common;
pub mod resolve;
