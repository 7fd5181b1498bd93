//! CLI module - Command-line interface for the application.
//!
//! - `serve` - Start the HTTP server
//! - `migrate` - Database migrations
//! - `create-manager` - Create a staff manager account

pub mod args;

pub use args::{Cli, Commands};
