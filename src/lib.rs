//! Cupid Concierge - backend for a dating-concierge marketplace
//!
//! Daters request gigs (errands that help a date go well), cupids claim and
//! fulfil them, and managers watch the platform. Around that core sit
//! ratings, an assistant chat, voice intake, a small wallet and a calendar.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and rules
//! - **services**: Application use cases, each taking the caller's `Principal`
//! - **infra**: Database, repositories, Unit of Work and external service adapters
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared request and response types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Create a manager
//! cargo run -- create-manager --username boss --email boss@example.com
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Principal, User, UserRole};
pub use errors::{AppError, AppResult};
