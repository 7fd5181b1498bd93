//! Infrastructure layer - External systems integration
//!
//! - Database connection and migrations
//! - Repositories over the relational store
//! - Unit of Work for transaction management
//! - Adapters for geocoding, places, email, SMS, speech and chat services

pub mod clients;
pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use clients::{
    Adapters, ChatResponder, ClientError, EmailSender, Geocoder, Place, PlacesLookup, SmsSender,
    Transcriber,
};
pub use db::{Database, Migrator};
pub use repositories::{
    AccountRepository, CalendarRepository, FeedbackRepository, GigRepository, MessageRepository,
    StatsRepository, WalletRepository,
};
pub use unit_of_work::{Persistence, TransactionContext, UnitOfWork};
