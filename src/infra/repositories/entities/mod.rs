//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.
//! Enumerations are stored as lowercase text and parsed on the way out.

use std::str::FromStr;

use crate::errors::{AppError, AppResult};

pub mod bank_account;
pub mod cupid;
pub mod dater;
pub mod feedback;
pub mod gig;
pub mod ledger_entry;
pub mod message;
pub mod outing;
pub mod payment_card;
pub mod quest;
pub mod session;
pub mod user;

/// Parse a text column into its domain enum, treating bad values as corruption.
pub(crate) fn parse_column<T>(value: &str, column: &'static str) -> AppResult<T>
where
    T: FromStr<Err = AppError>,
{
    T::from_str(value)
        .map_err(|_| AppError::internal(format!("unexpected value {:?} in column {}", value, column)))
}
