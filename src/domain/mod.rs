//! Domain layer - Core business entities and logic
//!
//! The marketplace vocabulary: accounts and their role profiles, gigs and the
//! quests they carry, feedback, chat messages, wallet instruments, scheduled
//! dates. Nothing in here touches the database or the network.

/// Implements `as_str`, `Display` and `FromStr` for a fieldless enum that is
/// stored as text.
macro_rules! text_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::errors::AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err($crate::errors::AppError::validation(format!(
                        "invalid {}: {}",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }
    };
}

pub mod feedback;
pub mod geo;
pub mod gig;
pub mod message;
pub mod outing;
pub mod password;
pub mod principal;
pub mod profile;
pub mod user;
pub mod wallet;

pub use feedback::{average_rating, Feedback, NewFeedback, RatingTarget};
pub use geo::GeoPoint;
pub use gig::{DropPolicy, Gig, GigStatus, NewQuest, Quest};
pub use message::Message;
pub use outing::{NewOuting, Outing, OutingStatus};
pub use password::Password;
pub use principal::Principal;
pub use profile::{
    Account, AccountResponse, CommunicationPreference, CupidProfile, CupidProfileInput, CupidStatus,
    DaterProfile, DaterProfileInput, Profile,
};
pub use user::{NewUser, User, UserRole};
pub use wallet::{BankAccount, LedgerEntry, LedgerKind, NewBankAccount, NewCard, PaymentCard};
