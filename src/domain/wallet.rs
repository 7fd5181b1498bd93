//! Payment instruments and the cupid-cash ledger.
//!
//! Card numbers and CVVs are checked on the way in and never kept; only the
//! last four digits are stored.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::errors::{AppError, AppResult};

static CARD_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{13,19}$").expect("card pattern is valid"));
static CVV_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{3,4}$").expect("cvv pattern is valid"));
static EXPIRATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0[1-9]|1[0-2])/\d{2}$").expect("expiration pattern is valid"));
static ROUTING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{9}$").expect("routing pattern is valid"));
static ACCOUNT_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4,17}$").expect("account pattern is valid"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PaymentCard {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name_on_card: String,
    pub last_four: String,
    /// `MM/YY`
    pub expiration: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BankAccount {
    pub id: Uuid,
    pub user_id: Uuid,
    pub routing_number: String,
    pub account_last_four: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LedgerKind {
    /// Card charge credited to a dater's balance
    Deposit,
    /// Cupid balance sent to their bank account
    Payout,
}

text_enum!(LedgerKind {
    Deposit => "deposit",
    Payout => "payout",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: LedgerKind,
    pub amount_cents: i64,
    /// Card for deposits, bank account for payouts
    pub instrument_id: Uuid,
    pub idempotency_key: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewCard {
    #[validate(length(min = 1, max = 255, message = "Name on card is required"))]
    pub name_on_card: String,
    #[validate(regex(path = *CARD_NUMBER_RE, message = "Card number must be 13 to 19 digits"))]
    #[schema(example = "4242424242424242")]
    pub card_number: String,
    #[validate(regex(path = *CVV_RE, message = "CVV must be 3 or 4 digits"))]
    #[schema(example = "123")]
    pub cvv: String,
    #[validate(regex(path = *EXPIRATION_RE, message = "Expiration must be MM/YY"))]
    #[schema(example = "12/29")]
    pub expiration: String,
}

impl NewCard {
    pub fn last_four(&self) -> String {
        last_four(&self.card_number)
    }

    /// Luhn checksum over the card number.
    pub fn verify_checksum(&self) -> AppResult<()> {
        if luhn_valid(&self.card_number) {
            Ok(())
        } else {
            Err(AppError::validation("Card number is invalid"))
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewBankAccount {
    #[validate(regex(path = *ROUTING_RE, message = "Routing number must be 9 digits"))]
    #[schema(example = "021000021")]
    pub routing_number: String,
    #[validate(regex(path = *ACCOUNT_NUMBER_RE, message = "Account number must be 4 to 17 digits"))]
    #[schema(example = "000123456789")]
    pub account_number: String,
}

impl NewBankAccount {
    pub fn account_last_four(&self) -> String {
        last_four(&self.account_number)
    }
}

fn last_four(digits: &str) -> String {
    let start = digits.len().saturating_sub(4);
    digits[start..].to_string()
}

fn luhn_valid(number: &str) -> bool {
    let mut sum = 0;
    for (i, c) in number.chars().rev().enumerate() {
        let Some(mut digit) = c.to_digit(10) else {
            return false;
        };
        if i % 2 == 1 {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
    }

    sum % 10 == 0
}
