use thiserror::Error;

use crate::category::Category;
use crate::types::TransactionType;

/// Errors raised while turning SMS traffic into transactions.
///
/// A pattern that does not match is not an error: parsers return `None` for that.
/// Only malformed input from the host (event payloads, config) and violated
/// confirmation rules end up here.
#[derive(Error, Debug)]
pub enum SmsParseError {
    /// The builder was asked to parse without an SMS body
    #[error("SMS body is required")]
    MissingBody,

    /// Bank hint does not name a supported SMS vocabulary
    #[error("Unsupported bank: {0}")]
    UnsupportedBank(String),

    /// Date token in neither `DD-MM-YY` nor `DDMonYY` form
    #[error("Invalid SMS date format: {0}")]
    MalformedDate(String),

    /// Event payload or config that is not the expected JSON
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Event timestamp is neither epoch millis nor RFC 3339
    #[error("Invalid SMS timestamp: {0}")]
    InvalidTimestamp(String),

    /// The SMS inbox could not be read
    #[error("Failed to read SMS messages: {0}")]
    Source(String),

    // ── Confirmation ────────────────────────────────────────────────────────────

    /// Neither the SMS nor the user picked an account
    #[error("An account must be selected before the transaction can be saved")]
    AccountRequired,

    /// Chosen category belongs to the other transaction direction
    #[error("Category {category} cannot be used for {transaction_type} transactions")]
    CategoryMismatch {
        category: Category,
        transaction_type: TransactionType,
    },

    /// Category id outside the known vocabulary
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}

pub type SmsResult<T> = Result<T, SmsParseError>;
