use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::errors::{SmsParseError, SmsResult};

/// Marker stamped on transactions confirmed from an SMS.
pub const SMS_AUTO_SOURCE: &str = "sms_auto";

/// An SMS as delivered by the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSms {
    pub sender: String,
    pub body: String,
    pub received_at: DateTime<Utc>,
}

/// Payload shape pushed by the native SMS receiver.
#[derive(Debug, Deserialize)]
struct SmsEvent {
    #[serde(default, alias = "address")]
    sender: Option<String>,
    body: String,
    #[serde(alias = "date")]
    timestamp: EventTimestamp,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EventTimestamp {
    Millis(i64),
    Text(String),
}

impl TryFrom<EventTimestamp> for DateTime<Utc> {
    type Error = SmsParseError;

    fn try_from(timestamp: EventTimestamp) -> Result<Self, Self::Error> {
        match timestamp {
            EventTimestamp::Millis(millis) => DateTime::from_timestamp_millis(millis)
                .ok_or_else(|| SmsParseError::InvalidTimestamp(millis.to_string())),
            EventTimestamp::Text(text) => {
                let text = text.trim();
                if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
                    let millis = text
                        .parse::<i64>()
                        .map_err(|_| SmsParseError::InvalidTimestamp(text.to_string()))?;
                    return EventTimestamp::Millis(millis).try_into();
                }

                DateTime::parse_from_rfc3339(text)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|_| SmsParseError::InvalidTimestamp(text.to_string()))
            }
        }
    }
}

impl RawSms {
    pub fn new(sender: &str, body: &str, received_at: DateTime<Utc>) -> Self {
        Self {
            sender: sender.to_string(),
            body: body.to_string(),
            received_at,
        }
    }

    /// Decodes an event payload such as
    /// `{"sender": "BOIIND", "body": "...", "timestamp": 1759483800000}`.
    ///
    /// `address`/`date` are accepted as field aliases, and the timestamp may be
    /// epoch millis (number or digit string) or RFC 3339.
    pub fn from_event_json(payload: &str) -> SmsResult<Self> {
        let event: SmsEvent = serde_json::from_str(payload)?;

        Ok(Self {
            sender: event.sender.unwrap_or_default(),
            body: event.body,
            received_at: event.timestamp.try_into()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money entering the account
    Income,
    /// Money leaving the account
    Expense,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Income => f.write_str("income"),
            TransactionType::Expense => f.write_str("expense"),
        }
    }
}

/// A transaction extracted from one SMS, before any account is attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionCandidate {
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub description: String,
    pub category: Category,
    /// Last (at most four) digits of the account number quoted in the SMS
    pub account_fragment: Option<String>,
    pub reference_number: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub bank: String,
    pub raw_sms: String,
    pub sender_address: String,
    pub received_at: Option<DateTime<Utc>>,
}

impl TransactionCandidate {
    /// Advisory key for spotting the same notification delivered twice.
    pub fn dedup_key(&self) -> Option<String> {
        self.reference_number
            .as_ref()
            .map(|reference| format!("{}:{}", self.bank, reference))
    }
}

/// A candidate after account matching.
///
/// `account_id` is `None` when the SMS names an account that is not registered
/// (or is ambiguous) and no account could be assumed; the user has to pick one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTransaction {
    #[serde(flatten)]
    pub candidate: TransactionCandidate,
    pub account_id: Option<String>,
}

impl ResolvedTransaction {
    pub fn is_persist_ready(&self) -> bool {
        self.account_id.is_some()
    }

    /// Applies the user's choices from the confirmation dialog.
    ///
    /// A chosen account overrides the matched one. Fails when there is still no
    /// account or the category belongs to the other direction.
    pub fn confirm(
        self,
        category: Option<Category>,
        account_id: Option<String>,
    ) -> SmsResult<ConfirmedTransaction> {
        let mut candidate = self.candidate;
        let category = category.unwrap_or(candidate.category);

        if category.transaction_type() != candidate.transaction_type {
            return Err(SmsParseError::CategoryMismatch {
                category,
                transaction_type: candidate.transaction_type,
            });
        }

        let account_id = account_id
            .or(self.account_id)
            .ok_or(SmsParseError::AccountRequired)?;

        candidate.category = category;

        Ok(ConfirmedTransaction {
            candidate,
            account_id,
            source: SMS_AUTO_SOURCE.to_string(),
        })
    }
}

/// Ready to hand over to persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedTransaction {
    #[serde(flatten)]
    pub candidate: TransactionCandidate,
    pub account_id: String,
    pub source: String,
}

/// A user-registered bank account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub account_number: String,
}

impl Account {
    pub fn new(id: &str, name: &str, account_number: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            account_number: account_number.to_string(),
        }
    }

    /// The last four characters of the account number.
    pub fn suffix(&self) -> &str {
        let number = self.account_number.trim();
        let start = number
            .char_indices()
            .rev()
            .nth(3)
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        &number[start..]
    }
}
