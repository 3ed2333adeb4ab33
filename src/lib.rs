//! Extract bank transactions from SMS notifications and match them to accounts.
//!
//! ```rust,ignore
//! use bank_sms_rs::{Account, RawSms, SystemClock, process_sms};
//!
//! let sms = RawSms::from_event_json(&payload)?;
//! let accounts = vec![Account::new("boi", "BOI Savings", "9326")];
//!
//! if let Some(transaction) = process_sms(&sms, &accounts, Some("boi"), &SystemClock) {
//!     // ask the user to confirm, then persist
//! }
//! ```

mod builder;
mod category;
mod clock;
mod config;
mod pipeline;
mod types;

pub mod errors;
pub mod monitor;
pub mod parsers;
pub mod resolve;

pub use builder::{BankFormat, ParsedSms, SmsParserBuilder};
pub use category::Category;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::MonitorConfig;
pub use errors::{SmsParseError, SmsResult};
pub use monitor::{AppState, SmsMonitor};
pub use parsers::prelude::*;
pub use pipeline::{parse_any_sms, process_sms};
pub use resolve::{AccountMatch, resolve_account};
pub use types::{
    Account, ConfirmedTransaction, RawSms, ResolvedTransaction, SMS_AUTO_SOURCE,
    TransactionCandidate, TransactionType,
};
