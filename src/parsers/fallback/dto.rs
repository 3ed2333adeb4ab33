use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::types::{TransactionCandidate, TransactionType};

pub const UNKNOWN_BANK: &str = "UNKNOWN";

/// What could be salvaged from an SMS in an unrecognized format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackTransaction {
    pub amount: Decimal,
    pub account_fragment: Option<String>,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
    pub raw_sms: String,
}

impl From<FallbackTransaction> for TransactionCandidate {
    fn from(txn: FallbackTransaction) -> Self {
        // Direction is unknown; the confirmation dialog lets the user fix it.
        let transaction_type = TransactionType::Expense;
        let category = Category::classify(&txn.description, transaction_type);

        TransactionCandidate {
            transaction_type,
            amount: txn.amount,
            description: txn.description,
            category,
            account_fragment: txn.account_fragment,
            reference_number: None,
            occurred_at: txn.occurred_at,
            bank: UNKNOWN_BANK.to_string(),
            raw_sms: txn.raw_sms,
            sender_address: String::new(),
            received_at: None,
        }
    }
}
