use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::types::{TransactionCandidate, TransactionType};

pub const BOI_BANK: &str = "BOI";

/// A Bank of India credit or debit notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoiTransaction {
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub account_fragment: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub description: String,
    /// UPI handle the money went to, debits only
    pub recipient: Option<String>,
    pub reference_number: Option<String>,
    pub raw_sms: String,
}

impl From<BoiTransaction> for TransactionCandidate {
    fn from(txn: BoiTransaction) -> Self {
        let category = Category::classify(&txn.description, txn.transaction_type);

        TransactionCandidate {
            transaction_type: txn.transaction_type,
            amount: txn.amount,
            description: txn.description,
            category,
            account_fragment: txn.account_fragment,
            reference_number: txn.reference_number,
            occurred_at: txn.occurred_at,
            bank: BOI_BANK.to_string(),
            raw_sms: txn.raw_sms,
            sender_address: String::new(),
            received_at: None,
        }
    }
}
