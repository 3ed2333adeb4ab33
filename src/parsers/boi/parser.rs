use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

use super::dto::BoiTransaction;
use crate::clock::Clock;
use crate::parsers::date::SmsDate;
use crate::parsers::extract::{fragment_from_token, normalize, parse_amount, reference_number};
use crate::parsers::traits::Parser;
use crate::types::TransactionType;

// `03-10-25` or `30Sep25`
const DATE_TOKEN: &str = r"(\d{1,2}(?:-\d{1,2}-\d{2}|[A-Za-z]{3}\d{2}))";

// "BOI - Rs.9360.00 Credited to your Ac XX9326 on 03-10-25 by UPI ref No.112115898277.Avl Bal 21080.15"
static CREDIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)Rs\.?\s*(\d[\d,]*(?:\.\d+)?)\s*Credited\s*to\s*your\s*Ac\s*(\w+)(?:\s*on\s*{DATE_TOKEN})?"
    ))
    .unwrap()
});

// "Rs.24.00 debited A/cXX9326 and credited to someone@okicici via UPI Ref No 527362569052 on 30Sep25"
static DEBIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)Rs\.?\s*(\d[\d,]*(?:\.\d+)?)\s*debited\s*A/c\s*(\w+)(?:.*?\bon\s+{DATE_TOKEN})?"
    ))
    .unwrap()
});

static RECIPIENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)credited\s*to\s*([^@\s]+@[^@\s]+)").unwrap());

pub struct BoiParser;

impl Parser for BoiParser {
    type Output = BoiTransaction;

    fn is_supported(sender: Option<&str>, content: &str) -> bool {
        let from_boi_sender = sender
            .map(|s| s.to_uppercase().contains("BOI"))
            .unwrap_or(false);

        from_boi_sender
            || content.contains("BOI")
            || content.to_lowercase().contains("bank of india")
    }

    fn parse(content: &str, clock: &dyn Clock) -> Option<Self::Output> {
        let text = normalize(content);

        if let Some(caps) = CREDIT.captures(&text) {
            let description = credit_description(&text);
            return build(&caps, &text, content, clock, TransactionType::Income, description, None);
        }

        if let Some(caps) = DEBIT.captures(&text) {
            let recipient = RECIPIENT
                .captures(&text)
                .map(|c| c[1].trim_end_matches(['.', ',']).to_string());
            let description = debit_description(&text, recipient.as_deref());
            return build(&caps, &text, content, clock, TransactionType::Expense, description, recipient);
        }

        debug!("SMS does not match BOI credit or debit pattern");
        None
    }
}

fn build(
    caps: &Captures<'_>,
    text: &str,
    raw: &str,
    clock: &dyn Clock,
    transaction_type: TransactionType,
    description: String,
    recipient: Option<String>,
) -> Option<BoiTransaction> {
    let amount = parse_amount(caps.get(1)?.as_str())?;
    let account_fragment = caps.get(2).and_then(|m| fragment_from_token(m.as_str()));
    let occurred_at = match caps.get(3) {
        Some(m) => SmsDate::from(m.as_str()).resolve(clock),
        None => clock.now(),
    };

    Some(BoiTransaction {
        transaction_type,
        amount,
        account_fragment,
        occurred_at,
        description,
        recipient,
        reference_number: reference_number(text),
        raw_sms: raw.to_string(),
    })
}

fn credit_description(text: &str) -> String {
    let description = if text.contains("UPI") {
        "UPI Credit Received"
    } else if text.contains("NEFT") {
        "NEFT Credit Received"
    } else if text.contains("RTGS") {
        "RTGS Credit Received"
    } else if text.contains("Salary") {
        "Salary Credit"
    } else {
        "Bank Credit"
    };
    description.to_string()
}

fn debit_description(text: &str, recipient: Option<&str>) -> String {
    if text.contains("UPI") {
        return match recipient {
            Some(handle) => format!("UPI to {}", handle),
            None => "UPI Payment".to_string(),
        };
    }

    if text.contains("ATM") {
        "ATM Withdrawal".to_string()
    } else if text.contains("POS") {
        "Card Payment".to_string()
    } else {
        "Bank Debit".to_string()
    }
}
