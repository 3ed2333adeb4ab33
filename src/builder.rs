use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::errors::SmsParseError;
use crate::parsers::prelude::*;
use crate::types::{RawSms, TransactionCandidate};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParsedSms {
    Boi(BoiTransaction),
    Fallback(FallbackTransaction),
}

impl From<ParsedSms> for TransactionCandidate {
    fn from(parsed: ParsedSms) -> Self {
        match parsed {
            ParsedSms::Boi(boi) => boi.into(),
            ParsedSms::Fallback(fallback) => fallback.into(),
        }
    }
}

/// SMS vocabularies with a dedicated parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BankFormat {
    #[serde(rename = "boi")]
    Boi,
}

struct BankRule {
    format: BankFormat,
    matcher: fn(Option<&str>, &str) -> bool,
}

/// Checked top to bottom; the first matcher that accepts the SMS wins.
const BANK_RULES: &[BankRule] = &[BankRule {
    format: BankFormat::Boi,
    matcher: BoiParser::is_supported,
}];

impl BankFormat {
    fn parse_raw(&self, content: &str, clock: &dyn Clock) -> Option<ParsedSms> {
        match self {
            BankFormat::Boi => BoiParser::parse(content, clock).map(ParsedSms::Boi),
        }
    }

    /// Picks a parser from the sender and body. Unknown banks get `None`, never a guess.
    pub fn detect(sender: Option<&str>, content: &str) -> Option<Self> {
        BANK_RULES
            .iter()
            .find(|rule| (rule.matcher)(sender, content))
            .map(|rule| rule.format)
    }
}

impl FromStr for BankFormat {
    type Err = SmsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "boi" | "boiind" | "bank of india" => Ok(BankFormat::Boi),
            _ => Err(SmsParseError::UnsupportedBank(s.to_string())),
        }
    }
}

#[derive(Default)]
pub struct SmsParserBuilder<'a> {
    body: Option<String>,
    sender: Option<String>,
    bank_hint: Option<String>,
    format: Option<BankFormat>,
    received_at: Option<DateTime<Utc>>,
    clock: Option<&'a dyn Clock>,
}

impl<'a> SmsParserBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = Some(body.to_string());
        self
    }

    pub fn sender(mut self, sender: &str) -> Self {
        self.sender = Some(sender.to_string());
        self
    }

    /// Bank name or code as free text. Unrecognized hints are ignored.
    pub fn bank(mut self, hint: &str) -> Self {
        self.bank_hint = Some(hint.to_string());
        self
    }

    pub fn format(mut self, format: BankFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn received_at(mut self, received_at: DateTime<Utc>) -> Self {
        self.received_at = Some(received_at);
        self
    }

    pub fn clock(mut self, clock: &'a dyn Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sender, body and receive time of a delivered SMS.
    pub fn sms(self, sms: &RawSms) -> Self {
        self.sender(&sms.sender)
            .body(&sms.body)
            .received_at(sms.received_at)
    }

    fn resolve_format(&self, content: &str) -> Option<BankFormat> {
        let hinted = self.format.or_else(|| {
            let hint = self.bank_hint.as_deref()?;
            match hint.parse() {
                Ok(format) => Some(format),
                Err(e) => {
                    debug!("Ignoring bank hint: {}", e);
                    None
                }
            }
        });

        hinted.or_else(|| BankFormat::detect(self.sender.as_deref(), content))
    }

    /// Runs the bank-specific parser picked by dispatch.
    ///
    /// `Ok(None)` when no bank is recognized or its patterns do not match.
    pub fn parse(self) -> Result<Option<TransactionCandidate>, SmsParseError> {
        self.parse_inner(false)
    }

    /// Like [`parse`](Self::parse), but salvages unknown formats with the fallback
    /// heuristics. `Ok(None)` only when the SMS carries no amount at all.
    pub fn parse_with_fallback(self) -> Result<Option<TransactionCandidate>, SmsParseError> {
        self.parse_inner(true)
    }

    fn parse_inner(self, fallback: bool) -> Result<Option<TransactionCandidate>, SmsParseError> {
        let content = self.body.as_deref().ok_or(SmsParseError::MissingBody)?;
        let clock = self.clock.unwrap_or(&SystemClock);

        let mut parsed = match self.resolve_format(content) {
            Some(format) => {
                debug!(?format, "Dispatching SMS to bank parser");
                format.parse_raw(content, clock)
            }
            None => {
                debug!("No bank recognized for SMS");
                None
            }
        };

        if parsed.is_none() && fallback {
            parsed = FallbackParser::parse(content, clock).map(ParsedSms::Fallback);
            if parsed.is_some() {
                debug!("Recovered transaction with fallback heuristics");
            }
        }

        Ok(parsed.map(|parsed| TransactionCandidate {
            sender_address: self.sender.clone().unwrap_or_default(),
            received_at: self.received_at,
            ..parsed.into()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::clock::FixedClock;
    use crate::types::TransactionType;
    use chrono::TimeZone;
    use rstest::rstest;
    use rust_decimal::Decimal;

    const CREDIT_SMS: &str = "BOI - Rs.9360.00 Credited to your Ac XX9326 on 03-10-25 by UPI ref No.112115898277.Avl Bal 21080.15";
    const DEBIT_SMS: &str = "Rs.24.00 debited A/cXX9326 and credited to amolkhot751@okicici via UPI Ref No 527362569052 on 30Sep25. -BOI";
    const UNBRANDED_DEBIT: &str = "Rs.24.00 debited A/cXX9326 and credited to amolkhot751@okicici via UPI Ref No 527362569052 on 30Sep25.";

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2025, 10, 5, 8, 0, 0).unwrap())
    }

    #[test]
    fn test_builder_missing_body() {
        let result = SmsParserBuilder::new().parse();
        assert!(matches!(result, Err(SmsParseError::MissingBody)));
    }

    #[test]
    fn test_builder_new() {
        let builder = SmsParserBuilder::new();
        assert!(builder.body.is_none());
        assert!(builder.sender.is_none());
        assert!(builder.format.is_none());
        assert!(builder.clock.is_none());
    }

    #[test]
    fn test_builder_chaining() {
        let received = Utc.with_ymd_and_hms(2025, 10, 3, 9, 30, 0).unwrap();
        let sms = RawSms::new("BOIIND", CREDIT_SMS, received);
        let builder = SmsParserBuilder::new().sms(&sms).bank("BOI").format(BankFormat::Boi);

        assert_eq!(builder.body.as_deref(), Some(CREDIT_SMS));
        assert_eq!(builder.sender.as_deref(), Some("BOIIND"));
        assert_eq!(builder.bank_hint.as_deref(), Some("BOI"));
        assert_eq!(builder.received_at, Some(received));
    }

    #[test]
    fn test_parse_credit_end_to_end() {
        let clock = clock();
        let candidate = SmsParserBuilder::new()
            .sender("BOI")
            .body(CREDIT_SMS)
            .clock(&clock)
            .parse()
            .unwrap()
            .unwrap();

        assert_eq!(candidate.transaction_type, TransactionType::Income);
        assert_eq!(candidate.amount, "9360.00".parse::<Decimal>().unwrap());
        assert_eq!(candidate.account_fragment.as_deref(), Some("9326"));
        assert_eq!(candidate.category, Category::OtherIncome);
        assert_eq!(candidate.description, "UPI Credit Received");
        assert_eq!(candidate.bank, BOI_BANK);
        assert_eq!(candidate.sender_address, "BOI");
        assert_eq!(candidate.raw_sms, CREDIT_SMS);
    }

    #[test]
    fn test_parse_debit_end_to_end() {
        let clock = clock();
        let candidate = SmsParserBuilder::new()
            .body(DEBIT_SMS)
            .clock(&clock)
            .parse()
            .unwrap()
            .unwrap();

        assert_eq!(candidate.transaction_type, TransactionType::Expense);
        assert_eq!(candidate.amount, "24.00".parse::<Decimal>().unwrap());
        assert_eq!(candidate.account_fragment.as_deref(), Some("9326"));
        assert_eq!(candidate.description, "UPI to amolkhot751@okicici");
        assert_eq!(candidate.category, Category::OtherExpense);
        assert_eq!(candidate.sender_address, "");
    }

    #[rstest]
    #[case(None, None, None, false)] // no identifier anywhere
    #[case(Some(BankFormat::Boi), None, None, true)] // explicit format
    #[case(None, Some("boi"), None, true)] // recognized hint
    #[case(None, Some("Bank of India"), None, true)]
    #[case(None, Some("HDFC"), None, false)] // unknown hint falls back to sniffing
    #[case(None, None, Some("VM-BOIIND"), true)] // sender code
    fn test_dispatch_selection(
        #[case] format: Option<BankFormat>,
        #[case] hint: Option<&str>,
        #[case] sender: Option<&str>,
        #[case] expected: bool,
    ) {
        let clock = clock();
        let mut builder = SmsParserBuilder::new().body(UNBRANDED_DEBIT).clock(&clock);

        if let Some(format) = format {
            builder = builder.format(format);
        }
        if let Some(hint) = hint {
            builder = builder.bank(hint);
        }
        if let Some(sender) = sender {
            builder = builder.sender(sender);
        }

        let result = builder.parse().unwrap();
        assert_eq!(result.is_some(), expected);
    }

    #[rstest]
    #[case(None, CREDIT_SMS, Some(BankFormat::Boi))]
    #[case(None, "Transaction at Bank of India branch Rs.5", Some(BankFormat::Boi))]
    #[case(Some("BOIIND"), "Rs.5 debited", Some(BankFormat::Boi))]
    #[case(Some("HDFCBK"), "Rs.5 debited from HDFC Bank A/c XX1234", None)]
    #[case(None, "Your OTP is 123456", None)]
    fn test_bank_format_detect(
        #[case] sender: Option<&str>,
        #[case] content: &str,
        #[case] expected: Option<BankFormat>,
    ) {
        assert_eq!(BankFormat::detect(sender, content), expected);
    }

    #[rstest]
    #[case("BOI", true)]
    #[case(" boiind ", true)]
    #[case("Bank of India", true)]
    #[case("SBI", false)]
    #[case("", false)]
    fn test_bank_format_from_str(#[case] input: &str, #[case] ok: bool) {
        let result = input.parse::<BankFormat>();
        if ok {
            assert_eq!(result.unwrap(), BankFormat::Boi);
        } else {
            assert!(matches!(result, Err(SmsParseError::UnsupportedBank(_))));
        }
    }

    #[test]
    fn test_recognized_bank_that_does_not_match_returns_none() {
        let clock = clock();
        let result = SmsParserBuilder::new()
            .body("BOI: Your Ac XX9326 balance is Rs.21080.15")
            .clock(&clock)
            .parse()
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_parse_with_fallback_for_unknown_bank() {
        let clock = clock();
        let candidate = SmsParserBuilder::new()
            .sender("HDFCBK")
            .body("Rs.500.00 spent on HDFC Bank Card XX4455 at AMAZON")
            .clock(&clock)
            .parse_with_fallback()
            .unwrap()
            .unwrap();

        assert_eq!(candidate.transaction_type, TransactionType::Expense);
        assert_eq!(candidate.amount, "500.00".parse::<Decimal>().unwrap());
        assert_eq!(candidate.bank, UNKNOWN_BANK);
        assert_eq!(candidate.sender_address, "HDFCBK");
        assert_eq!(candidate.occurred_at, clock.now());
    }

    #[test]
    fn test_parse_without_fallback_for_unknown_bank() {
        let clock = clock();
        let result = SmsParserBuilder::new()
            .body("Rs.500.00 spent on HDFC Bank Card XX4455 at AMAZON")
            .clock(&clock)
            .parse()
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_parse_with_fallback_no_amount() {
        let result = SmsParserBuilder::new()
            .body("Your OTP is 482913. Do not share it with anyone.")
            .parse_with_fallback()
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_parse_keeps_received_at() {
        let clock = clock();
        let received = Utc.with_ymd_and_hms(2025, 10, 3, 9, 30, 0).unwrap();
        let sms = RawSms::new("BOIIND", CREDIT_SMS, received);

        let candidate = SmsParserBuilder::new()
            .sms(&sms)
            .clock(&clock)
            .parse()
            .unwrap()
            .unwrap();

        assert_eq!(candidate.received_at, Some(received));
        assert_eq!(candidate.sender_address, "BOIIND");
    }

    #[test]
    fn test_parsed_sms_serialization() {
        let clock = clock();
        let parsed = BankFormat::Boi.parse_raw(DEBIT_SMS, &clock).unwrap();

        let json = serde_json::to_string(&parsed).unwrap();
        assert!(json.contains("Boi"));
        assert!(json.contains("amolkhot751@okicici"));

        let deserialized: ParsedSms = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, parsed);
    }

    #[test]
    fn test_bank_format_serialization() {
        let json = serde_json::to_string(&BankFormat::Boi).unwrap();
        assert_eq!(json, "\"boi\"");

        let deserialized: BankFormat = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, BankFormat::Boi);
    }
}
