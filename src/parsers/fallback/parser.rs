use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::dto::FallbackTransaction;
use crate::clock::Clock;
use crate::parsers::extract::{account_fragment, amount, amount_with_span, fragment_from_digits, normalize};
use crate::parsers::traits::Parser;

/// Descriptions are cut to this many characters.
pub const DESCRIPTION_LIMIT: usize = 120;

static ACCOUNT_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bAcc(?:oun)?t\b\.?\s*(?:No\.?\s*)?[X*]*(\d+)").unwrap()
});

static BARE_FOUR_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{4})\b").unwrap());

/// Last-chance extraction for SMS from banks without a dedicated parser.
pub struct FallbackParser;

impl Parser for FallbackParser {
    type Output = FallbackTransaction;

    fn is_supported(_sender: Option<&str>, content: &str) -> bool {
        amount(&normalize(content)).is_some()
    }

    fn parse(content: &str, clock: &dyn Clock) -> Option<Self::Output> {
        let text = normalize(content);

        let Some((amount, span)) = amount_with_span(&text) else {
            debug!("No amount in SMS, treating as non-financial");
            return None;
        };

        // Keep the amount's own digits out of the bare four-digit search.
        let mut without_amount = text.clone();
        without_amount.replace_range(span, " ");

        let account_fragment = account_fragment(&text).or_else(|| {
            ACCOUNT_WORD
                .captures(&text)
                .or_else(|| BARE_FOUR_DIGITS.captures(&without_amount))
                .and_then(|caps| fragment_from_digits(caps.get(1)?.as_str()))
        });

        Some(FallbackTransaction {
            amount,
            account_fragment,
            description: text.chars().take(DESCRIPTION_LIMIT).collect(),
            occurred_at: clock.now(),
            raw_sms: content.to_string(),
        })
    }
}
