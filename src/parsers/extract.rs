//! Field extractors shared by every SMS vocabulary.
//!
//! All of them expect text that went through [`normalize`] first.

use std::ops::Range;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bRs\.?\s?(\d[\d,]*(?:\.\d+)?)").unwrap());

static ACCOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bA/?c\.?\s*(?:no\.?\s*)?[A-Z*]*(\d+)\b").unwrap()
});

static REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bref\.?\s*no\.?\s*:?\s*(\d+)").unwrap());

static TRAILING_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)$").unwrap());

/// Only this many trailing digits of an account number are ever compared.
pub const ACCOUNT_FRAGMENT_LEN: usize = 4;

/// Collapses whitespace runs to a single space and trims.
pub fn normalize(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// `9,360.00` -> `9360.00`
pub fn parse_amount(numeral: &str) -> Option<Decimal> {
    let clean: String = numeral.chars().filter(|c| *c != ',').collect();
    Decimal::from_str(&clean).ok()
}

/// First `Rs.` amount in the text.
pub fn amount(text: &str) -> Option<Decimal> {
    amount_with_span(text).map(|(amount, _)| amount)
}

/// First `Rs.` amount plus the byte range of the whole token.
pub fn amount_with_span(text: &str) -> Option<(Decimal, Range<usize>)> {
    let caps = AMOUNT.captures(text)?;
    let token = caps.get(0)?;
    let amount = parse_amount(caps.get(1)?.as_str())?;
    Some((amount, token.range()))
}

/// Account fragment from the token after `A/c` / `Ac`, e.g. `XX9326` -> `9326`.
pub fn account_fragment(text: &str) -> Option<String> {
    let caps = ACCOUNT.captures(text)?;
    fragment_from_digits(caps.get(1)?.as_str())
}

/// Trailing digit run of a masked account token.
pub fn fragment_from_token(token: &str) -> Option<String> {
    let caps = TRAILING_DIGITS.captures(token.trim())?;
    fragment_from_digits(caps.get(1)?.as_str())
}

pub(crate) fn fragment_from_digits(digits: &str) -> Option<String> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let start = digits.len().saturating_sub(ACCOUNT_FRAGMENT_LEN);
    Some(digits[start..].to_string())
}

/// Digits after `ref No`.
pub fn reference_number(text: &str) -> Option<String> {
    REFERENCE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize("  BOI -  Rs.9360.00\n Credited\tto   your Ac "),
            "BOI - Rs.9360.00 Credited to your Ac"
        );
        assert_eq!(normalize("   "), "");
    }

    #[rstest]
    #[case("BOI - Rs.9360.00 Credited", "9360.00")]
    #[case("Rs.24.00 debited", "24.00")]
    #[case("Rs 1,20,000.50 credited", "120000.50")]
    #[case("rs.500 spent", "500")]
    #[case("Your A/c debited by Rs.500.00 on", "500.00")]
    #[case("Rs.12,345 at POS", "12345")]
    fn test_amount(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(amount(text), Some(Decimal::from_str(expected).unwrap()));
    }

    #[rstest]
    #[case("Your OTP is 482913. Do not share it.")]
    #[case("Rs. only")]
    #[case("Hours 40 logged")]
    #[case("")]
    fn test_amount_missing(#[case] text: &str) {
        assert_eq!(amount(text), None);
    }

    #[test]
    fn test_amount_keeps_scale() {
        let value = amount("Rs.9360.00 Credited").unwrap();
        assert_eq!(value.to_string(), "9360.00");
    }

    #[test]
    fn test_amount_span_covers_token() {
        let text = "Paid Rs.5000.00 to shop";
        let (value, span) = amount_with_span(text).unwrap();
        assert_eq!(value, Decimal::from_str("5000.00").unwrap());
        assert_eq!(&text[span], "Rs.5000.00");
    }

    #[test]
    fn test_amount_overflow_is_no_match() {
        assert_eq!(amount("Rs.99999999999999999999999999999999999"), None);
    }

    #[rstest]
    #[case("Credited to your Ac XX9326 on 03-10-25", Some("9326"))]
    #[case("debited A/cXX9326 and credited", Some("9326"))]
    #[case("A/c no. 001234567 debited", Some("4567"))]
    #[case("Ac **12 debited", Some("12"))]
    #[case("Account updated successfully", None)]
    #[case("no account here", None)]
    fn test_account_fragment(#[case] text: &str, #[case] expected: Option<&str>) {
        assert_eq!(account_fragment(text).as_deref(), expected);
    }

    #[rstest]
    #[case("XX9326", Some("9326"))]
    #[case("123456789", Some("6789"))]
    #[case("XX12", Some("12"))]
    #[case("XXXX", None)]
    #[case("", None)]
    fn test_fragment_from_token(#[case] token: &str, #[case] expected: Option<&str>) {
        assert_eq!(fragment_from_token(token).as_deref(), expected);
    }

    #[rstest]
    #[case("by UPI ref No.112115898277.Avl Bal 21080.15", Some("112115898277"))]
    #[case("via UPI Ref No 527362569052 on 30Sep25", Some("527362569052"))]
    #[case("REF NO: 998877", Some("998877"))]
    #[case("no reference given", None)]
    fn test_reference_number(#[case] text: &str, #[case] expected: Option<&str>) {
        assert_eq!(reference_number(text).as_deref(), expected);
    }
}
