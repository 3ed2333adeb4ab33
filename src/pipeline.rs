use tracing::debug;

use crate::builder::SmsParserBuilder;
use crate::clock::Clock;
use crate::resolve::resolve_account;
use crate::types::{Account, RawSms, ResolvedTransaction, TransactionCandidate};

/// Bank parser first, fallback heuristics second.
///
/// `None` means the SMS carries no transaction (OTP, promotions, ...).
pub fn parse_any_sms(sms: &RawSms, clock: &dyn Clock) -> Option<TransactionCandidate> {
    match SmsParserBuilder::new().sms(sms).clock(clock).parse_with_fallback() {
        Ok(candidate) => candidate,
        Err(e) => {
            debug!("Skipping SMS from {}: {}", sms.sender, e);
            None
        }
    }
}

/// Parses an SMS and attaches it to one of `accounts`.
pub fn process_sms(
    sms: &RawSms,
    accounts: &[Account],
    active_account_id: Option<&str>,
    clock: &dyn Clock,
) -> Option<ResolvedTransaction> {
    parse_any_sms(sms, clock).map(|candidate| resolve_account(candidate, accounts, active_account_id))
}
