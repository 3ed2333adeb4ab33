//! Attaching a parsed SMS to one of the user's accounts.
//!
//! Decision order:
//! 1. the SMS names an account suffix that exactly one registered account has -> that account
//! 2. the suffix is unknown (or shared by several accounts, none of them active) -> no account,
//!    the user picks one when confirming
//! 3. the SMS names no account -> the active account, else the first registered one

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{Account, ResolvedTransaction, TransactionCandidate};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccountMatch {
    /// Suffix matched a registered account
    Matched { account_id: String },
    /// Suffix shared by several accounts and none of them is active
    Ambiguous { fragment: String },
    /// Suffix matched nothing
    Unmatched { fragment: String },
    /// SMS named no account, assumed the active or first one
    Defaulted { account_id: String },
    /// SMS named no account and there is nothing to default to
    NoAccounts,
}

impl AccountMatch {
    pub fn account_id(&self) -> Option<&str> {
        match self {
            AccountMatch::Matched { account_id } | AccountMatch::Defaulted { account_id } => {
                Some(account_id)
            }
            _ => None,
        }
    }
}

pub fn match_account(
    fragment: Option<&str>,
    accounts: &[Account],
    active_account_id: Option<&str>,
) -> AccountMatch {
    let Some(fragment) = fragment.map(str::trim).filter(|f| !f.is_empty()) else {
        return accounts
            .iter()
            .find(|a| Some(a.id.as_str()) == active_account_id)
            .or_else(|| accounts.first())
            .map(|a| AccountMatch::Defaulted {
                account_id: a.id.clone(),
            })
            .unwrap_or(AccountMatch::NoAccounts);
    };

    let candidates: Vec<&Account> = accounts.iter().filter(|a| a.suffix() == fragment).collect();

    match candidates.as_slice() {
        [] => AccountMatch::Unmatched {
            fragment: fragment.to_string(),
        },
        [only] => AccountMatch::Matched {
            account_id: only.id.clone(),
        },
        several => several
            .iter()
            .find(|a| Some(a.id.as_str()) == active_account_id)
            .map(|a| AccountMatch::Matched {
                account_id: a.id.clone(),
            })
            .unwrap_or_else(|| AccountMatch::Ambiguous {
                fragment: fragment.to_string(),
            }),
    }
}

pub fn resolve_account(
    candidate: TransactionCandidate,
    accounts: &[Account],
    active_account_id: Option<&str>,
) -> ResolvedTransaction {
    let outcome = match_account(
        candidate.account_fragment.as_deref(),
        accounts,
        active_account_id,
    );
    debug!(?outcome, "Resolved SMS account");

    ResolvedTransaction {
        account_id: outcome.account_id().map(str::to_string),
        candidate,
    }
}
