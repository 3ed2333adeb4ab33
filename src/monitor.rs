//! Watching an SMS inbox for bank transactions.
//!
//! The monitor owns no timers and touches no OS APIs. The host calls [`SmsMonitor::poll`]
//! on its own schedule (see [`MonitorConfig::poll_interval`]), reports foreground and
//! background transitions through [`SmsMonitor::set_app_state`], and supplies the inbox,
//! the account list and the place transactions are delivered to.

use std::collections::HashSet;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::config::MonitorConfig;
use crate::errors::SmsResult;
use crate::pipeline::process_sms;
use crate::types::{Account, RawSms, ResolvedTransaction};

const BANK_KEYWORDS: &[&str] = &[
    "boi",
    "bank of india",
    "hdfc",
    "sbi",
    "icici",
    "axis",
    "kotak",
    "yes bank",
    "pnb",
    "canara",
    "union bank",
];

const BANK_SENDERS: &[&str] = &[
    "BOIIND", "SBIINB", "HDFCBK", "ICICIB", "AXISBK", "KOTAKB", "YESBK", "INDUSB",
];

const TRANSACTION_KEYWORDS: &[&str] = &[
    "credited",
    "debited",
    "withdrawn",
    "deposited",
    "upi",
    "neft",
    "rtgs",
    "balance",
    "a/c",
    "rs.",
];

/// Cheap check run before parsing: does this look like a bank transaction alert?
pub fn is_bank_sms(sender: &str, body: &str) -> bool {
    let text = body.to_lowercase();
    let sender = sender.to_uppercase();

    let from_bank = BANK_KEYWORDS.iter().any(|k| text.contains(k))
        || BANK_SENDERS.iter().any(|s| sender.contains(s));

    from_bank && TRANSACTION_KEYWORDS.iter().any(|k| text.contains(k))
}

/// Where SMS come from, newest first.
pub trait SmsSource {
    fn list_inbox(&self, max_count: usize) -> SmsResult<Vec<RawSms>>;
}

pub trait AccountDirectory {
    fn accounts(&self) -> Vec<Account>;

    fn active_account_id(&self) -> Option<String>;
}

/// Receives each transaction the monitor finds, typically to open a confirmation dialog.
pub trait TransactionSink {
    fn deliver(&mut self, transaction: ResolvedTransaction);
}

impl<F> TransactionSink for F
where
    F: FnMut(ResolvedTransaction),
{
    fn deliver(&mut self, transaction: ResolvedTransaction) {
        self(transaction)
    }
}

/// A fixed account list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticAccounts {
    pub accounts: Vec<Account>,
    pub active_account_id: Option<String>,
}

impl AccountDirectory for StaticAccounts {
    fn accounts(&self) -> Vec<Account> {
        self.accounts.clone()
    }

    fn active_account_id(&self) -> Option<String> {
        self.active_account_id.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppState {
    Active,
    Inactive,
    Background,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorStatus {
    pub running: bool,
    pub has_sink: bool,
    pub app_state: AppState,
    pub pending: usize,
    pub seen_references: usize,
    pub last_seen: DateTime<Utc>,
}

pub struct SmsMonitor<S, A, C> {
    source: S,
    directory: A,
    clock: C,
    config: MonitorConfig,
    sink: Option<Box<dyn TransactionSink>>,
    running: bool,
    app_state: AppState,
    last_seen: DateTime<Utc>,
    pending: Vec<ResolvedTransaction>,
    seen: HashSet<String>,
    // SMS already delivered through `handle_sms` that `poll` has not reached yet
    pushed: HashSet<(String, DateTime<Utc>)>,
}

impl<S, A, C> SmsMonitor<S, A, C>
where
    S: SmsSource,
    A: AccountDirectory,
    C: Clock,
{
    pub fn new(source: S, directory: A, clock: C, config: MonitorConfig) -> Self {
        let last_seen = clock.now();

        Self {
            source,
            directory,
            clock,
            config,
            sink: None,
            running: false,
            app_state: AppState::Active,
            last_seen,
            pending: Vec::new(),
            seen: HashSet::new(),
            pushed: HashSet::new(),
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Starts watching for SMS received from now on.
    ///
    /// Returns `false` and leaves the current sink in place if already running.
    pub fn start<T>(&mut self, sink: T) -> bool
    where
        T: TransactionSink + 'static,
    {
        if self.running {
            debug!("SMS monitoring already active");
            return false;
        }

        self.sink = Some(Box::new(sink));
        self.last_seen = self.clock.now();
        self.running = true;
        info!(since = %self.last_seen, "SMS monitoring started");
        true
    }

    pub fn stop(&mut self) {
        if !self.running {
            return;
        }

        self.running = false;
        self.sink = None;
        info!(pending = self.pending.len(), "SMS monitoring stopped");
    }

    /// Reads the newest inbox messages and processes those not seen yet.
    ///
    /// In the foreground transactions go straight to the sink; in the background they
    /// wait until the app is active again. Returns how many transactions were found.
    pub fn poll(&mut self) -> SmsResult<usize> {
        if !self.running {
            return Ok(0);
        }

        let batch = match self.app_state {
            AppState::Active => self.config.foreground_batch,
            AppState::Inactive | AppState::Background => self.config.background_batch,
        };

        let messages = self.source.list_inbox(batch).inspect_err(|e| {
            warn!(error = %e, "Failed to poll SMS inbox");
        })?;

        let since = self.last_seen;
        let mut fresh: Vec<RawSms> = messages
            .into_iter()
            .filter(|sms| sms.received_at > since)
            .collect();

        if fresh.is_empty() {
            return Ok(0);
        }

        fresh.sort_by_key(|sms| sms.received_at);
        if let Some(newest) = fresh.last() {
            self.last_seen = newest.received_at;
        }
        debug!(count = fresh.len(), "New SMS in inbox");

        let mut found = 0;
        for sms in fresh {
            if self.pushed.remove(&(sms.sender.clone(), sms.received_at)) {
                debug!(sender = %sms.sender, "SMS already handled when pushed");
                continue;
            }
            let Some(transaction) = self.evaluate(&sms) else {
                continue;
            };
            found += 1;

            if self.app_state == AppState::Active {
                self.deliver(transaction);
            } else {
                debug!(amount = %transaction.candidate.amount, "Queued transaction until app is active");
                self.pending.push(transaction);
            }
        }

        let last_seen = self.last_seen;
        self.pushed.retain(|(_, received_at)| *received_at > last_seen);

        Ok(found)
    }

    /// Processes one SMS pushed by the device and delivers any transaction found.
    ///
    /// A later `poll` that reads the same SMS from the inbox skips it.
    pub fn handle_sms(&mut self, sms: RawSms) -> Option<ResolvedTransaction> {
        let transaction = self.evaluate(&sms)?;
        if sms.received_at > self.last_seen {
            self.pushed.insert((sms.sender.clone(), sms.received_at));
        }
        self.deliver(transaction.clone());
        Some(transaction)
    }

    pub fn set_app_state(&mut self, next: AppState) {
        let previous = self.app_state;
        self.app_state = next;

        if previous != AppState::Active && next == AppState::Active {
            debug!("App returned to foreground");
            self.flush_pending();
        }
    }

    /// Delivers queued transactions in arrival order. Kept queued while there is no sink.
    pub fn flush_pending(&mut self) -> usize {
        if self.pending.is_empty() {
            return 0;
        }
        let Some(sink) = self.sink.as_mut() else {
            debug!(pending = self.pending.len(), "No sink, keeping pending transactions");
            return 0;
        };

        let pending = std::mem::take(&mut self.pending);
        let count = pending.len();
        info!(count, "Delivering pending transactions");
        for transaction in pending {
            sink.deliver(transaction);
        }
        count
    }

    /// Transactions from SMS received in the last `days_back` days, `scan_days` from
    /// the config when `None`. Negative windows count as zero days; a window reaching
    /// past the representable date range has no cutoff.
    ///
    /// Nothing is delivered and the duplicate filter is left untouched; meant for
    /// one-off imports.
    pub fn scan_recent(&self, days_back: Option<i64>) -> SmsResult<Vec<ResolvedTransaction>> {
        let days_back = days_back.unwrap_or(self.config.scan_days).max(0);
        let now = self.clock.now();
        let cutoff = TimeDelta::try_days(days_back)
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let messages = self.source.list_inbox(self.config.scan_batch)?;
        let accounts = self.directory.accounts();
        let active = self.directory.active_account_id();

        let transactions: Vec<ResolvedTransaction> = messages
            .iter()
            .filter(|sms| sms.received_at >= cutoff)
            .filter(|sms| self.passes_prefilter(sms))
            .filter_map(|sms| process_sms(sms, &accounts, active.as_deref(), &self.clock))
            .collect();

        debug!(count = transactions.len(), days_back, "Scanned recent SMS");
        Ok(transactions)
    }

    pub fn status(&self) -> MonitorStatus {
        MonitorStatus {
            running: self.running,
            has_sink: self.sink.is_some(),
            app_state: self.app_state,
            pending: self.pending.len(),
            seen_references: self.seen.len(),
            last_seen: self.last_seen,
        }
    }

    fn passes_prefilter(&self, sms: &RawSms) -> bool {
        !self.config.require_bank_keyword || is_bank_sms(&sms.sender, &sms.body)
    }

    fn evaluate(&mut self, sms: &RawSms) -> Option<ResolvedTransaction> {
        if sms.body.trim().is_empty() {
            debug!("Ignoring SMS without body");
            return None;
        }
        if !self.passes_prefilter(sms) {
            debug!(sender = %sms.sender, "SMS does not look like a bank transaction");
            return None;
        }

        let accounts = self.directory.accounts();
        let active = self.directory.active_account_id();
        let transaction = process_sms(sms, &accounts, active.as_deref(), &self.clock)?;

        if self.config.dedupe_by_reference {
            if let Some(key) = transaction.candidate.dedup_key() {
                if !self.seen.insert(key) {
                    debug!(sender = %sms.sender, "Skipping repeated SMS");
                    return None;
                }
            }
        }

        Some(transaction)
    }

    fn deliver(&mut self, transaction: ResolvedTransaction) {
        match self.sink.as_mut() {
            Some(sink) => sink.deliver(transaction),
            None => debug!("No sink registered, dropping transaction"),
        }
    }
}
