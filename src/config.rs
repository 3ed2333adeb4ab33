use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::SmsResult;

/// Tuning for [`SmsMonitor`](crate::SmsMonitor). Missing fields take the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// How often the host should call `poll`
    pub poll_interval_secs: u64,
    /// Inbox messages read per poll while the app is active
    pub foreground_batch: usize,
    /// Inbox messages read per poll while the app is in the background
    pub background_batch: usize,
    /// Inbox messages read by `scan_recent`
    pub scan_batch: usize,
    /// Default window of `scan_recent`, in days
    pub scan_days: i64,
    /// Drop SMS that do not mention a bank before parsing
    pub require_bank_keyword: bool,
    /// Suppress repeats of a reference number already seen
    pub dedupe_by_reference: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 10,
            foreground_batch: 10,
            background_batch: 5,
            scan_batch: 100,
            scan_days: 7,
            require_bank_keyword: true,
            dedupe_by_reference: true,
        }
    }
}

impl MonitorConfig {
    pub fn from_json(content: &str) -> SmsResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}
