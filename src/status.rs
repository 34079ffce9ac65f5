// SPDX-License-Identifier: MIT

//! Process-wide status block: counters mutated by producers and the
//! sender, read by the status endpoint. Counters are atomic; the
//! string/option fields are guarded by a plain mutex. Readers of
//! `snapshot()` may observe a torn view across fields updated in the
//! same instant by different components — acceptable for a stats
//! endpoint per spec.md §5.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use serde::Serialize;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub version: String,
    pub last_post_utc: Option<String>,
    pub errors: u64,
    pub dropped: u64,
    pub update_available: bool,
    pub update_version: Option<String>,
    pub last_update_check_utc: Option<String>,
}

#[derive(Default)]
struct MutableFields {
    last_post_utc: Option<String>,
    update_version: Option<String>,
    last_update_check_utc: Option<String>,
}

pub struct Status {
    errors: AtomicU64,
    dropped: AtomicU64,
    update_available: AtomicBool,
    fields: Mutex<MutableFields>,
}

impl Status {
    pub fn new() -> Self {
        Self {
            errors: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            update_available: AtomicBool::new(false),
            fields: Mutex::new(MutableFields::default()),
        }
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_drop(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set_last_post_now(&self) {
        let now = now_utc_string();
        self.fields.lock().unwrap().last_post_utc = Some(now);
    }

    pub fn set_update_check(&self, available: bool, version: Option<String>) {
        self.update_available.store(available, Ordering::Relaxed);
        let mut fields = self.fields.lock().unwrap();
        fields.update_version = version;
        fields.last_update_check_utc = Some(now_utc_string());
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        let fields = self.fields.lock().unwrap();
        StatusSnapshot {
            version: VERSION.to_string(),
            last_post_utc: fields.last_post_utc.clone(),
            errors: self.errors.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            update_available: self.update_available.load(Ordering::Relaxed),
            update_version: fields.update_version.clone(),
            last_update_check_utc: fields.last_update_check_utc.clone(),
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::new()
    }
}

/// Current UTC time formatted as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn now_utc_string() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let status = Status::new();
        status.record_error();
        status.record_error();
        status.record_drop();
        let snap = status.snapshot();
        assert_eq!(snap.errors, 2);
        assert_eq!(snap.dropped, 1);
    }

    #[test]
    fn last_post_is_set_on_success() {
        let status = Status::new();
        assert!(status.snapshot().last_post_utc.is_none());
        status.set_last_post_now();
        assert!(status.snapshot().last_post_utc.is_some());
    }

    #[test]
    fn update_check_resets_when_no_update_available() {
        let status = Status::new();
        status.set_update_check(true, Some("9.9.9".to_string()));
        assert!(status.snapshot().update_available);
        status.set_update_check(false, None);
        let snap = status.snapshot();
        assert!(!snap.update_available);
        assert!(snap.update_version.is_none());
    }
}
