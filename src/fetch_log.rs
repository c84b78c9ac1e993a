//! fetch_log.rs: in-memory ring of recent fetch outcomes for `/debug/fetches`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

const MAX_CAP: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchOutcome {
    Applied { records: usize },
    Failed { error: String },
    /// A newer fetch started before this one settled.
    Superseded,
}

#[derive(Debug, Clone, Serialize)]
pub struct FetchEntry {
    pub ts: DateTime<Utc>,
    pub token: u64,
    pub category: String,
    pub provider: &'static str,
    pub elapsed_ms: u64,
    pub outcome: FetchOutcome,
}

#[derive(Debug)]
pub struct FetchLog {
    inner: Mutex<VecDeque<FetchEntry>>,
    cap: usize,
}

impl FetchLog {
    pub fn with_capacity(cap: usize) -> Self {
        let cap = cap.clamp(1, MAX_CAP);
        Self {
            inner: Mutex::new(VecDeque::with_capacity(cap)),
            cap,
        }
    }

    pub fn push(&self, entry: FetchEntry) {
        let mut v = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        v.push_back(entry);
        while v.len() > self.cap {
            v.pop_front();
        }
    }

    /// Oldest first.
    pub fn snapshot_last_n(&self, n: usize) -> Vec<FetchEntry> {
        let v = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let start = v.len().saturating_sub(n);
        v.iter().skip(start).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for FetchLog {
    fn default() -> Self {
        Self::with_capacity(200)
    }
}
