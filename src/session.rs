// src/session.rs
//! Session state container with pure `(state, event) -> state` transitions.
//!
//! Fetch results carry the token issued by `FetchStarted`; only the latest
//! token may settle the session, anything older is dropped silently.
//! Switching category also advances the token, so fetches for the previous
//! category can never settle under the new one.

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::categories::Category;
use crate::filter::{filter, WindowSelector};
use crate::retrieval::OpportunityRecord;

/// Monotonically increasing fetch generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct RequestToken(pub u64);

impl RequestToken {
    fn next(self) -> Self {
        RequestToken(self.0 + 1)
    }
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    CategorySelected(Category),
    WindowSelected(WindowSelector),
    FetchStarted,
    FetchSucceeded {
        token: RequestToken,
        records: Vec<OpportunityRecord>,
    },
    FetchFailed {
        token: RequestToken,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    category: Category,
    window: WindowSelector,
    records: Vec<OpportunityRecord>,
    visible: Vec<OpportunityRecord>,
    is_loading: bool,
    latest_token: RequestToken,
}

impl SessionState {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            window: WindowSelector::All,
            records: Vec::new(),
            visible: Vec::new(),
            is_loading: false,
            latest_token: RequestToken::default(),
        }
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Window the user picked, even if the category hides the controls.
    pub fn window(&self) -> WindowSelector {
        self.window
    }

    /// Window actually applied: categories without window controls see everything.
    pub fn effective_window(&self) -> WindowSelector {
        if self.category.shows_window_controls() {
            self.window
        } else {
            WindowSelector::All
        }
    }

    /// Last full fetch.
    pub fn records(&self) -> &[OpportunityRecord] {
        &self.records
    }

    /// Records after the effective window.
    pub fn visible(&self) -> &[OpportunityRecord] {
        &self.visible
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Current fetch generation; advanced by `FetchStarted` and by category changes.
    pub fn latest_token(&self) -> RequestToken {
        self.latest_token
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token == self.latest_token
    }

    pub fn apply<Tz: TimeZone>(mut self, event: SessionEvent, now: &DateTime<Tz>) -> Self {
        match event {
            SessionEvent::CategorySelected(category) => {
                if category != self.category {
                    self.category = category;
                    self.records.clear();
                    self.visible.clear();
                    // Anything still in flight belongs to the old category.
                    self.latest_token = self.latest_token.next();
                }
            }
            SessionEvent::WindowSelected(window) => {
                self.window = window;
                self.recompute(now);
            }
            SessionEvent::FetchStarted => {
                self.latest_token = self.latest_token.next();
                self.is_loading = true;
            }
            SessionEvent::FetchSucceeded { token, records } => {
                if !self.is_current(token) {
                    tracing::debug!(token = token.0, latest = self.latest_token.0, "stale fetch result dropped");
                    return self;
                }
                self.records = records;
                self.recompute(now);
                self.is_loading = false;
            }
            SessionEvent::FetchFailed { token } => {
                if !self.is_current(token) {
                    tracing::debug!(token = token.0, latest = self.latest_token.0, "stale fetch failure dropped");
                    return self;
                }
                self.records.clear();
                self.visible.clear();
                self.is_loading = false;
            }
        }
        self
    }

    fn recompute<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) {
        self.visible = filter(&self.records, self.effective_window(), now);
    }
}
