// src/dashboard.rs
//! Orchestrates the session: category/window events, provider fetches and
//! rendering. The session lock is never held across an `.await`.

use chrono::{DateTime, TimeZone, Utc};
use metrics::{counter, gauge};
use std::fmt::Display;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tracing::{info, warn};

use crate::categories::CategoryRegistry;
use crate::fetch_log::{FetchEntry, FetchLog, FetchOutcome};
use crate::filter::{UnknownWindow, WindowSelector};
use crate::retrieval::{ensure_metrics_described, OpportunityProvider};
use crate::session::{RequestToken, SessionEvent, SessionState};
use crate::view::{render_session, ViewModel};

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("unknown category `{0}`")]
    UnknownCategory(String),
    #[error(transparent)]
    UnknownWindow(#[from] UnknownWindow),
}

pub struct Dashboard {
    registry: Arc<CategoryRegistry>,
    provider: Arc<dyn OpportunityProvider>,
    session: Mutex<SessionState>,
    log: FetchLog,
}

impl Dashboard {
    /// Starts on the registry's default category with nothing fetched yet.
    pub fn new(registry: Arc<CategoryRegistry>, provider: Arc<dyn OpportunityProvider>) -> Self {
        ensure_metrics_described();
        let session = SessionState::new(registry.default_category().clone());
        Self {
            registry,
            provider,
            session: Mutex::new(session),
            log: FetchLog::default(),
        }
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    pub fn fetch_log(&self) -> &FetchLog {
        &self.log
    }

    pub fn snapshot(&self) -> SessionState {
        self.lock().clone()
    }

    /// False until the first fetch has been started.
    pub fn has_fetched(&self) -> bool {
        self.lock().latest_token() != RequestToken::default()
    }

    pub fn view(&self) -> ViewModel {
        self.view_at(&Utc::now())
    }

    pub fn view_at<Tz>(&self, now: &DateTime<Tz>) -> ViewModel
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        render_session(&self.lock(), now)
    }

    /// Switch category and fetch it. Unknown names leave the session untouched.
    pub async fn select_category(&self, name: &str) -> Result<ViewModel, DashboardError> {
        let category = self
            .registry
            .find(name)
            .cloned()
            .ok_or_else(|| DashboardError::UnknownCategory(name.to_string()))?;
        self.transition(SessionEvent::CategorySelected(category), &Utc::now(), |_| ());
        Ok(self.refresh().await)
    }

    pub fn select_window(&self, window: WindowSelector) -> ViewModel {
        let now = Utc::now();
        self.transition(SessionEvent::WindowSelected(window), &now, |s| {
            gauge!("scout_visible_records").set(s.visible().len() as f64);
            render_session(s, &now)
        })
    }

    /// Re-read the active category. A newer refresh supersedes this one.
    pub async fn refresh(&self) -> ViewModel {
        let (token, category) = self.transition(SessionEvent::FetchStarted, &Utc::now(), |s| {
            (s.latest_token(), s.category().name.clone())
        });
        counter!("scout_fetch_total").increment(1);

        let t0 = Instant::now();
        let result = self.provider.fetch_opportunities(&category).await;
        let elapsed_ms = u64::try_from(t0.elapsed().as_millis()).unwrap_or(u64::MAX);

        let (event, mut outcome) = match result {
            Ok(records) => {
                let outcome = FetchOutcome::Applied {
                    records: records.len(),
                };
                (SessionEvent::FetchSucceeded { token, records }, outcome)
            }
            Err(e) => {
                warn!(error = %e, provider = self.provider.name(), %category, "retrieval failed; showing empty results");
                counter!("scout_fetch_errors_total").increment(1);
                let outcome = FetchOutcome::Failed {
                    error: e.to_string(),
                };
                (SessionEvent::FetchFailed { token }, outcome)
            }
        };

        let now = Utc::now();
        let (stale, view) = self.transition(event, &now, |s| {
            let stale = !s.is_current(token);
            if !stale {
                gauge!("scout_visible_records").set(s.visible().len() as f64);
            }
            (stale, render_session(s, &now))
        });

        if stale {
            counter!("scout_fetch_stale_total").increment(1);
            outcome = FetchOutcome::Superseded;
        } else if let FetchOutcome::Applied { records } = &outcome {
            info!(%category, records, elapsed_ms, token = token.0, "fetch applied");
        }

        self.log.push(FetchEntry {
            ts: now,
            token: token.0,
            category,
            provider: self.provider.name(),
            elapsed_ms,
            outcome,
        });
        view
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `event` under the lock and read something out of the new state.
    fn transition<R>(
        &self,
        event: SessionEvent,
        now: &DateTime<Utc>,
        read: impl FnOnce(&SessionState) -> R,
    ) -> R {
        let mut guard = self.lock();
        let placeholder = SessionState::new(guard.category().clone());
        let current = std::mem::replace(&mut *guard, placeholder);
        *guard = current.apply(event, now);
        read(&guard)
    }
}
