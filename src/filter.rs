// src/filter.rs
//! Temporal filter over retrieved records.
//!
//! Calendar comparisons happen in `now`'s time zone: each record instant is
//! converted into that zone before its year/month/day are compared.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::retrieval::OpportunityRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowSelector {
    #[default]
    All,
    Day,
    Month,
    Year,
}

impl WindowSelector {
    /// Control order in the UI.
    pub const ALL: [WindowSelector; 4] = [
        WindowSelector::All,
        WindowSelector::Day,
        WindowSelector::Month,
        WindowSelector::Year,
    ];

    /// Display label used on controls and in the empty state.
    pub fn label(self) -> &'static str {
        match self {
            WindowSelector::All => "All Time",
            WindowSelector::Day => "Today",
            WindowSelector::Month => "This Month",
            WindowSelector::Year => "This Year",
        }
    }

    /// Wire name (`all` / `day` / `month` / `year`).
    pub fn as_str(self) -> &'static str {
        match self {
            WindowSelector::All => "all",
            WindowSelector::Day => "day",
            WindowSelector::Month => "month",
            WindowSelector::Year => "year",
        }
    }
}

impl fmt::Display for WindowSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown time window `{0}` (expected all, day, month or year)")]
pub struct UnknownWindow(pub String);

impl FromStr for WindowSelector {
    type Err = UnknownWindow;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Ok(WindowSelector::All),
            "day" | "today" => Ok(WindowSelector::Day),
            "month" => Ok(WindowSelector::Month),
            "year" => Ok(WindowSelector::Year),
            _ => Err(UnknownWindow(s.to_string())),
        }
    }
}

/// Whether a record dated `date` belongs to `window` at `now`.
/// Undated records only pass `All`.
pub fn in_window<Tz: TimeZone>(
    date: Option<&DateTime<Utc>>,
    window: WindowSelector,
    now: &DateTime<Tz>,
) -> bool {
    if window == WindowSelector::All {
        return true;
    }
    let Some(date) = date else {
        return false;
    };
    let local = date.with_timezone(&now.timezone());
    match window {
        WindowSelector::All => true,
        WindowSelector::Day => local.date_naive() == now.date_naive(),
        WindowSelector::Month => local.year() == now.year() && local.month() == now.month(),
        WindowSelector::Year => local.year() == now.year(),
    }
}

/// Order-preserving filter. `All` returns the input unchanged.
pub fn filter<Tz: TimeZone>(
    records: &[OpportunityRecord],
    window: WindowSelector,
    now: &DateTime<Tz>,
) -> Vec<OpportunityRecord> {
    if window == WindowSelector::All {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| in_window(r.date.as_ref(), window, now))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn labels_and_wire_names() {
        assert_eq!(WindowSelector::Month.label(), "This Month");
        assert_eq!("today".parse::<WindowSelector>(), Ok(WindowSelector::Day));
        assert_eq!(" YEAR ".parse::<WindowSelector>(), Ok(WindowSelector::Year));
        assert!("week".parse::<WindowSelector>().is_err());
        assert_eq!(
            serde_json::to_string(&WindowSelector::Day).unwrap(),
            "\"day\""
        );
    }

    #[test]
    fn day_boundary_follows_now_zone() {
        let record = Utc.with_ymd_and_hms(2024, 6, 14, 23, 0, 0).unwrap();
        let now_utc = Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap();
        assert!(!in_window(Some(&record), WindowSelector::Day, &now_utc));

        // 23:00Z on the 14th is 01:00 on the 15th at +02:00.
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let now_local = now_utc.with_timezone(&tz);
        assert!(in_window(Some(&record), WindowSelector::Day, &now_local));
    }

    #[test]
    fn undated_only_passes_all() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap();
        assert!(in_window(None, WindowSelector::All, &now));
        for w in [WindowSelector::Day, WindowSelector::Month, WindowSelector::Year] {
            assert!(!in_window(None, w, &now));
        }
    }
}
