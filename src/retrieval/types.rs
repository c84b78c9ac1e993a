// src/retrieval/types.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RetrievalError;

/// Response shape a record was normalized from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordVariant {
    Standard,
    LinkOnly,
    Profile,
}

/// Company profile fields, present only on `RecordVariant::Profile`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub company_name: String,
    pub founded: Option<String>,
    pub product_range: Vec<String>,
    pub website: Option<String>,
    pub address: Option<String>,
}

/// Canonical record every provider normalizes into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpportunityRecord {
    pub variant: RecordVariant,
    pub id: Option<String>,
    pub title: String,
    pub summary: Option<String>,
    pub source: Option<String>,
    /// Parsed once at the boundary; unparsable dates are `None`.
    pub date: Option<DateTime<Utc>>,
    pub link: Option<String>,
    pub profile: Option<CompanyProfile>,
}

impl OpportunityRecord {
    /// Minimal standard record, mostly for tests and fixtures.
    pub fn standard(title: impl Into<String>, date: Option<DateTime<Utc>>) -> Self {
        Self {
            variant: RecordVariant::Standard,
            id: None,
            title: title.into(),
            summary: None,
            source: None,
            date,
            link: None,
            profile: None,
        }
    }

    /// Stable list identity: record id, else the positional index.
    pub fn display_id(&self, index: usize) -> String {
        self.id.clone().unwrap_or_else(|| index.to_string())
    }
}

#[async_trait::async_trait]
pub trait OpportunityProvider: Send + Sync {
    /// Re-reads remote state for `category`; never cached.
    async fn fetch_opportunities(
        &self,
        category: &str,
    ) -> Result<Vec<OpportunityRecord>, RetrievalError>;
    fn name(&self) -> &'static str;
}
