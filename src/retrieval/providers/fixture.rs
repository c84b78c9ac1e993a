// src/retrieval/providers/fixture.rs
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

use crate::retrieval::normalize::normalize_body;
use crate::retrieval::types::{OpportunityProvider, OpportunityRecord};
use crate::retrieval::RetrievalError;

/// Serves canned provider bodies per category. Offline demo mode and tests.
///
/// A category without a fixture answers like a provider 404.
#[derive(Debug, Clone, Default)]
pub struct FixtureProvider {
    bodies: HashMap<String, String>,
}

impl FixtureProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, category: &str, body: &str) -> Self {
        self.bodies.insert(category.to_string(), body.to_string());
        self
    }

    /// Loads `<dir>/<slug>.json` for each category name, where the slug is the
    /// lowercased name with non-alphanumerics collapsed to `_`. Missing files
    /// are skipped.
    pub fn from_dir<'a>(
        dir: &Path,
        categories: impl IntoIterator<Item = &'a str>,
    ) -> anyhow::Result<Self> {
        use anyhow::Context;

        let mut out = Self::new();
        for name in categories {
            let path = dir.join(format!("{}.json", fixture_slug(name)));
            if !path.exists() {
                continue;
            }
            let body = std::fs::read_to_string(&path)
                .with_context(|| format!("reading fixture {}", path.display()))?;
            out.bodies.insert(name.to_string(), body);
        }
        Ok(out)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

pub fn fixture_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    slug.trim_matches('_').to_string()
}

#[async_trait]
impl OpportunityProvider for FixtureProvider {
    async fn fetch_opportunities(
        &self,
        category: &str,
    ) -> Result<Vec<OpportunityRecord>, RetrievalError> {
        match self.bodies.get(category) {
            Some(body) => normalize_body(body),
            None => Err(RetrievalError::Status { status: 404 }),
        }
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
