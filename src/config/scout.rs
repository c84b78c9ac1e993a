// src/config/scout.rs
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{env, fs};

use crate::categories::CategoryRegistry;
use crate::retrieval::providers::{FixtureProvider, HttpProvider};
use crate::retrieval::OpportunityProvider;

pub const DEFAULT_CONFIG_PATH: &str = "config/scout.toml";
pub const DEFAULT_PROVIDER_BASE_URL: &str = "http://localhost:8000";

pub const ENV_CONFIG_PATH: &str = "SCOUT_CONFIG_PATH";
pub const ENV_PROVIDER_BASE_URL: &str = "SCOUT_PROVIDER_BASE_URL";
pub const ENV_CATEGORIES_PATH: &str = "SCOUT_CATEGORIES_PATH";
pub const ENV_FIXTURES_DIR: &str = "SCOUT_FIXTURES_DIR";

fn default_base_url() -> String {
    DEFAULT_PROVIDER_BASE_URL.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoutConfig {
    /// Provider root; requests go to `{base}/opportunities`.
    #[serde(default = "default_base_url")]
    pub provider_base_url: String,
    /// Replaces the built-in category catalog.
    #[serde(default)]
    pub categories_path: Option<PathBuf>,
    /// Serve canned bodies from this directory instead of calling the provider.
    #[serde(default)]
    pub fixtures_dir: Option<PathBuf>,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            provider_base_url: default_base_url(),
            categories_path: None,
            fixtures_dir: None,
        }
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ScoutConfig {
    /// Load from an explicit TOML file (no env overrides).
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading scout config from {}", path.display()))?;
        let cfg: ScoutConfig = toml::from_str(&content)
            .with_context(|| format!("parsing scout config from {}", path.display()))?;
        Ok(cfg)
    }

    /// Resolve config using env var + fallbacks:
    /// 1) $SCOUT_CONFIG_PATH (must exist)
    /// 2) config/scout.toml
    /// 3) built-in defaults
    ///
    /// Then `SCOUT_PROVIDER_BASE_URL`, `SCOUT_CATEGORIES_PATH` and
    /// `SCOUT_FIXTURES_DIR` override individual fields.
    pub fn load_default() -> Result<Self> {
        let mut cfg = if let Some(p) = env_nonempty(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else {
            let pb = PathBuf::from(DEFAULT_CONFIG_PATH);
            if pb.exists() {
                Self::load_from(&pb)?
            } else {
                Self::default()
            }
        };
        cfg.apply_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(url) = env_nonempty(ENV_PROVIDER_BASE_URL) {
            self.provider_base_url = url;
        }
        if let Some(p) = env_nonempty(ENV_CATEGORIES_PATH) {
            self.categories_path = Some(PathBuf::from(p));
        }
        if let Some(p) = env_nonempty(ENV_FIXTURES_DIR) {
            self.fixtures_dir = Some(PathBuf::from(p));
        }
    }

    /// Base URL must be absolute http(s).
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(self.provider_base_url.trim())
            .with_context(|| format!("invalid provider_base_url `{}`", self.provider_base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!(
                "provider_base_url must be http(s), got `{}`",
                self.provider_base_url
            );
        }
        Ok(())
    }

    pub fn registry(&self) -> Result<CategoryRegistry> {
        match &self.categories_path {
            Some(p) => CategoryRegistry::load_from(p),
            None => CategoryRegistry::builtin(),
        }
    }

    /// Fixture provider when `fixtures_dir` is set, HTTP provider otherwise.
    pub fn build_provider(&self, registry: &CategoryRegistry) -> Result<Arc<dyn OpportunityProvider>> {
        if let Some(dir) = &self.fixtures_dir {
            let names = registry.list().iter().map(|c| c.name.as_str());
            let fixtures = FixtureProvider::from_dir(dir, names)?;
            tracing::info!(dir = %dir.display(), loaded = fixtures.len(), "using fixture provider");
            return Ok(Arc::new(fixtures));
        }
        let http = HttpProvider::new(&self.provider_base_url)?;
        tracing::info!(base_url = %self.provider_base_url, "using http provider");
        Ok(Arc::new(http))
    }
}
