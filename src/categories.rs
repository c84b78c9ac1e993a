// src/categories.rs
//! Category registry: the static, ordered catalog shown in the selector.
//!
//! Authored as TOML (`config/categories.toml`, embedded at build time) and
//! optionally replaced from a file at startup.

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub const DEFAULT_CATEGORIES_TOML: &str = include_str!("../config/categories.toml");

/// Layout strategy chosen per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderVariant {
    #[default]
    Default,
    LinkList,
    Profile,
}

impl RenderVariant {
    /// Time filtering only makes sense for the dated card grid.
    pub fn shows_window_controls(self) -> bool {
        matches!(self, RenderVariant::Default)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RenderVariant::Default => "default",
            RenderVariant::LinkList => "link-list",
            RenderVariant::Profile => "profile",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub variant: RenderVariant,
}

impl Category {
    pub fn new(name: impl Into<String>, variant: RenderVariant) -> Self {
        Self {
            name: name.into(),
            link: None,
            variant,
        }
    }

    pub fn shows_window_controls(&self) -> bool {
        self.variant.shows_window_controls()
    }
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    categories: Vec<Category>,
}

/// Immutable, ordered list of categories. Names are unique.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

impl CategoryRegistry {
    /// Build from the catalog compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(DEFAULT_CATEGORIES_TOML).context("parsing built-in categories")
    }

    /// Load from an explicit TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading categories from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("parsing categories from {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let file: RegistryFile = toml::from_str(s)?;
        Self::new(file.categories)
    }

    /// Validates authored data: non-empty, no blank or duplicate names.
    pub fn new(categories: Vec<Category>) -> Result<Self> {
        if categories.is_empty() {
            bail!("category registry is empty");
        }
        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(categories.len());
        for mut c in categories {
            c.name = c.name.trim().to_string();
            if c.name.is_empty() {
                bail!("category with blank name");
            }
            if !seen.insert(c.name.clone()) {
                return Err(anyhow!("duplicate category name `{}`", c.name));
            }
            c.link = c.link.filter(|l| !l.trim().is_empty());
            out.push(c);
        }
        Ok(Self { categories: out })
    }

    /// Display order.
    pub fn list(&self) -> &[Category] {
        &self.categories
    }

    pub fn find(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// First entry; used when a request omits the category.
    pub fn default_category(&self) -> &Category {
        // `new` rejects empty registries
        &self.categories[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_loads_in_order() {
        let reg = CategoryRegistry::builtin().unwrap();
        assert_eq!(reg.default_category().name, "PFAS");
        assert_eq!(reg.list()[1].name, "Soil Remediation");
        assert_eq!(
            reg.find("Company Profile").map(|c| c.variant),
            Some(RenderVariant::Profile)
        );
        assert_eq!(
            reg.find("Industry News").map(|c| c.variant),
            Some(RenderVariant::LinkList)
        );
        assert!(reg.find("pfas").is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let toml = r#"
[[categories]]
name = "PFAS"

[[categories]]
name = " PFAS "
"#;
        let err = CategoryRegistry::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("duplicate"), "{err}");
    }

    #[test]
    fn blank_and_empty_registries_are_rejected() {
        assert!(CategoryRegistry::new(vec![]).is_err());
        assert!(CategoryRegistry::new(vec![Category::new("  ", RenderVariant::Default)]).is_err());
    }

    #[test]
    fn only_default_variant_shows_window_controls() {
        assert!(RenderVariant::Default.shows_window_controls());
        assert!(!RenderVariant::LinkList.shows_window_controls());
        assert!(!RenderVariant::Profile.shows_window_controls());
    }
}
