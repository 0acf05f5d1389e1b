//! Runtime configuration for classification and document rendering.

use crate::error::{Result, RobotoError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// How often crawlers should expect a page to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level configuration.
///
/// Every field has a default, so an empty JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotoConfig {
    /// Paths that serve robots.txt.
    pub robots_paths: Vec<String>,
    /// Path of the XML sitemap, also advertised in robots.txt.
    pub sitemap_xml_path: String,
    /// Path of the plain-text sitemap.
    pub sitemap_txt_path: String,
    /// `changefreq` value written for every sitemap entry.
    pub changefreq: ChangeFrequency,
    /// Emit a `<priority>` element per sitemap entry.
    pub include_priority: bool,
    /// Agents that always get a robots.txt block, even with nothing disallowed.
    pub declared_agents: Vec<String>,
    /// List routes disallowed only for named agents in the sitemap too.
    pub agent_scoped_in_sitemap: bool,
    /// Upper bound on memoized documents per classification snapshot.
    /// Requests past the bound (new origins) are rendered but not stored.
    pub cache_capacity: usize,
}

impl Default for RobotoConfig {
    fn default() -> Self {
        Self {
            robots_paths: vec!["/robots.txt".to_string()],
            sitemap_xml_path: "/sitemap.xml".to_string(),
            sitemap_txt_path: "/sitemap.txt".to_string(),
            changefreq: ChangeFrequency::default(),
            include_priority: false,
            declared_agents: Vec::new(),
            agent_scoped_in_sitemap: false,
            cache_capacity: 64,
        }
    }
}

impl RobotoConfig {
    /// Parse a JSON config document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| RobotoError::Config(e.to_string()))
    }

    /// Load a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| RobotoError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// The legacy robots aliases served by older deployments.
    pub fn with_legacy_robots_aliases(mut self) -> Self {
        for alias in ["/robots", "/robots.txt", "/robot", "/robot.txt"] {
            if !self.robots_paths.iter().any(|p| p == alias) {
                self.robots_paths.push(alias.to_string());
            }
        }
        self
    }
}
