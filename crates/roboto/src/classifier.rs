//! Route classification: resolve every GET route into the allowed set and the
//! per-agent disallow map.

use crate::config::RobotoConfig;
use crate::directive::{DEFAULT_PRIORITY, WILDCARD_AGENT};
use crate::error::Result;
use crate::registry::RouteSource;
use crate::resolver::{resolve, Resolution};
use crate::route::RouteDescriptor;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Knobs that change how resolutions are accumulated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifierOptions {
    /// Agents that always get an entry in the disallow map.
    pub declared_agents: Vec<String>,
    /// Also list routes in the sitemap when they are disallowed only for
    /// named agents (no `*`).
    pub agent_scoped_in_sitemap: bool,
}

impl From<&RobotoConfig> for ClassifierOptions {
    fn from(config: &RobotoConfig) -> Self {
        Self {
            declared_agents: config.declared_agents.clone(),
            agent_scoped_in_sitemap: config.agent_scoped_in_sitemap,
        }
    }
}

/// The classified route table.
///
/// `allowed` feeds the sitemaps; `disallowed` feeds robots.txt. A path can be
/// in both when it is disallowed only for specific agents and the options ask
/// for agent-scoped paths in the sitemap.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Classification {
    allowed: BTreeMap<String, f64>,
    disallowed: BTreeMap<String, BTreeSet<String>>,
}

impl Classification {
    /// Allowed paths in lexicographic order.
    pub fn allowed(&self) -> impl Iterator<Item = &str> {
        self.allowed.keys().map(String::as_str)
    }

    /// Allowed paths with their sitemap priority.
    pub fn allowed_with_priority(&self) -> impl Iterator<Item = (&str, f64)> {
        self.allowed.iter().map(|(path, p)| (path.as_str(), *p))
    }

    pub fn is_allowed(&self, path: &str) -> bool {
        self.allowed.contains_key(path)
    }

    pub fn priority(&self, path: &str) -> Option<f64> {
        self.allowed.get(path).copied()
    }

    /// Disallowed paths keyed by user agent, both in sorted order.
    pub fn disallowed_by_agent(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.disallowed
    }

    pub fn disallowed_for(&self, agent: &str) -> Option<&BTreeSet<String>> {
        self.disallowed.get(agent)
    }

    pub fn is_disallowed_for(&self, agent: &str, path: &str) -> bool {
        self.disallowed
            .get(agent)
            .is_some_and(|paths| paths.contains(path))
    }

    pub fn allowed_len(&self) -> usize {
        self.allowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty() && self.disallowed.is_empty()
    }

    fn allow(&mut self, path: &str, priority: f64) {
        self.allowed
            .entry(path.to_string())
            .and_modify(|existing| *existing = existing.max(priority))
            .or_insert(priority);
    }

    fn disallow(&mut self, agent: &str, path: &str) {
        self.disallowed
            .entry(agent.to_string())
            .or_default()
            .insert(path.to_string());
    }
}

/// Classify a list of route descriptors.
pub fn classify(routes: &[RouteDescriptor], options: &ClassifierOptions) -> Classification {
    let mut result = Classification::default();
    let mut skipped = 0usize;

    for route in routes {
        if !route.accepts_get() {
            debug!(paths = ?route.paths(), "skipping route without GET");
            skipped += 1;
            continue;
        }

        match resolve(route) {
            Resolution::Allowed { priority } => {
                for path in route.paths() {
                    result.allow(path, priority);
                }
            }
            Resolution::DisallowedFor(agents) => {
                for agent in &agents {
                    for path in route.paths() {
                        result.disallow(agent, path);
                    }
                }
                if options.agent_scoped_in_sitemap && !agents.contains(WILDCARD_AGENT) {
                    for path in route.paths() {
                        result.allow(path, DEFAULT_PRIORITY);
                    }
                }
            }
        }
    }

    for agent in &options.declared_agents {
        let agent = agent.trim();
        if !agent.is_empty() {
            result.disallowed.entry(agent.to_string()).or_default();
        }
    }

    info!(
        routes = routes.len(),
        skipped,
        allowed = result.allowed.len(),
        agents = result.disallowed.len(),
        "classified route table"
    );

    result
}

/// Enumerate routes from the host and classify them.
///
/// Enumeration failures are returned as-is; nothing is classified from a
/// partial table.
pub fn classify_source(
    source: &dyn RouteSource,
    options: &ClassifierOptions,
) -> Result<Classification> {
    let routes = source.routes()?;
    Ok(classify(&routes, options))
}
