//! Robot directives attached to handler groups and handlers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Sitemap priority used when a route carries no explicit priority.
pub const DEFAULT_PRIORITY: f64 = 1.0;

/// The robots.txt wildcard user agent.
pub const WILDCARD_AGENT: &str = "*";

/// An allow/disallow instruction declared at group (class) or handler
/// (method) scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Directive {
    /// Include the route in the sitemap with the given priority.
    Allow {
        #[serde(default = "default_priority")]
        priority: f64,
    },
    /// Exclude the route from crawling for the listed user agents.
    ///
    /// An empty set stands for the wildcard agent `*`.
    Disallow {
        #[serde(default)]
        user_agents: BTreeSet<String>,
    },
}

fn default_priority() -> f64 {
    DEFAULT_PRIORITY
}

impl Directive {
    /// `Allow` with the default priority of 1.0.
    pub fn allow() -> Self {
        Self::Allow {
            priority: DEFAULT_PRIORITY,
        }
    }

    pub fn allow_with_priority(priority: f64) -> Self {
        Self::Allow { priority }
    }

    /// `Disallow` for every crawler.
    pub fn disallow() -> Self {
        Self::Disallow {
            user_agents: BTreeSet::from([WILDCARD_AGENT.to_string()]),
        }
    }

    /// `Disallow` scoped to specific user agents.
    pub fn disallow_for<I, S>(agents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Disallow {
            user_agents: agents.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_disallow(&self) -> bool {
        matches!(self, Self::Disallow { .. })
    }
}

/// Normalize a declared agent set: trim names, map blanks and the empty set
/// to the wildcard agent.
pub(crate) fn normalize_agents(agents: &BTreeSet<String>) -> BTreeSet<String> {
    let mut normalized: BTreeSet<String> = agents
        .iter()
        .map(|agent| {
            let agent = agent.trim();
            if agent.is_empty() {
                WILDCARD_AGENT.to_string()
            } else {
                agent.to_string()
            }
        })
        .collect();

    if normalized.is_empty() {
        normalized.insert(WILDCARD_AGENT.to_string());
    }
    normalized
}
