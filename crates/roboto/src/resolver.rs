//! Directive resolution: combine class- and method-level directives into the
//! effective instruction for a route.
//!
//! Rules, in order:
//! 1. No directive at either scope: allowed with the default priority.
//! 2. Method `Allow`: allowed with the method's priority, whatever the class says.
//! 3. Method `Disallow`: disallowed for the method's agents, plus the class's
//!    agents when the class is also `Disallow`.
//! 4. Class `Disallow` only: disallowed for the class's agents.
//! 5. Class `Allow` only: allowed with the class's priority.

use crate::directive::{normalize_agents, Directive, DEFAULT_PRIORITY};
use crate::route::RouteDescriptor;
use std::collections::BTreeSet;
use tracing::warn;

/// Effective classification of a single route.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Allowed { priority: f64 },
    /// Disallowed for the listed agents; never empty (`*` stands for all).
    DisallowedFor(BTreeSet<String>),
}

impl Resolution {
    fn default_allowed() -> Self {
        Self::Allowed {
            priority: DEFAULT_PRIORITY,
        }
    }
}

/// Resolve the effective directive for a route.
pub fn resolve(route: &RouteDescriptor) -> Resolution {
    match (route.class_directive(), route.method_directive()) {
        (None, None) => Resolution::default_allowed(),
        (_, Some(Directive::Allow { priority })) => allowed(route, *priority),
        (class, Some(Directive::Disallow { user_agents })) => {
            let mut agents = normalize_agents(user_agents);
            if let Some(Directive::Disallow {
                user_agents: class_agents,
            }) = class
            {
                agents.extend(normalize_agents(class_agents));
            }
            Resolution::DisallowedFor(agents)
        }
        (Some(Directive::Disallow { user_agents }), None) => {
            Resolution::DisallowedFor(normalize_agents(user_agents))
        }
        (Some(Directive::Allow { priority }), None) => allowed(route, *priority),
    }
}

/// Sitemap priorities are defined on `[0.0, 1.0]`; anything else cannot be
/// classified and fails open to the default.
fn allowed(route: &RouteDescriptor, priority: f64) -> Resolution {
    if priority.is_finite() && (0.0..=1.0).contains(&priority) {
        Resolution::Allowed { priority }
    } else {
        warn!(
            paths = ?route.paths(),
            priority,
            "unclassifiable allow priority; falling back to default"
        );
        Resolution::default_allowed()
    }
}
