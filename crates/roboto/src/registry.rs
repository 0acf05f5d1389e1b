//! Explicit route registration.
//!
//! Hosts describe their handlers as [`HandlerGroup`]s (the class scope) that
//! hold [`Handler`]s (the method scope). A [`RouteRegistry`] flattens the
//! groups into [`RouteDescriptor`]s for the classifier. Anything else that can
//! list descriptors implements [`RouteSource`] directly.

use crate::directive::Directive;
use crate::error::{Result, RobotoError};
use crate::route::{HttpMethod, RouteDescriptor};
use std::collections::BTreeSet;

/// Pull-based supplier of the host's route table.
///
/// Called once at startup and again on explicit reload. An error aborts the
/// classification; no partial table is used.
pub trait RouteSource: Send + Sync {
    fn routes(&self) -> Result<Vec<RouteDescriptor>>;
}

impl RouteSource for Vec<RouteDescriptor> {
    fn routes(&self) -> Result<Vec<RouteDescriptor>> {
        Ok(self.clone())
    }
}

impl RouteSource for [RouteDescriptor] {
    fn routes(&self) -> Result<Vec<RouteDescriptor>> {
        Ok(self.to_vec())
    }
}

/// Adapts a closure into a [`RouteSource`].
pub struct FnSource<F>(pub F);

impl<F> RouteSource for FnSource<F>
where
    F: Fn() -> Result<Vec<RouteDescriptor>> + Send + Sync,
{
    fn routes(&self) -> Result<Vec<RouteDescriptor>> {
        (self.0)()
    }
}

/// A single request handler (method scope).
#[derive(Debug, Clone)]
pub struct Handler {
    name: String,
    paths: Vec<String>,
    methods: BTreeSet<HttpMethod>,
    directive: Option<Directive>,
}

impl Handler {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            paths: Vec::new(),
            methods: BTreeSet::new(),
            directive: None,
        }
    }

    /// A GET handler bound to one path.
    pub fn get(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name).path(path).method(HttpMethod::Get)
    }

    /// A POST handler bound to one path.
    pub fn post(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name).path(path).method(HttpMethod::Post)
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.paths.push(path.into());
        self
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.methods.insert(method);
        self
    }

    /// Attach a method-level directive.
    pub fn directive(mut self, directive: Directive) -> Self {
        self.directive = Some(directive);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A group of handlers sharing a class-level directive.
#[derive(Debug, Clone)]
pub struct HandlerGroup {
    name: String,
    directive: Option<Directive>,
    handlers: Vec<Handler>,
}

impl HandlerGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            directive: None,
            handlers: Vec::new(),
        }
    }

    /// Attach a class-level directive.
    pub fn directive(mut self, directive: Directive) -> Self {
        self.directive = Some(directive);
        self
    }

    pub fn handler(mut self, handler: Handler) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handlers(&self) -> &[Handler] {
        &self.handlers
    }

    fn descriptors(&self) -> Result<Vec<RouteDescriptor>> {
        self.handlers
            .iter()
            .map(|handler| {
                RouteDescriptor::new(&handler.paths, handler.methods.iter().copied())
                    .map_err(|err| match err {
                        RobotoError::InvalidRoute { reason, .. } => RobotoError::InvalidRoute {
                            handler: format!("{}::{}", self.name, handler.name),
                            reason,
                        },
                        other => other,
                    })
                    .map(|route| {
                        route
                            .with_class_directive(self.directive.clone())
                            .with_method_directive(handler.directive.clone())
                    })
            })
            .collect()
    }
}

/// Registry of handler groups, built by the host at startup.
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    groups: Vec<HandlerGroup>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, group: HandlerGroup) -> &mut Self {
        self.groups.push(group);
        self
    }

    /// Builder-style variant of [`register`](Self::register).
    pub fn with_group(mut self, group: HandlerGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn groups(&self) -> &[HandlerGroup] {
        &self.groups
    }

    /// Number of registered handlers across all groups.
    pub fn handler_count(&self) -> usize {
        self.groups.iter().map(|g| g.handlers.len()).sum()
    }
}

impl RouteSource for RouteRegistry {
    fn routes(&self) -> Result<Vec<RouteDescriptor>> {
        let mut routes = Vec::with_capacity(self.handler_count());
        for group in &self.groups {
            routes.extend(group.descriptors()?);
        }
        Ok(routes)
    }
}
