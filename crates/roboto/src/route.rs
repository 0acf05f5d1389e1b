//! Route descriptors: one discovered handler with its paths, methods, and
//! directives.

use crate::directive::Directive;
use crate::error::{Result, RobotoError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// HTTP request methods a handler can accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Trace,
    Connect,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
            Self::Connect => "CONNECT",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "HEAD" => Ok(Self::Head),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "OPTIONS" => Ok(Self::Options),
            "TRACE" => Ok(Self::Trace),
            "CONNECT" => Ok(Self::Connect),
            other => Err(format!("unknown HTTP method: {other}")),
        }
    }
}

/// One discovered endpoint.
///
/// Built once per handler when the host enumerates its routes and never
/// mutated afterwards. Paths are normalized to start with `/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteDescriptor {
    paths: Vec<String>,
    methods: BTreeSet<HttpMethod>,
    class_directive: Option<Directive>,
    method_directive: Option<Directive>,
}

impl RouteDescriptor {
    /// Create a descriptor. Fails when no non-blank path is bound.
    ///
    /// An empty method set means the handler accepts every method.
    pub fn new<I, S>(paths: I, methods: impl IntoIterator<Item = HttpMethod>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized = Vec::new();
        for path in paths {
            let path = normalize_path(path.as_ref());
            if !path.is_empty() && !normalized.contains(&path) {
                normalized.push(path);
            }
        }

        if normalized.is_empty() {
            return Err(RobotoError::InvalidRoute {
                handler: "<anonymous>".into(),
                reason: "no paths bound".into(),
            });
        }

        Ok(Self {
            paths: normalized,
            methods: methods.into_iter().collect(),
            class_directive: None,
            method_directive: None,
        })
    }

    /// Shorthand for a single-path GET handler.
    pub fn get(path: &str) -> Result<Self> {
        Self::new([path], [HttpMethod::Get])
    }

    /// Shorthand for a single-path POST handler.
    pub fn post(path: &str) -> Result<Self> {
        Self::new([path], [HttpMethod::Post])
    }

    /// Attach the directive declared on the enclosing handler group.
    pub fn with_class_directive(mut self, directive: Option<Directive>) -> Self {
        self.class_directive = directive;
        self
    }

    /// Attach the directive declared on the handler itself.
    pub fn with_method_directive(mut self, directive: Option<Directive>) -> Self {
        self.method_directive = directive;
        self
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn methods(&self) -> &BTreeSet<HttpMethod> {
        &self.methods
    }

    pub fn class_directive(&self) -> Option<&Directive> {
        self.class_directive.as_ref()
    }

    pub fn method_directive(&self) -> Option<&Directive> {
        self.method_directive.as_ref()
    }

    /// Whether the handler answers GET requests and is therefore eligible for
    /// classification.
    pub fn accepts_get(&self) -> bool {
        self.methods.is_empty() || self.methods.contains(&HttpMethod::Get)
    }
}

/// Trim a path pattern and make it absolute. Blank input stays blank.
pub(crate) fn normalize_path(path: &str) -> String {
    let path = path.trim();
    if path.is_empty() || path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse() {
        assert_eq!("get".parse::<HttpMethod>(), Ok(HttpMethod::Get));
        assert_eq!(" Post ".parse::<HttpMethod>(), Ok(HttpMethod::Post));
        assert!("FETCH".parse::<HttpMethod>().is_err());
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_paths_are_normalized() {
        let route = RouteDescriptor::new(["bar/3", " /bar/4 ", "/bar/4", ""], [HttpMethod::Get])
            .unwrap();
        assert_eq!(route.paths(), ["/bar/3", "/bar/4"]);
    }

    #[test]
    fn test_requires_a_path() {
        let err = RouteDescriptor::new(["  "], [HttpMethod::Get]).unwrap_err();
        assert!(matches!(err, RobotoError::InvalidRoute { .. }));
    }

    #[test]
    fn test_get_eligibility() {
        assert!(RouteDescriptor::get("/foo/1").unwrap().accepts_get());
        assert!(!RouteDescriptor::post("/foo/3").unwrap().accepts_get());
        assert!(RouteDescriptor::new(["/any"], Vec::new()).unwrap().accepts_get());
        assert!(
            RouteDescriptor::new(["/both"], [HttpMethod::Post, HttpMethod::Get])
                .unwrap()
                .accepts_get()
        );
    }
}
