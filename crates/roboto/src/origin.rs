//! Serving origin (scheme, host, port) used to build absolute URLs.

use crate::error::{Result, RobotoError};
use std::fmt;
use url::Url;

/// The scheme/host/port a document is being served from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl Origin {
    /// Parse the origin out of a full request URL.
    ///
    /// The port is always resolved: an explicit port wins, otherwise the
    /// scheme's well-known default is used.
    pub fn from_url(input: &str) -> Result<Self> {
        let url = Url::parse(input).map_err(|e| RobotoError::InvalidOrigin {
            input: input.to_string(),
            reason: e.to_string(),
        })?;

        let scheme = url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(RobotoError::InvalidOrigin {
                input: input.to_string(),
                reason: format!("unsupported scheme {scheme}"),
            });
        }

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| RobotoError::InvalidOrigin {
                input: input.to_string(),
                reason: "missing host".into(),
            })?;

        Ok(Self {
            scheme: scheme.to_string(),
            host: host.to_string(),
            port: url.port_or_known_default(),
        })
    }

    /// Build an origin from a scheme and a `Host` header value
    /// (`example.com` or `example.com:8080`).
    pub fn from_host_header(scheme: &str, host: &str) -> Result<Self> {
        let host = host.trim();
        if host.is_empty() || host.contains('/') || host.contains('@') {
            return Err(RobotoError::InvalidOrigin {
                input: host.to_string(),
                reason: "malformed host header".into(),
            });
        }
        Self::from_url(&format!("{}://{host}/", scheme.trim().to_ascii_lowercase()))
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Absolute URL for a path on this origin.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{self}{path}")
        } else {
            format!("{self}/{path}")
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        Ok(())
    }
}

/// Absolute URL when the origin is known, otherwise the bare path.
pub(crate) fn absolute_or_path(origin: Option<&Origin>, path: &str) -> String {
    match origin {
        Some(origin) => origin.url_for(path),
        None => path.to_string(),
    }
}
