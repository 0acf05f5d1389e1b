//! Document generators: robots.txt, sitemap.xml, sitemap.txt.
//!
//! All generators are pure functions of the classification, the serving
//! origin, and the render date. Output order is lexicographic so documents are
//! byte-for-byte reproducible.

pub mod robots;
pub mod sitemap;

pub use robots::robots_txt;
pub use sitemap::{sitemap_txt, sitemap_xml, SitemapOptions, SITEMAP_NAMESPACE};

use crate::classifier::Classification;
use crate::config::RobotoConfig;
use crate::error::Result;
use crate::origin::Origin;
use chrono::NaiveDate;
use std::fmt;

/// The documents this crate can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    RobotsTxt,
    SitemapXml,
    SitemapTxt,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [Self::RobotsTxt, Self::SitemapXml, Self::SitemapTxt];

    /// MIME type to serve the document with.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::RobotsTxt | Self::SitemapTxt => "text/plain; charset=utf-8",
            Self::SitemapXml => "application/xml",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::RobotsTxt => "robots.txt",
            Self::SitemapXml => "sitemap.xml",
            Self::SitemapTxt => "sitemap.txt",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Render one document kind.
pub fn render(
    kind: DocumentKind,
    classification: &Classification,
    origin: Option<&Origin>,
    config: &RobotoConfig,
    lastmod: NaiveDate,
) -> Result<String> {
    match kind {
        DocumentKind::RobotsTxt => Ok(robots_txt(
            classification,
            origin,
            &config.sitemap_xml_path,
        )),
        DocumentKind::SitemapXml => sitemap_xml(
            classification,
            origin,
            &SitemapOptions::from(config),
            lastmod,
        ),
        DocumentKind::SitemapTxt => Ok(sitemap_txt(classification, origin)),
    }
}
