//! Generate robots.txt files.

use crate::classifier::Classification;
use crate::origin::Origin;
use tracing::warn;

/// Render robots.txt.
///
/// One `User-agent` group per agent in sorted order. A group whose disallow
/// set is empty gets a bare `Disallow:` (allow everything). The `Sitemap`
/// line is omitted when the origin is unknown.
pub fn robots_txt(
    classification: &Classification,
    origin: Option<&Origin>,
    sitemap_path: &str,
) -> String {
    let mut out = String::new();

    for (agent, paths) in classification.disallowed_by_agent() {
        out.push_str(&format!("User-agent: {agent}\n"));
        if paths.is_empty() {
            out.push_str("Disallow:\n");
        } else {
            for path in paths {
                out.push_str(&format!("Disallow: {path}\n"));
            }
        }
        out.push('\n');
    }

    match origin {
        Some(origin) => {
            out.push_str(&format!("Sitemap: {}\n", origin.url_for(sitemap_path)));
        }
        None => warn!("request origin unknown; omitting Sitemap line from robots.txt"),
    }

    out
}
