//! Generate sitemap.xml and sitemap.txt files.

use crate::classifier::Classification;
use crate::config::{ChangeFrequency, RobotoConfig};
use crate::error::{Result, RobotoError};
use crate::origin::{absolute_or_path, Origin};
use chrono::NaiveDate;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::warn;

/// XML namespace of the sitemap protocol.
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Per-entry settings for sitemap.xml.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SitemapOptions {
    pub changefreq: ChangeFrequency,
    pub include_priority: bool,
}

impl From<&RobotoConfig> for SitemapOptions {
    fn from(config: &RobotoConfig) -> Self {
        Self {
            changefreq: config.changefreq,
            include_priority: config.include_priority,
        }
    }
}

/// Render sitemap.xml: one `<url>` per allowed path, sorted.
///
/// Without an origin each `<loc>` falls back to the bare path.
pub fn sitemap_xml(
    classification: &Classification,
    origin: Option<&Origin>,
    options: &SitemapOptions,
    lastmod: NaiveDate,
) -> Result<String> {
    if origin.is_none() {
        warn!("request origin unknown; sitemap.xml will contain relative locations");
    }

    let lastmod = lastmod.format("%Y-%m-%d").to_string();
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    write(
        &mut writer,
        Event::Start(BytesStart::new("urlset").with_attributes([("xmlns", SITEMAP_NAMESPACE)])),
    )?;

    for (path, priority) in classification.allowed_with_priority() {
        write(&mut writer, Event::Start(BytesStart::new("url")))?;
        write_text_element(&mut writer, "loc", &absolute_or_path(origin, path))?;
        write_text_element(&mut writer, "lastmod", &lastmod)?;
        write_text_element(&mut writer, "changefreq", options.changefreq.as_str())?;
        if options.include_priority {
            write_text_element(&mut writer, "priority", &format_priority(priority))?;
        }
        write(&mut writer, Event::End(BytesEnd::new("url")))?;
    }

    write(&mut writer, Event::End(BytesEnd::new("urlset")))?;

    let mut xml = String::from_utf8(writer.into_inner()).map_err(render_error)?;
    xml.push('\n');
    Ok(xml)
}

/// Render sitemap.txt: one URL per line, sorted.
pub fn sitemap_txt(classification: &Classification, origin: Option<&Origin>) -> String {
    if origin.is_none() {
        warn!("request origin unknown; sitemap.txt will contain relative locations");
    }

    classification
        .allowed()
        .map(|path| absolute_or_path(origin, path) + "\n")
        .collect()
}

/// Up to three decimals, trailing zeros dropped, at least one decimal kept
/// (`1.0`, `0.25`, `0.05`).
fn format_priority(priority: f64) -> String {
    let formatted = format!("{priority:.3}");
    let trimmed = formatted.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{trimmed}0")
    } else {
        trimmed.to_string()
    }
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer.write_event(event).map_err(render_error)
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    write(writer, Event::Start(BytesStart::new(name)))?;
    write(writer, Event::Text(BytesText::new(text)))?;
    write(writer, Event::End(BytesEnd::new(name)))
}

fn render_error(err: impl std::fmt::Display) -> RobotoError {
    RobotoError::Render {
        document: "sitemap.xml",
        reason: err.to_string(),
    }
}
