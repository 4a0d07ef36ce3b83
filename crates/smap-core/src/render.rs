//! Sitemap XML rendering.
//!
//! Serializes a [`SitemapDocument`] with quick-xml. The element order inside
//! each `url` is fixed: `loc`, `lastmod`, `changefreq`, `priority`, then one
//! `xhtml:link` per locale alternate.

use std::io::Write;

use chrono::{DateTime, FixedOffset};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::SitemapError;
use crate::urlset::{SitemapDocument, UrlEntry};

/// Sitemap protocol namespace.
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Namespace of the `xhtml:link` alternate extension.
pub const XHTML_NS: &str = "http://www.w3.org/TR/xhtml11/xhtml11_schema.html";

/// XML Schema instance namespace.
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Schema locations for the sitemap and xhtml namespaces.
pub const SCHEMA_LOCATION: &str = "http://www.sitemaps.org/schemas/sitemap/0.9 \
    http://www.sitemaps.org/schemas/sitemap/0.9/sitemap.xsd \
    http://www.w3.org/TR/xhtml11/xhtml11_schema.html \
    http://www.w3.org/2002/08/xhtml/xhtml1-strict.xsd";

/// Rendering options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Indent nested elements by this many spaces. Compact output when `None`.
    pub indent: Option<usize>,
}

/// Serializes sitemap documents.
#[derive(Clone, Debug, Default)]
pub struct XmlRenderer {
    options: RenderOptions,
}

impl XmlRenderer {
    /// Create a renderer with compact output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer with options.
    #[must_use]
    pub fn with_options(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render a document to XML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the XML writer fails.
    pub fn render(&self, document: &SitemapDocument) -> Result<String, SitemapError> {
        let mut writer = match self.options.indent {
            Some(indent) if indent > 0 => Writer::new_with_indent(Vec::new(), b' ', indent),
            _ => Writer::new(Vec::new()),
        };

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        if self.options.indent.is_none_or(|indent| indent == 0) {
            writer.get_mut().write_all(b"\n")?;
        }

        let mut urlset = BytesStart::new("urlset");
        urlset.push_attribute(("xmlns", SITEMAP_NS));
        urlset.push_attribute(("xmlns:xhtml", XHTML_NS));
        urlset.push_attribute(("xmlns:xsi", XSI_NS));
        urlset.push_attribute(("xsi:schemaLocation", SCHEMA_LOCATION));
        writer.write_event(Event::Start(urlset))?;

        for entry in &document.entries {
            write_url(&mut writer, entry, document.generated_at)?;
        }

        writer.write_event(Event::End(BytesEnd::new("urlset")))?;

        let mut xml = String::from_utf8(writer.into_inner())?;
        xml.push('\n');
        Ok(xml)
    }
}

fn write_url<W: Write>(
    writer: &mut Writer<W>,
    entry: &UrlEntry,
    now: DateTime<FixedOffset>,
) -> Result<(), SitemapError> {
    writer.write_event(Event::Start(BytesStart::new("url")))?;

    write_text_element(writer, "loc", &entry.loc)?;

    let lastmod = match &entry.lastmod {
        Some(lastmod) => lastmod.normalize(now),
        None => crate::lastmod::format_instant(now),
    };
    write_text_element(writer, "lastmod", &lastmod)?;

    if let Some(changefreq) = &entry.changefreq {
        write_text_element(writer, "changefreq", changefreq.as_str())?;
    }
    if let Some(priority) = &entry.priority {
        write_text_element(writer, "priority", priority.as_str())?;
    }

    for (locale, href) in entry.alternates.iter() {
        let mut link = BytesStart::new("xhtml:link");
        link.push_attribute(("rel", "alternate"));
        link.push_attribute(("hreflang", locale));
        link.push_attribute(("href", href));
        writer.write_event(Event::Empty(link))?;
    }

    writer.write_event(Event::End(BytesEnd::new("url")))?;
    Ok(())
}

fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), SitemapError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
