//! Sitemap item definitions.
//!
//! A definition is one node of the user-authored tree. It either points at
//! a literal URL (`type = "url"`) or names a content type that a resolver
//! expands into concrete URLs.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Type discriminator for explicit URL items.
pub const URL_TYPE: &str = "url";

/// Sitemap metadata value kept verbatim.
///
/// `changefreq` and `priority` are written to the sitemap exactly as
/// authored. Numbers in the source file (`priority: 0.8`) are accepted and
/// stored in their textual form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MetaValue(String);

impl MetaValue {
    /// Create a metadata value from text.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the textual form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for MetaValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Integer(i64),
            Float(f64),
            Bool(bool),
        }

        let value = match Raw::deserialize(deserializer)? {
            Raw::Text(text) => text,
            Raw::Integer(n) => n.to_string(),
            Raw::Float(n) => n.to_string(),
            Raw::Bool(b) => b.to_string(),
        };
        Ok(Self(value))
    }
}

/// One node of the sitemap definition tree.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SitemapItemDefinition {
    /// `"url"` for explicit items, otherwise the resolvable content type.
    #[serde(rename = "type")]
    pub item_type: String,
    /// Literal target for `url` items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Type-specific reference (page name, record id, category slug).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// CMS page used to render referenced records.
    #[serde(
        rename = "cmsPage",
        alias = "cms_page",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub cms_page: Option<String>,
    /// Sitemap change frequency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changefreq: Option<MetaValue>,
    /// Sitemap priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<MetaValue>,
    /// Pre-grouped nested definitions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SitemapItemDefinition>,
    /// Any other type-specific fields, passed through to resolvers.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl SitemapItemDefinition {
    /// Create an explicit URL definition.
    #[must_use]
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            item_type: URL_TYPE.to_owned(),
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Create a typed definition resolved by the resolver chain.
    #[must_use]
    pub fn typed(item_type: impl Into<String>) -> Self {
        Self {
            item_type: item_type.into(),
            ..Self::default()
        }
    }

    /// Set the resolver reference.
    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Set the CMS page.
    #[must_use]
    pub fn with_cms_page(mut self, cms_page: impl Into<String>) -> Self {
        self.cms_page = Some(cms_page.into());
        self
    }

    /// Set the change frequency.
    #[must_use]
    pub fn with_changefreq(mut self, changefreq: impl Into<MetaValue>) -> Self {
        self.changefreq = Some(changefreq.into());
        self
    }

    /// Set the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<MetaValue>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Set nested definitions.
    #[must_use]
    pub fn with_children(mut self, children: Vec<SitemapItemDefinition>) -> Self {
        self.children = children;
        self
    }

    /// True for explicit URL items.
    #[must_use]
    pub fn is_url(&self) -> bool {
        self.item_type == URL_TYPE
    }

    /// Look up a pass-through field by name.
    #[must_use]
    pub fn extra(&self, key: &str) -> Option<&serde_json::Value> {
        self.extra.get(key)
    }
}
