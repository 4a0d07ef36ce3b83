//! Ordered definition tree.
//!
//! The tree is stored as a plain list of top-level definitions, each of
//! which may carry nested `children`. It is read once per generation pass
//! and never mutated by the sitemap builder.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::definition::SitemapItemDefinition;
use crate::error::TreeError;

/// Serialization format of a tree file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeFormat {
    /// JSON array of definitions.
    Json,
    /// YAML sequence of definitions.
    Yaml,
}

impl TreeFormat {
    /// Detect the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns `TreeError::UnsupportedFormat` for anything other than
    /// `.json`, `.yaml` or `.yml`.
    pub fn from_path(path: &Path) -> Result<Self, TreeError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Ok(Self::Yaml)
            }
            _ => Err(TreeError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Ordered forest of sitemap definitions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemTree {
    items: Vec<SitemapItemDefinition>,
}

impl ItemTree {
    /// Create a tree from top-level definitions.
    #[must_use]
    pub fn new(items: Vec<SitemapItemDefinition>) -> Self {
        Self { items }
    }

    /// True when there is nothing to generate.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of top-level definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Top-level definitions in tree order.
    #[must_use]
    pub fn items(&self) -> &[SitemapItemDefinition] {
        &self.items
    }

    /// Iterate over top-level definitions.
    pub fn iter(&self) -> std::slice::Iter<'_, SitemapItemDefinition> {
        self.items.iter()
    }

    /// Total number of definitions including nested children.
    #[must_use]
    pub fn count_definitions(&self) -> usize {
        fn count(items: &[SitemapItemDefinition]) -> usize {
            items.iter().map(|item| 1 + count(&item.children)).sum()
        }
        count(&self.items)
    }

    /// Count definitions per item type, including nested children.
    #[must_use]
    pub fn type_counts(&self) -> BTreeMap<&str, usize> {
        fn walk<'a>(items: &'a [SitemapItemDefinition], counts: &mut BTreeMap<&'a str, usize>) {
            for item in items {
                *counts.entry(item.item_type.as_str()).or_default() += 1;
                walk(&item.children, counts);
            }
        }

        let mut counts = BTreeMap::new();
        walk(&self.items, &mut counts);
        counts
    }

    /// Parse and validate a tree from JSON.
    ///
    /// Empty content yields an empty tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a definition is invalid.
    pub fn from_json_str(content: &str) -> Result<Self, TreeError> {
        Self::parse(content, TreeFormat::Json)
    }

    /// Parse and validate a tree from YAML.
    ///
    /// Empty content yields an empty tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or a definition is invalid.
    pub fn from_yaml_str(content: &str) -> Result<Self, TreeError> {
        Self::parse(content, TreeFormat::Yaml)
    }

    /// Load a tree file, picking the format from its extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has an unknown extension,
    /// fails to parse, or contains an invalid definition.
    pub fn load(path: &Path) -> Result<Self, TreeError> {
        let format = TreeFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        let tree = Self::parse(&content, format)?;
        tracing::debug!(
            path = %path.display(),
            definitions = tree.count_definitions(),
            "Loaded sitemap tree"
        );
        Ok(tree)
    }

    fn parse(content: &str, format: TreeFormat) -> Result<Self, TreeError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        let items: Option<Vec<SitemapItemDefinition>> = match format {
            TreeFormat::Json => serde_json::from_str(trimmed)?,
            TreeFormat::Yaml => serde_yaml::from_str(trimmed)?,
        };
        let tree = Self::new(items.unwrap_or_default());
        tree.validate()?;
        Ok(tree)
    }

    /// Check structural rules on every definition.
    ///
    /// Every definition needs a non-empty type, and `url` definitions need a
    /// non-empty `url`.
    ///
    /// # Errors
    ///
    /// Returns `TreeError::Invalid` naming the first offending definition.
    pub fn validate(&self) -> Result<(), TreeError> {
        fn check(items: &[SitemapItemDefinition], prefix: &str) -> Result<(), TreeError> {
            for (i, item) in items.iter().enumerate() {
                let path = format!("{prefix}[{i}]");
                if item.item_type.trim().is_empty() {
                    return Err(TreeError::Invalid {
                        path,
                        message: "type cannot be empty".to_owned(),
                    });
                }
                if item.is_url() && item.url.as_deref().is_none_or(|u| u.trim().is_empty()) {
                    return Err(TreeError::Invalid {
                        path,
                        message: "url items require a url".to_owned(),
                    });
                }
                check(&item.children, &format!("{path}.children"))?;
            }
            Ok(())
        }

        check(&self.items, "items")
    }
}

impl FromIterator<SitemapItemDefinition> for ItemTree {
    fn from_iter<I: IntoIterator<Item = SitemapItemDefinition>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ItemTree {
    type Item = &'a SitemapItemDefinition;
    type IntoIter = std::slice::Iter<'a, SitemapItemDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_content_is_empty_tree() {
        assert!(ItemTree::from_json_str("").unwrap().is_empty());
        assert!(ItemTree::from_yaml_str("  \n").unwrap().is_empty());
        assert!(ItemTree::from_json_str("[]").unwrap().is_empty());
        assert!(ItemTree::from_json_str("null").unwrap().is_empty());
    }

    #[test]
    fn test_parse_json_tree_preserves_order() {
        let json = r#"[
            {"type": "url", "url": "/b"},
            {"type": "url", "url": "/a"},
            {"type": "all-blog-posts", "cmsPage": "blog/post"}
        ]"#;
        let tree = ItemTree::from_json_str(json).unwrap();

        let types: Vec<_> = tree.iter().map(|i| i.item_type.as_str()).collect();
        assert_eq!(types, vec!["url", "url", "all-blog-posts"]);
        assert_eq!(tree.items()[0].url.as_deref(), Some("/b"));
    }

    #[test]
    fn test_count_definitions_includes_children() {
        let yaml = "
- type: group
  children:
    - type: url
      url: /a
    - type: group
      children:
        - type: url
          url: /b
- type: url
  url: /c
";
        let tree = ItemTree::from_yaml_str(yaml).unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.count_definitions(), 5);

        let counts = tree.type_counts();
        assert_eq!(counts.get("group"), Some(&2));
        assert_eq!(counts.get("url"), Some(&3));
    }

    #[test]
    fn test_empty_type_rejected() {
        let err = ItemTree::from_json_str(r#"[{"type": "url", "url": "/"}, {"type": " "}]"#)
            .unwrap_err();
        assert!(matches!(err, TreeError::Invalid { .. }));
        assert!(err.to_string().contains("items[1]"));
        assert!(err.to_string().contains("type"));
    }

    #[test]
    fn test_url_item_without_url_rejected() {
        let yaml = "
- type: group
  children:
    - type: url
";
        let err = ItemTree::from_yaml_str(yaml).unwrap_err();
        assert!(err.to_string().contains("items[0].children[0]"));
        assert!(err.to_string().contains("url"));
    }

    #[test]
    fn test_missing_type_is_parse_error() {
        let err = ItemTree::from_json_str(r#"[{"url": "/"}]"#).unwrap_err();
        assert!(matches!(err, TreeError::Json(_)));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            TreeFormat::from_path(Path::new("sitemap.json")).unwrap(),
            TreeFormat::Json
        );
        assert_eq!(
            TreeFormat::from_path(Path::new("sitemap.YML")).unwrap(),
            TreeFormat::Yaml
        );
        assert!(matches!(
            TreeFormat::from_path(Path::new("sitemap.toml")),
            Err(TreeError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sitemap.yaml");
        std::fs::write(&path, "- type: url\n  url: /about\n  priority: 0.7\n").unwrap();

        let tree = ItemTree::load(&path).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.items()[0].priority.as_ref().unwrap().as_str(), "0.7");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ItemTree::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, TreeError::Io(_)));
    }

    #[test]
    fn test_json_round_trip_keeps_shape() {
        let tree: ItemTree = vec![
            SitemapItemDefinition::url("/"),
            SitemapItemDefinition::typed("cms-page").with_reference("about"),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&tree).unwrap();
        assert_eq!(
            json,
            r#"[{"type":"url","url":"/"},{"type":"cms-page","reference":"about"}]"#
        );
        assert_eq!(ItemTree::from_json_str(&json).unwrap(), tree);
    }
}
