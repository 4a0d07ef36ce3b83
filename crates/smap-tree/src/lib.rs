//! Sitemap definition tree for smap.
//!
//! This crate provides:
//! - [`SitemapItemDefinition`]: one user-authored sitemap node
//! - [`ItemTree`]: the ordered forest of definitions for one sitemap
//! - JSON and YAML loading with structural validation
//!
//! # Example
//!
//! ```
//! use smap_tree::ItemTree;
//!
//! let tree = ItemTree::from_yaml_str("
//! - type: url
//!   url: /about
//!   changefreq: monthly
//! - type: cms-page
//!   reference: home
//! ").unwrap();
//! assert_eq!(tree.len(), 2);
//! ```

mod definition;
mod error;
mod tree;

pub use definition::{MetaValue, SitemapItemDefinition, URL_TYPE};
pub use error::TreeError;
pub use tree::{ItemTree, TreeFormat};
