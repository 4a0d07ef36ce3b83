//! URL normalization.

use url::Url;

use crate::error::SitemapError;

/// Turns literal and resolver-supplied URLs into absolute URLs.
pub trait UrlResolver: Send + Sync {
    /// Absolute form of `url`.
    fn to_absolute(&self, url: &str) -> String;
}

/// Resolves relative URLs against a site root.
///
/// Absolute URLs (`scheme://`, `mailto:`, `tel:`) pass through unchanged.
/// Relative ones are appended to the
/// root with exactly one `/` between them: `about` and `/about` both map
/// to `{root}/about`. A leading `//` followed by a dotted host is treated
/// as scheme-relative.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    root: String,
    scheme: String,
}

impl BaseUrl {
    /// Parse a site root such as `https://example.com/`.
    ///
    /// # Errors
    ///
    /// Returns `SitemapError::InvalidBaseUrl` if the URL does not parse or
    /// is not an http(s) URL.
    pub fn parse(base: &str) -> Result<Self, SitemapError> {
        let parsed = Url::parse(base.trim()).map_err(|e| SitemapError::InvalidBaseUrl {
            url: base.to_owned(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SitemapError::InvalidBaseUrl {
                url: base.to_owned(),
                reason: "scheme must be http or https".to_owned(),
            });
        }

        let mut root = parsed.as_str().to_owned();
        // Query and fragment make no sense on a site root
        if let Some(cut) = root.find(['?', '#']) {
            root.truncate(cut);
        }
        let root = root.trim_end_matches('/').to_owned();

        Ok(Self {
            root,
            scheme: parsed.scheme().to_owned(),
        })
    }

    /// Site root without a trailing slash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.root
    }
}

impl UrlResolver for BaseUrl {
    fn to_absolute(&self, url: &str) -> String {
        let url = url.trim();
        if is_absolute(url) {
            return url.to_owned();
        }
        if let Some(rest) = url.strip_prefix("//")
            && !rest.starts_with('/')
            && rest.split('/').next().is_some_and(|host| host.contains('.'))
        {
            return format!("{}:{url}", self.scheme);
        }

        let path = url.trim_start_matches('/');
        if path.is_empty() {
            self.root.clone()
        } else {
            format!("{}/{path}", self.root)
        }
    }
}

/// Only `scheme://` URLs and `mailto:`/`tel:` links are absolute; other
/// colons belong to relative paths such as `blog:2024`.
fn is_absolute(url: &str) -> bool {
    Url::parse(url).is_ok_and(|parsed| {
        url.contains("://") || matches!(parsed.scheme(), "mailto" | "tel")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_relative_paths_join_root() {
        let base = BaseUrl::parse("https://example.com/").unwrap();
        assert_eq!(base.to_absolute("/about"), "https://example.com/about");
        assert_eq!(base.to_absolute("about"), "https://example.com/about");
        assert_eq!(base.to_absolute("/"), "https://example.com");
        assert_eq!(base.to_absolute(""), "https://example.com");
    }

    #[test]
    fn test_absolute_urls_pass_through() {
        let base = BaseUrl::parse("https://example.com").unwrap();
        assert_eq!(
            base.to_absolute("https://other.test/page?a=1"),
            "https://other.test/page?a=1"
        );
    }

    #[test]
    fn test_colon_in_relative_path_joins_root() {
        let base = BaseUrl::parse("https://example.com").unwrap();
        assert_eq!(base.to_absolute("blog:2024"), "https://example.com/blog:2024");
        assert_eq!(base.to_absolute("news/a:b"), "https://example.com/news/a:b");
        assert_eq!(base.to_absolute("mailto:hi@example.com"), "mailto:hi@example.com");
    }

    #[test]
    fn test_scheme_relative_url() {
        let base = BaseUrl::parse("https://example.com").unwrap();
        assert_eq!(
            base.to_absolute("//cdn.example.com/a"),
            "https://cdn.example.com/a"
        );
    }

    #[test]
    fn test_root_with_path_prefix() {
        let base = BaseUrl::parse("https://example.com/site/?x=1").unwrap();
        assert_eq!(base.as_str(), "https://example.com/site");
        assert_eq!(base.to_absolute("blog/post"), "https://example.com/site/blog/post");
    }

    #[test]
    fn test_invalid_base_rejected() {
        let err = BaseUrl::parse("not a url").unwrap_err();
        assert!(matches!(err, SitemapError::InvalidBaseUrl { .. }));

        let err = BaseUrl::parse("ftp://example.com").unwrap_err();
        assert!(err.to_string().contains("http"));
    }
}
