//! Sitemap generation errors.

/// Error raised while assembling or rendering a sitemap.
///
/// Missing or malformed resolver data is never an error; it simply
/// contributes nothing to the document.
#[derive(Debug, thiserror::Error)]
pub enum SitemapError {
    /// XML writer error.
    #[error("XML write error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// I/O error from the XML writer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rendered bytes are not UTF-8.
    #[error("rendered sitemap is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Base URL cannot be used to absolutize relative URLs.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
}
