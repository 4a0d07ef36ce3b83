//! Locale fan-out.
//!
//! When the host has an internationalization capability, CMS page items are
//! expanded into one URL per locale instead of a single base URL.

use crate::resolution::LocaleUrls;

/// Item type whose entries fan out across locales.
pub const CMS_PAGE_TYPE: &str = "cms-page";

/// Host locale capability.
pub trait LocaleExpander: Send + Sync {
    /// Whether locale expansion applies to this request.
    fn is_active(&self) -> bool;

    /// Default locale code.
    fn default_locale(&self) -> String;

    /// Enabled locale codes in registration order.
    fn enabled_locales(&self) -> Vec<String>;

    /// Absolute URL of the referenced page in `locale`.
    ///
    /// `None` leaves the locale out of the alternates.
    fn path_for(&self, reference: &str, locale: &str) -> Option<String>;
}

/// Locale snapshot taken once per generation pass.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct LocalePlan {
    default: String,
    enabled: Vec<String>,
}

impl LocalePlan {
    /// Snapshot the expander, or `None` when there is nothing to fan out to.
    pub(crate) fn capture(expander: &dyn LocaleExpander) -> Option<Self> {
        if !expander.is_active() {
            return None;
        }
        let enabled = expander.enabled_locales();
        if enabled.is_empty() {
            return None;
        }
        Some(Self {
            default: expander.default_locale(),
            enabled,
        })
    }

    /// Alternates for a page: default locale first, then enabled locales.
    pub(crate) fn expand(&self, expander: &dyn LocaleExpander, reference: &str) -> LocaleUrls {
        let mut urls = LocaleUrls::new();
        for locale in std::iter::once(&self.default).chain(&self.enabled) {
            if urls.get(locale).is_some() {
                continue;
            }
            match expander.path_for(reference, locale) {
                Some(url) => urls.insert(locale.as_str(), url),
                None => tracing::debug!(reference, locale = locale.as_str(), "No localized path for page"),
            }
        }
        urls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockLocales;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_inactive_expander_has_no_plan() {
        let locales = MockLocales::new("en", &["en", "fr"]).inactive();
        assert!(LocalePlan::capture(&locales).is_none());
    }

    #[test]
    fn test_no_enabled_locales_has_no_plan() {
        let locales = MockLocales::new("en", &[]);
        assert!(LocalePlan::capture(&locales).is_none());
    }

    #[test]
    fn test_default_first_then_enabled() {
        let locales = MockLocales::new("fr", &["en", "fr", "de"]);
        let plan = LocalePlan::capture(&locales).unwrap();
        let urls = plan.expand(&locales, "about");

        let pairs: Vec<_> = urls.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("fr", "https://example.test/fr/about"),
                ("en", "https://example.test/en/about"),
                ("de", "https://example.test/de/about"),
            ]
        );
    }

    #[test]
    fn test_missing_locale_path_is_skipped() {
        let locales = MockLocales::new("en", &["en", "fr"]).without_path("about", "fr");
        let plan = LocalePlan::capture(&locales).unwrap();
        let urls = plan.expand(&locales, "about");

        assert_eq!(urls.len(), 1);
        assert_eq!(urls.get("en"), Some("https://example.test/en/about"));
    }
}
