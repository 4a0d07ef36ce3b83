//! Locale expansion over `[locales]` and `[pages.*]`.

use std::collections::BTreeMap;
use std::sync::Arc;

use smap_config::{LocalesConfig, PageConfig};
use smap_core::{LocaleExpander, UrlResolver};

/// Localized paths of one page.
#[derive(Debug)]
struct PagePaths {
    path: String,
    translations: BTreeMap<String, String>,
}

/// [`LocaleExpander`] backed by the static page table of the config file.
///
/// A page path is the translation for the locale when one exists, else the
/// default path. Non-default locales are prefixed with `/<locale>`; the
/// default locale only when `prefix_default` is set.
pub(crate) struct ConfigLocales {
    default: String,
    enabled: Vec<String>,
    prefix_default: bool,
    pages: BTreeMap<String, PagePaths>,
    urls: Arc<dyn UrlResolver>,
}

impl ConfigLocales {
    pub(crate) fn new(
        locales: &LocalesConfig,
        pages: &BTreeMap<String, PageConfig>,
        urls: Arc<dyn UrlResolver>,
    ) -> Self {
        let pages = pages
            .iter()
            .map(|(reference, page)| {
                (
                    reference.clone(),
                    PagePaths {
                        path: page.path.clone(),
                        translations: page.translations.clone(),
                    },
                )
            })
            .collect();
        Self {
            default: locales.default.clone(),
            enabled: locales.enabled.clone(),
            prefix_default: locales.prefix_default,
            pages,
            urls,
        }
    }
}

impl LocaleExpander for ConfigLocales {
    fn is_active(&self) -> bool {
        !self.enabled.is_empty()
    }

    fn default_locale(&self) -> String {
        self.default.clone()
    }

    fn enabled_locales(&self) -> Vec<String> {
        self.enabled.clone()
    }

    fn path_for(&self, reference: &str, locale: &str) -> Option<String> {
        let page = self.pages.get(reference)?;
        let path = page.translations.get(locale).unwrap_or(&page.path);
        let path = path.trim_start_matches('/');

        let localized = if locale == self.default && !self.prefix_default {
            format!("/{path}")
        } else {
            format!("/{locale}/{path}")
        };
        Some(self.urls.to_absolute(&localized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use smap_core::BaseUrl;

    fn locales(prefix_default: bool) -> ConfigLocales {
        let config: smap_config::Config = toml::from_str(
            r#"
[locales]
default = "en"
enabled = ["en", "fr"]

[pages.about]
path = "/about"
translations = { fr = "/a-propos" }

[pages.contact]
path = "contact"
"#,
        )
        .unwrap();
        let mut locale_config = config.locales.unwrap();
        locale_config.prefix_default = prefix_default;
        let base = BaseUrl::parse("https://example.com").unwrap();
        ConfigLocales::new(&locale_config, &config.pages, Arc::new(base))
    }

    #[test]
    fn test_default_locale_unprefixed() {
        assert_eq!(
            locales(false).path_for("about", "en").as_deref(),
            Some("https://example.com/about")
        );
    }

    #[test]
    fn test_translation_prefixed() {
        assert_eq!(
            locales(false).path_for("about", "fr").as_deref(),
            Some("https://example.com/fr/a-propos")
        );
    }

    #[test]
    fn test_missing_translation_uses_default_path() {
        assert_eq!(
            locales(false).path_for("contact", "fr").as_deref(),
            Some("https://example.com/fr/contact")
        );
    }

    #[test]
    fn test_prefix_default() {
        assert_eq!(
            locales(true).path_for("about", "en").as_deref(),
            Some("https://example.com/en/about")
        );
    }

    #[test]
    fn test_unknown_page() {
        assert_eq!(locales(false).path_for("missing", "en"), None);
    }

    #[test]
    fn test_reports_configured_locales() {
        let expander = locales(false);
        assert!(expander.is_active());
        assert_eq!(expander.default_locale(), "en");
        assert_eq!(expander.enabled_locales(), vec!["en", "fr"]);
    }
}
