//! Configuration management for smap.
//!
//! Parses `smap.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.base_url`
//! - `site.theme`
//!
//! ## Host Content
//!
//! `[locales]`, `[pages.*]` and `[[collections]]` describe the content a
//! static host knows about. The CLI turns them into a locale expander and
//! resolvers; this crate only parses and validates them.

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override site base URL.
    pub base_url: Option<String>,
    /// Override definition tree path.
    pub tree_path: Option<PathBuf>,
    /// Override output file path.
    pub output_path: Option<PathBuf>,
    /// Override XML indentation.
    pub indent: Option<usize>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "smap.toml";

/// Default definition tree filename.
const DEFAULT_TREE: &str = "sitemap.yaml";

/// Protocol limit on URLs per sitemap document.
pub const MAX_URLS: usize = 50_000;

/// Default limit on URLs a single definition may contribute.
pub const MAX_GENERATED: usize = 10_000;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site configuration.
    pub site: SiteConfig,
    /// Tree configuration (path is a relative string from TOML).
    tree: TreeConfigRaw,
    /// Output configuration (path is a relative string from TOML).
    output: OutputConfigRaw,
    /// Emission limits.
    pub limits: LimitsConfig,
    /// Locale configuration (optional section).
    /// When present, CMS pages fan out across the enabled locales.
    pub locales: Option<LocalesConfig>,
    /// Static CMS pages keyed by reference.
    pub pages: BTreeMap<String, PageConfig>,
    /// Static URL collections for resolvable item types.
    pub collections: Vec<CollectionConfig>,

    /// Resolved tree configuration (set after loading).
    #[serde(skip)]
    pub tree_resolved: TreeConfig,
    /// Resolved output configuration (set after loading).
    #[serde(skip)]
    pub output_resolved: OutputConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Site configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Absolute base URL relative item URLs are resolved against.
    pub base_url: Option<String>,
    /// Active theme code passed to resolvers.
    pub theme: String,
    /// Request path passed to resolvers.
    pub current_path: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            theme: "default".to_owned(),
            current_path: "/".to_owned(),
        }
    }
}

/// Raw tree configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct TreeConfigRaw {
    path: Option<String>,
}

/// Resolved tree configuration with an absolute path.
#[derive(Debug, Default)]
pub struct TreeConfig {
    /// Definition tree file (`.json`, `.yaml` or `.yml`).
    pub path: PathBuf,
}

/// Raw output configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    path: Option<String>,
    indent: Option<usize>,
}

/// Resolved output configuration.
#[derive(Debug, Default)]
pub struct OutputConfig {
    /// Output file. Standard output when `None`.
    pub path: Option<PathBuf>,
    /// XML indentation width. Compact output when `None`.
    pub indent: Option<usize>,
}

/// Emission limits.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// URL elements per document.
    pub max_urls: usize,
    /// URL elements a single definition may contribute.
    pub max_generated: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_urls: MAX_URLS,
            max_generated: MAX_GENERATED,
        }
    }
}

/// Locale configuration.
#[derive(Debug, Deserialize)]
pub struct LocalesConfig {
    /// Default locale code.
    pub default: String,
    /// Enabled locale codes in alternate order.
    #[serde(default)]
    pub enabled: Vec<String>,
    /// Prefix default-locale paths with the locale code too.
    #[serde(default)]
    pub prefix_default: bool,
}

/// Static CMS page.
#[derive(Debug, Deserialize)]
pub struct PageConfig {
    /// Page path in the default locale.
    pub path: String,
    /// Last modification time.
    #[serde(default)]
    pub mtime: Option<MtimeValue>,
    /// Localized paths keyed by locale code.
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
}

/// Last modification time as written in the config file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MtimeValue {
    /// Unix timestamp in seconds.
    Timestamp(i64),
    /// Date or date-time text.
    Text(String),
}

/// Resolver stage a collection registers in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageName {
    /// Host adapter stage.
    Adapter,
    /// Custom sitemap hook stage.
    #[default]
    Sitemap,
    /// Generic menu-item hook stage.
    Menu,
}

/// Static URL collection for one item type.
#[derive(Debug, Deserialize)]
pub struct CollectionConfig {
    /// Item type this collection resolves.
    #[serde(rename = "type")]
    pub item_type: String,
    /// Resolver stage.
    #[serde(default)]
    pub stage: StageName,
    /// URLs produced for the type.
    #[serde(default)]
    pub entries: Vec<EntryConfig>,
}

/// One URL of a collection.
#[derive(Debug, Deserialize)]
pub struct EntryConfig {
    /// Absolute or site-relative URL.
    pub url: String,
    /// Last modification time.
    #[serde(default)]
    pub mtime: Option<MtimeValue>,
    /// Locale variants in order.
    #[serde(default)]
    pub alternates: Vec<AlternateConfig>,
    /// Nested URLs.
    #[serde(default)]
    pub items: Vec<EntryConfig>,
}

/// Locale variant of a collection entry.
#[derive(Debug, Deserialize)]
pub struct AlternateConfig {
    /// Locale code.
    pub locale: String,
    /// Absolute URL of the variant.
    pub url: String,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.base_url`").
        field: String,
        /// Error message (e.g., "${`SITE_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `smap.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. The result is
    /// validated again afterwards.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails
    /// or a value is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            tracing::debug!("No {CONFIG_FILENAME} found, using defaults");
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(base_url) = &settings.base_url {
            self.site.base_url = Some(base_url.clone());
        }
        if let Some(tree_path) = &settings.tree_path {
            self.tree_resolved.path.clone_from(tree_path);
        }
        if let Some(output_path) = &settings.output_path {
            self.output_resolved.path = Some(output_path.clone());
        }
        if let Some(indent) = settings.indent {
            self.output_resolved.indent = Some(indent);
        }
    }

    /// Get the validated site base URL.
    ///
    /// Use this instead of reading `site.base_url` directly when the command
    /// needs absolute URLs.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the base URL is missing or invalid.
    pub fn require_base_url(&self) -> Result<&str, ConfigError> {
        let base_url = self.site.base_url.as_deref().ok_or_else(|| {
            ConfigError::Validation(
                "site.base_url is required (set it in [site] or pass --base-url)".into(),
            )
        })?;
        require_non_empty(base_url, "site.base_url")?;
        require_http_url(base_url, "site.base_url")?;
        Ok(base_url)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfig::default(),
            tree: TreeConfigRaw::default(),
            output: OutputConfigRaw::default(),
            limits: LimitsConfig::default(),
            locales: None,
            pages: BTreeMap::new(),
            collections: Vec::new(),
            tree_resolved: TreeConfig {
                path: base.join(DEFAULT_TREE),
            },
            output_resolved: OutputConfig::default(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        tracing::debug!(
            path = %path.display(),
            pages = config.pages.len(),
            collections = config.collections.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are properly set and contain valid values.
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_limits()?;
        self.validate_locales()?;
        self.validate_pages()?;
        self.validate_collections()?;
        Ok(())
    }

    /// Validate site configuration.
    fn validate_site(&self) -> Result<(), ConfigError> {
        // Only validate base_url if set; generation requires it separately
        if self.site.base_url.is_some() {
            self.require_base_url()?;
        }
        require_non_empty(&self.site.current_path, "site.current_path")?;
        Ok(())
    }

    /// Validate limits configuration.
    fn validate_limits(&self) -> Result<(), ConfigError> {
        if self.limits.max_urls == 0 || self.limits.max_urls > MAX_URLS {
            return Err(ConfigError::Validation(format!(
                "limits.max_urls must be between 1 and {MAX_URLS}"
            )));
        }
        if self.limits.max_generated == 0 {
            return Err(ConfigError::Validation(
                "limits.max_generated must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Validate locales configuration.
    fn validate_locales(&self) -> Result<(), ConfigError> {
        let Some(locales) = &self.locales else {
            return Ok(());
        };
        require_non_empty(&locales.default, "locales.default")?;
        for locale in &locales.enabled {
            require_non_empty(locale, "locales.enabled")?;
        }
        Ok(())
    }

    /// Validate page configuration.
    fn validate_pages(&self) -> Result<(), ConfigError> {
        for (reference, page) in &self.pages {
            require_non_empty(&page.path, &format!("pages.{reference}.path"))?;
            for (locale, path) in &page.translations {
                require_non_empty(path, &format!("pages.{reference}.translations.{locale}"))?;
            }
        }
        Ok(())
    }

    /// Validate collection configuration.
    fn validate_collections(&self) -> Result<(), ConfigError> {
        fn check_entries(entries: &[EntryConfig], prefix: &str) -> Result<(), ConfigError> {
            for (i, entry) in entries.iter().enumerate() {
                let field = format!("{prefix}[{i}]");
                require_non_empty(&entry.url, &format!("{field}.url"))?;
                for alternate in &entry.alternates {
                    require_non_empty(&alternate.locale, &format!("{field}.alternates.locale"))?;
                    require_http_url(&alternate.url, &format!("{field}.alternates.url"))?;
                }
                check_entries(&entry.items, &format!("{field}.items"))?;
            }
            Ok(())
        }

        for (i, collection) in self.collections.iter().enumerate() {
            let field = format!("collections[{i}]");
            require_non_empty(&collection.item_type, &format!("{field}.type"))?;
            if collection.item_type == "url" {
                return Err(ConfigError::Validation(format!(
                    "{field}.type cannot be \"url\", url items are not resolved"
                )));
            }
            check_entries(&collection.entries, &format!("{field}.entries"))?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref url) = self.site.base_url {
            self.site.base_url = Some(expand::expand_env(url, "site.base_url")?);
        }
        self.site.theme = expand::expand_env(&self.site.theme, "site.theme")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.tree_resolved = TreeConfig {
            path: config_dir.join(self.tree.path.as_deref().unwrap_or(DEFAULT_TREE)),
        };
        self.output_resolved = OutputConfig {
            path: self.output.path.as_deref().map(|p| config_dir.join(p)),
            indent: self.output.indent,
        };
    }
}
