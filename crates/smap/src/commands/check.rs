//! `smap check` command implementation.

use std::path::PathBuf;

use clap::Args;
use smap_config::{CliSettings, Config};
use smap_core::BaseUrl;
use smap_tree::{ItemTree, URL_TYPE};

use crate::error::CliError;
use crate::host;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Path to configuration file (default: auto-discover smap.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Definition tree file, JSON or YAML (overrides config).
    #[arg(long)]
    tree: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Findings of a check run.
#[derive(Debug, Default, PartialEq, Eq)]
struct Report {
    definitions: usize,
    types: Vec<(String, usize)>,
    unhandled: Vec<String>,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or tree is invalid.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            tree_path: self.tree,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        match &config.config_path {
            Some(path) => output.info(&format!("Config: {}", path.display())),
            None => output.info("Config: defaults (no smap.toml found)"),
        }
        output.info(&format!("Tree: {}", config.tree_resolved.path.display()));

        match &config.site.base_url {
            Some(base_url) => {
                BaseUrl::parse(base_url)?;
                output.info(&format!("Base URL: {base_url}"));
            }
            None => output.warning("No site.base_url set, generate needs --base-url"),
        }

        if let Some(locales) = &config.locales {
            output.info(&format!(
                "Locales: {} (default {})",
                locales.enabled.join(", "),
                locales.default
            ));
        }

        let report = check(&config)?;

        output.highlight("Resolvers");
        for (stage, name) in host::resolvers(&config).describe() {
            output.info(&format!("  {:<8} {name}", stage.as_str()));
        }

        output.highlight("Definitions");
        for (item_type, count) in &report.types {
            output.info(&format!("  {item_type:<24} {count}"));
        }
        for item_type in &report.unhandled {
            output.warning(&format!("No resolver handles type \"{item_type}\""));
        }

        output.success(&format!(
            "Tree is valid: {} definitions",
            report.definitions
        ));
        Ok(())
    }
}

/// Load and validate the tree and find types no resolver handles.
fn check(config: &Config) -> Result<Report, CliError> {
    let tree = ItemTree::load(&config.tree_resolved.path)?;
    let resolvers = host::resolvers(config);

    let counts = tree.type_counts();
    let unhandled = counts
        .keys()
        .filter(|item_type| **item_type != URL_TYPE && !resolvers.supports(item_type))
        .map(|item_type| (*item_type).to_owned())
        .collect();

    Ok(Report {
        definitions: tree.count_definitions(),
        types: counts
            .iter()
            .map(|(item_type, count)| ((*item_type).to_owned(), *count))
            .collect(),
        unhandled,
    })
}
