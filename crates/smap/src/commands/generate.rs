//! `smap generate` command implementation.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use smap_config::{CliSettings, Config};
use smap_core::GenerationStats;
use smap_tree::ItemTree;

use crate::error::CliError;
use crate::host;
use crate::output::Output;

/// Arguments for the generate command.
#[derive(Args)]
pub(crate) struct GenerateArgs {
    /// Path to configuration file (default: auto-discover smap.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Definition tree file, JSON or YAML (overrides config).
    #[arg(long)]
    tree: Option<PathBuf>,

    /// Output file (overrides config; default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Site base URL (overrides config).
    #[arg(long, env = "SMAP_BASE_URL")]
    base_url: Option<String>,

    /// Indent XML by this many spaces (overrides config).
    #[arg(long)]
    indent: Option<usize>,

    /// Enable verbose output (per-pass summary logs).
    #[arg(short, long)]
    pub verbose: bool,
}

/// Rendered sitemap with its pass counters.
struct Generated {
    xml: String,
    stats: GenerationStats,
}

impl GenerateArgs {
    /// Execute the generate command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, tree loading or writing fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            base_url: self.base_url,
            tree_path: self.tree,
            output_path: self.output,
            indent: self.indent,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!(
            "Tree: {}",
            config.tree_resolved.path.display()
        ));

        let Some(generated) = generate(&config)? else {
            output.warning("Sitemap tree is empty, nothing to generate");
            return Ok(());
        };

        match &config.output_resolved.path {
            Some(path) => {
                write_file(path, &generated.xml)?;
                output.info(&format!("Output: {}", path.display()));
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(generated.xml.as_bytes())?;
                stdout.flush()?;
            }
        }

        output.stats(&generated.stats);
        Ok(())
    }
}

/// Load the tree and render the sitemap. `None` for an empty tree.
fn generate(config: &Config) -> Result<Option<Generated>, CliError> {
    let tree = ItemTree::load(&config.tree_resolved.path)?;
    let builder = host::builder(config)?;

    let Some(document) = builder.build(&tree, &host::context(config)) else {
        return Ok(None);
    };
    let xml = builder.render(&document)?;
    Ok(Some(Generated {
        xml,
        stats: document.stats,
    }))
}

fn write_file(path: &Path, xml: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, xml)?;
    Ok(())
}
