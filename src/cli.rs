use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::collect::OfflineOptions;
use crate::inventory::DEFAULT_MAX_PAGES;

pub const DEFAULT_CONFIG: &str = "serverless.yml";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Dotenv,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "export-env")]
#[command(about = "Resolve CloudFormation references in service environment variables into a .env file", long_about = None)]
pub struct Args {
    /// Service definition (YAML or JSON)
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Recorded stack inventory (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub inventory: PathBuf,

    /// Stack to resolve against (defaults to <service>-<stage>)
    #[arg(long, value_name = "NAME")]
    pub stack_name: Option<String>,

    /// Output file path (prints to stdout if not specified)
    #[arg(short = 'O', long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Output format (dotenv, json)
    #[arg(short = 'f', long, default_value = "dotenv")]
    pub format: OutputFormat,

    /// Add IS_OFFLINE and API_ENDPOINT for local offline runs
    #[arg(long)]
    pub offline: bool,

    /// Offline API host
    #[arg(long, value_name = "HOST", requires = "offline")]
    pub offline_host: Option<String>,

    /// Offline API port
    #[arg(long, value_name = "PORT", requires = "offline")]
    pub offline_port: Option<u16>,

    /// Export stack outputs as variables
    #[arg(long)]
    pub outputs: bool,

    /// Derive resource attributes (ARNs, names) from resource types.
    /// Results are guesses; attribute overrides always win.
    #[arg(long)]
    pub experimental_attributes: bool,

    /// Leave unresolved variables out of the output instead of writing them empty
    #[arg(long)]
    pub skip_unresolved: bool,

    /// Seconds to wait for the inventory fetch
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Maximum pages fetched per paginated listing
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_PAGES)]
    pub max_pages: usize,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn validate(&self) -> Result<()> {
        validate_file(&self.config).context("Invalid service definition path")?;
        validate_file(&self.inventory).context("Invalid inventory path")?;
        if self.max_pages == 0 {
            anyhow::bail!("--max-pages must be at least 1");
        }
        if self.timeout == 0 {
            anyhow::bail!("--timeout must be at least 1 second");
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Offline options: command line values over `base`.
    pub fn offline_options(&self, base: OfflineOptions) -> Option<OfflineOptions> {
        if !self.offline {
            return None;
        }
        Some(OfflineOptions {
            host: self.offline_host.clone().unwrap_or(base.host),
            port: self.offline_port.unwrap_or(base.port),
            ..base
        })
    }
}

pub fn validate_file(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }
    if !path.is_file() {
        anyhow::bail!("Path is not a file: {}", path.display());
    }
    std::fs::metadata(path).with_context(|| format!("Cannot read file: {}", path.display()))?;
    Ok(())
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Dotenv => "dotenv",
            OutputFormat::Json => "json",
        }
    }
}
