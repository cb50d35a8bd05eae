use crate::config::settings::{Overrides, Settings};
use crate::config::toml_config::TomlConfig;
use crate::core::report::OutputFormat;
use crate::domain::model::{ItemField, Severity};
use crate::utils::error::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "pantry")]
#[command(about = "Track household food items and their expiry dates")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Record-store server URL
    #[arg(long, env = "POCKETBASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Auth token sent in the Authorization header
    #[arg(long, env = "POCKETBASE_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Last day (inclusive) counted as Critical
    #[arg(long, global = true)]
    pub critical_days: Option<i64>,

    /// Last day (inclusive) counted as Warning
    #[arg(long, global = true)]
    pub warning_days: Option<i64>,

    /// Records fetched per list request
    #[arg(long, global = true)]
    pub page_size: Option<u32>,

    /// Pretend today is this date (YYYY-MM-DD)
    #[arg(long, global = true, value_parser = parse_day)]
    pub today: Option<NaiveDate>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List items, newest first
    List {
        /// Category label, or "All"
        #[arg(long, default_value = "All")]
        category: String,

        #[arg(long, value_parser = parse_severity)]
        status: Option<Severity>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Group by status instead of a flat table
        #[arg(long, conflicts_with = "format")]
        grouped: bool,
    },

    /// Show one item
    Show { id: String },

    /// Add an item
    Add {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        category: String,

        #[arg(long, default_value = "1")]
        quantity: String,

        /// Expiry date, YYYY-MM-DD
        #[arg(long)]
        expiry: String,

        /// Id of an uploaded image record
        #[arg(long)]
        image: Option<String>,
    },

    /// Change one field of an item
    Edit {
        id: String,
        #[arg(value_parser = parse_field)]
        field: ItemField,
        value: String,
    },

    /// Mark an item as used
    Use {
        id: String,

        /// Mark as unused instead
        #[arg(long)]
        undo: bool,
    },

    /// Delete an item
    Delete { id: String },

    /// Classify expiry dates without contacting the server
    Classify {
        #[arg(required = true)]
        dates: Vec<String>,
    },

    /// Print the status categories and their colours
    Statuses,
}

fn parse_day(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| format!("{} (expected YYYY-MM-DD)", e))
}

fn parse_severity(s: &str) -> std::result::Result<Severity, String> {
    s.parse()
}

fn parse_field(s: &str) -> std::result::Result<ItemField, String> {
    s.parse()
}

impl CliConfig {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            base_url: self.base_url.clone(),
            token: self.token.clone(),
            critical_max_days: self.critical_days,
            warning_max_days: self.warning_days,
            page_size: self.page_size,
        }
    }

    /// Config file (if any) merged with flags and environment.
    pub fn settings(&self) -> Result<Settings> {
        let file = match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from: {}", path.display());
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };
        Ok(Settings::resolve(&file, self.overrides()))
    }
}
