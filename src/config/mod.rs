pub mod cli;
pub mod toml_config;

use crate::core::normalize::ColumnRule;
use crate::core::payload::SchemaVariant;
use crate::utils::error::{MigrateError, Result};
use crate::utils::validation::{self, Validate};
use clap::Parser;
use self::toml_config::TomlConfig;

/// Environment variable holding the API secret key.
pub const SECRET_KEY_VAR: &str = "SKEY";

#[derive(Debug, Clone, Parser)]
#[command(name = "agent-importer")]
#[command(about = "Imports agent records from a spreadsheet into the user service")]
pub struct CliConfig {
    /// Base URL of the user service
    #[arg(long, default_value = "http://localhost:19081")]
    pub base_url: String,

    /// Path to the input CSV file
    #[arg(long, default_value = "agents.csv")]
    pub input: String,

    /// Directory for run artifacts (failed email list)
    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Shape of the nested agency object in the request payload
    #[arg(long, value_enum, default_value = "supplier")]
    pub schema: SchemaVariant,

    /// Column-key canonicalization rule
    #[arg(long, value_enum, default_value = "underscored")]
    pub column_rule: ColumnRule,

    /// Delay after each request, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub pacing_ms: u64,

    /// Path to a TOML configuration file; replaces the flags above
    #[arg(short, long)]
    pub config: Option<String>,

    /// Build and log every payload without submitting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliConfig {
    /// Resolves CLI flags (or the TOML file when `--config` is given) into the
    /// immutable run configuration.
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = if let Some(path) = &self.config {
            TomlConfig::from_file(path)?.resolve()?
        } else {
            AppConfig {
                base_url: self.base_url.clone(),
                secret_key: secret_key_from_env()?,
                input_path: self.input.clone(),
                output_path: self.output_path.clone(),
                schema_variant: self.schema,
                column_rule: self.column_rule,
                pacing_ms: self.pacing_ms,
                dry_run: false,
            }
        };
        config.dry_run = self.dry_run;
        Ok(config)
    }
}

/// Process-wide immutable run configuration, constructed once at startup and
/// passed explicitly into every component.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub secret_key: String,
    pub input_path: String,
    pub output_path: String,
    pub schema_variant: SchemaVariant,
    pub column_rule: ColumnRule,
    pub pacing_ms: u64,
    pub dry_run: bool,
}

impl AppConfig {
    pub fn endpoint(&self) -> String {
        format!("{}/createuser", self.base_url.trim_end_matches('/'))
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("base_url", &self.base_url)?;
        validation::validate_path("input", &self.input_path)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_non_empty_string("secret_key", &self.secret_key)?;
        Ok(())
    }
}

pub(crate) fn secret_key_from_env() -> Result<String> {
    std::env::var(SECRET_KEY_VAR)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(MigrateError::MissingConfigError {
            field: SECRET_KEY_VAR.to_string(),
        })
}
