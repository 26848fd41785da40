pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::cli::{CsvRecordSource, LocalStorage};
pub use config::{AppConfig, CliConfig};
pub use core::engine::MigrationEngine;
pub use domain::model::{Outcome, RunSummary};
pub use utils::error::{MigrateError, Result};
