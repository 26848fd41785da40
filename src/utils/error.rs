use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("Failed to read agent records: {message}")]
    IngestError { message: String },

    #[error("Row {row}: missing required field '{field}'")]
    MissingFieldError { field: String, row: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

impl MigrateError {
    pub fn user_friendly_message(&self) -> String {
        match self {
            MigrateError::IngestError { message } => {
                format!("Could not read the input file: {}", message)
            }
            MigrateError::MissingFieldError { field, row } => format!(
                "Input row {} has no '{}' value, so a valid request cannot be built",
                row, field
            ),
            MigrateError::IoError(e) => format!("File operation failed: {}", e),
            MigrateError::ConfigError { message } => format!("Configuration problem: {}", message),
            MigrateError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            MigrateError::MissingConfigError { field } => {
                format!("Configuration value '{}' is required but not set", field)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MigrateError::IngestError { .. } => {
                "Check that the input file exists and is a readable CSV with a header row"
            }
            MigrateError::MissingFieldError { .. } => {
                "Fix the offending row in the source file, no requests were sent for it"
            }
            MigrateError::IoError(_) => "Check file permissions and that the output path exists",
            MigrateError::ConfigError { .. }
            | MigrateError::InvalidConfigValueError { .. }
            | MigrateError::MissingConfigError { .. } => {
                "Review the CLI flags, config file and environment (SKEY) and retry"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, MigrateError>;
