//! Domain error types.

/// Top-level error type for bardepot.
#[derive(Debug, thiserror::Error)]
pub enum BardepotError {
    #[error("input file not found: {path}")]
    NotFound { path: String },

    #[error("column '{column}' not present in header of {path}")]
    Schema { column: String, path: String },

    #[error("row {row}: {reason}")]
    Parse { row: usize, reason: String },

    #[error("row {row}: invalid bar ({reason})")]
    InvalidBar { row: usize, reason: String },

    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&BardepotError> for std::process::ExitCode {
    fn from(err: &BardepotError) -> Self {
        let code: u8 = match err {
            BardepotError::Io(_) => 1,
            BardepotError::ConfigParse { .. }
            | BardepotError::ConfigMissing { .. }
            | BardepotError::ConfigInvalid { .. } => 2,
            BardepotError::Database { .. } | BardepotError::DatabaseQuery { .. } => 3,
            BardepotError::NotFound { .. }
            | BardepotError::Schema { .. }
            | BardepotError::Parse { .. }
            | BardepotError::InvalidBar { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
