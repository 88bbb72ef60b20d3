//! Domain error types.

/// Top-level error type for cotreport.
#[derive(Debug, thiserror::Error)]
pub enum CotError {
    #[error("missing required column '{column}'")]
    MissingColumn { column: String },

    #[error("invalid value in row {row}, column '{column}': {reason}")]
    InvalidValue {
        row: usize,
        column: String,
        reason: String,
    },

    #[error("failed to read data: {reason}")]
    DataRead { reason: String },

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

    #[error("invalid date bound '{value}' (expected YYYY-MM-DD)")]
    InvalidDateBound { value: String },

    #[error("failed to render output: {reason}")]
    Render { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&CotError> for std::process::ExitCode {
    fn from(err: &CotError) -> Self {
        let code: u8 = match err {
            CotError::Io(_) | CotError::DataRead { .. } => 1,
            CotError::ConfigParse { .. }
            | CotError::ConfigMissing { .. }
            | CotError::ConfigInvalid { .. }
            | CotError::InvalidDateBound { .. } => 2,
            CotError::MissingColumn { .. } | CotError::InvalidValue { .. } => 3,
            CotError::Render { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
