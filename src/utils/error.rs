use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid request, {field}: {reason}")]
    InvalidRequest { field: String, reason: String },

    #[error("Invalid template, {field}: {reason}")]
    InvalidTemplate { field: String, reason: String },
}

impl PatternError {
    /// Short hint printed by the CLI next to the error itself.
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PatternError::IoError(_) => "Check that the config path exists and is readable",
            PatternError::SerializationError(_) => "Re-run with --format text",
            PatternError::ConfigValidationError { .. }
            | PatternError::InvalidConfigValueError { .. } => {
                "Fix the scenario file and try again"
            }
            PatternError::InvalidRequest { .. } => "Give every request a url and a method",
            PatternError::InvalidTemplate { .. } => "Give every template a subject and a body",
        }
    }
}

pub type Result<T> = std::result::Result<T, PatternError>;
