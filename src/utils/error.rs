use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Registry request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Clone failed for {url}: {message}")]
    CloneError { url: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Io,
    Config,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AuditError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AuditError::ApiError(_) | AuditError::CloneError { .. } => ErrorCategory::Network,
            AuditError::IoError(_) | AuditError::ZipError(_) => ErrorCategory::Io,
            AuditError::ConfigError { .. }
            | AuditError::MissingConfigError { .. }
            | AuditError::InvalidConfigValueError { .. }
            | AuditError::ConfigValidationError { .. } => ErrorCategory::Config,
            AuditError::CsvError(_)
            | AuditError::SerializationError(_)
            | AuditError::ProcessingError { .. } => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AuditError::ApiError(_) | AuditError::CloneError { .. } => ErrorSeverity::Medium,
            AuditError::ConfigError { .. }
            | AuditError::MissingConfigError { .. }
            | AuditError::InvalidConfigValueError { .. }
            | AuditError::ConfigValidationError { .. } => ErrorSeverity::High,
            AuditError::IoError(_) | AuditError::ZipError(_) => ErrorSeverity::Critical,
            AuditError::CsvError(_)
            | AuditError::SerializationError(_)
            | AuditError::ProcessingError { .. } => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AuditError::ApiError(_) => {
                "Check network connectivity; unresolved lookups land in the missing-mapping template"
            }
            AuditError::CloneError { .. } => {
                "Verify the repository URL is reachable and `git` is installed"
            }
            AuditError::MissingConfigError { .. } => {
                "Create the missing file or point the matching CLI option at an existing one"
            }
            AuditError::InvalidConfigValueError { .. }
            | AuditError::ConfigValidationError { .. } => {
                "Fix the reported configuration value and rerun"
            }
            AuditError::ConfigError { .. } => "Review the configuration and rerun",
            AuditError::IoError(_) => "Check file permissions and available disk space",
            AuditError::ZipError(_) => "Rerun without --archive to write plain report files",
            AuditError::CsvError(_) | AuditError::SerializationError(_) => {
                "Inspect the offending input file; malformed rows are reported in the log"
            }
            AuditError::ProcessingError { .. } => "See the log for the failing repository",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AuditError::MissingConfigError { field } => {
                format!("Required configuration is missing: {field}")
            }
            AuditError::InvalidConfigValueError { field, value, .. } => {
                format!("Configuration value for {field} is invalid: '{value}'")
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;
