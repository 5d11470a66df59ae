use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrapError {
    #[error("Malformed seed '{value}': {reason}")]
    MalformedSeed { value: String, reason: String },

    #[error("{pool} pool has {size} digits, {requirement}")]
    InsufficientPool {
        pool: String,
        size: usize,
        requirement: String,
    },

    #[error("Invalid digit '{token}' in {pool} pool: must be between 0 and 9")]
    InvalidDigit { pool: String, token: String },

    #[error("Unknown filter: {name}")]
    UnknownFilter { name: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Storage,
    Export,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TrapError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TrapError::MalformedSeed { .. }
            | TrapError::InsufficientPool { .. }
            | TrapError::InvalidDigit { .. }
            | TrapError::UnknownFilter { .. } => ErrorCategory::Input,
            TrapError::InvalidConfigValueError { .. }
            | TrapError::ConfigValidationError { .. }
            | TrapError::MissingConfigError { .. } => ErrorCategory::Configuration,
            TrapError::IoError(_) => ErrorCategory::Storage,
            TrapError::ZipError(_) | TrapError::CsvError(_) | TrapError::SerializationError(_) => {
                ErrorCategory::Export
            }
            TrapError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Export => ErrorSeverity::Medium,
            ErrorCategory::Storage | ErrorCategory::Processing => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            TrapError::MalformedSeed { value, .. } => {
                format!("Please enter a valid 5-digit seed (got '{}')", value)
            }
            TrapError::InsufficientPool {
                pool, requirement, ..
            } => format!("{} digits: {}", pool, requirement),
            TrapError::InvalidDigit { pool, token } => {
                format!("'{}' is not a single digit ({} pool)", token, pool)
            }
            TrapError::UnknownFilter { name } => format!("Filter '{}' does not exist", name),
            TrapError::MissingConfigError { field } => {
                format!("Configuration value '{}' is required", field)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            TrapError::MalformedSeed { .. } => "Provide exactly five digits, e.g. --seed 13579",
            TrapError::InsufficientPool { .. } => {
                "Hot and cold pools need at least 3 digits, the due pool 2 to 5 digits"
            }
            TrapError::InvalidDigit { .. } => "Pools are comma-separated digits, e.g. 0,5,9",
            TrapError::UnknownFilter { .. } => {
                "Use one of: f1, f2, f3, f4, f5, hot, cold, due (or the full filter label)"
            }
            TrapError::InvalidConfigValueError { .. }
            | TrapError::ConfigValidationError { .. }
            | TrapError::MissingConfigError { .. } => "Check the configuration file or flags",
            TrapError::IoError(_) => "Check that the output path exists and is writable",
            TrapError::ZipError(_) | TrapError::CsvError(_) | TrapError::SerializationError(_) => {
                "Retry with a different output format"
            }
            TrapError::ProcessingError { .. } => "Re-run with --verbose for details",
        }
    }

    /// Process exit code for binaries.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, TrapError>;
