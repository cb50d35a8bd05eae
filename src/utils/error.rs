use thiserror::Error;

pub const FETCH_FAILED_MESSAGE: &str =
    "Failed to fetch items. Please check your connection and try again.";

#[derive(Error, Debug)]
pub enum PantryError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid date '{input}': {reason}")]
    InvalidDateError { input: String, reason: String },

    #[error("Missing required field '{field}': {message}")]
    MissingFieldError { field: String, message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Record '{id}' not found in collection '{collection}'")]
    NotFoundError { collection: String, id: String },

    #[error("Stored record '{id}' has an unreadable {field}: {source}")]
    CorruptRecordError {
        id: String,
        field: String,
        #[source]
        source: Box<PantryError>,
    },

    #[error("Backend returned {status}: {message}")]
    BackendError { status: u16, message: String },

    #[error("Failed to fetch items. Please check your connection and try again.")]
    FetchFailedError {
        #[source]
        source: Box<PantryError>,
    },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PantryError {
    pub fn validation(message: impl Into<String>) -> Self {
        PantryError::ValidationError {
            message: message.into(),
        }
    }

    pub fn invalid_date(input: impl Into<String>, reason: impl Into<String>) -> Self {
        PantryError::InvalidDateError {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            PantryError::HttpError(_)
            | PantryError::BackendError { .. }
            | PantryError::FetchFailedError { .. } => ErrorCategory::Network,
            PantryError::SerializationError(_)
            | PantryError::CsvError(_)
            | PantryError::InvalidDateError { .. }
            | PantryError::CorruptRecordError { .. }
            | PantryError::MissingFieldError { .. }
            | PantryError::ValidationError { .. }
            | PantryError::NotFoundError { .. } => ErrorCategory::Data,
            PantryError::ConfigValidationError { .. }
            | PantryError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            PantryError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PantryError::NotFoundError { .. } => ErrorSeverity::Low,
            PantryError::HttpError(_)
            | PantryError::BackendError { .. }
            | PantryError::FetchFailedError { .. } => ErrorSeverity::Medium,
            PantryError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// 給終端使用者看的訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            PantryError::FetchFailedError { .. } => FETCH_FAILED_MESSAGE.to_string(),
            PantryError::HttpError(_) => {
                "Could not reach the inventory server. Please check your connection.".to_string()
            }
            PantryError::BackendError { message, .. } => {
                format!("The inventory server rejected the request: {}", message)
            }
            PantryError::NotFoundError { id, .. } => format!("Item '{}' does not exist.", id),
            PantryError::MissingFieldError { message, .. } => message.clone(),
            PantryError::ValidationError { message } => message.clone(),
            PantryError::InvalidDateError { input, .. } => format!(
                "'{}' is not a valid date. Please use the YYYY-MM-DD format.",
                input
            ),
            PantryError::CorruptRecordError { id, field, .. } => format!(
                "Item '{}' on the inventory server has an unreadable {}.",
                id, field
            ),
            PantryError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            PantryError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        if let PantryError::CorruptRecordError { .. } = self {
            return "Fix or delete that record in the server's admin dashboard";
        }
        match self.category() {
            ErrorCategory::Network => {
                "Check that the server is running and --base-url points at it"
            }
            ErrorCategory::Data => "Check the values you entered and try again",
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }

    /// 依嚴重程度決定 CLI 的退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 4,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, PantryError>;
