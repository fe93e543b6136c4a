use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Failed to fetch {location}: {message}")]
    FetchError { location: String, message: String },

    #[error("HTML parsing error: {message}")]
    HtmlParseError { message: String },

    #[error("Row {row}: market cap {value:?} is not a number")]
    RowParseError { row: usize, value: String },

    #[error("Exchange rate for {currency} is missing")]
    MissingRateError { currency: String },

    #[error("Extraction produced no records from {location}")]
    EmptyExtraction { location: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value {value:?} for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Storage,
    Configuration,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::FetchError { .. } => ErrorCategory::Network,
            EtlError::HtmlParseError { .. }
            | EtlError::RowParseError { .. }
            | EtlError::MissingRateError { .. }
            | EtlError::EmptyExtraction { .. }
            | EtlError::ProcessingError { .. } => ErrorCategory::Data,
            EtlError::CsvError(_) | EtlError::IoError(_) | EtlError::DatabaseError(_) => {
                ErrorCategory::Storage
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::FetchError { .. } => "Check network access and that the source URL is reachable",
            EtlError::HtmlParseError { .. } | EtlError::EmptyExtraction { .. } => {
                "Check that the source page still contains the banks table"
            }
            EtlError::MissingRateError { .. } => {
                "Add the missing currency to the exchange rate file (columns: Currency,Rate)"
            }
            EtlError::CsvError(_) => "Check the exchange rate file is valid CSV",
            EtlError::IoError(_) => "Check that the output paths exist and are writable",
            EtlError::DatabaseError(_) => "Check the database URL and the query text",
            _ => "Review the configuration values",
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Configuration => 1,
            ErrorCategory::Network => 2,
            ErrorCategory::Data => 3,
            ErrorCategory::Storage => 4,
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
