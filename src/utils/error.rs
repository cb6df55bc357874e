use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuakeError {
    #[error("Feed request failed: {0}")]
    FeedRequestError(#[from] reqwest::Error),

    #[error("Feed unavailable: {url} responded with HTTP {status}")]
    FeedUnavailableError { url: String, status: u16 },

    #[error("Feed is not valid JSON: {0}")]
    FeedFormatError(#[from] serde_json::Error),

    #[error("Feed is not a geoJSON FeatureCollection: {message}")]
    FeedShapeError { message: String },

    #[error("Malformed feature #{index}: {reason}")]
    MalformedFeatureError { index: usize, reason: String },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Export error ({format}): {message}")]
    ExportError { format: String, message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl QuakeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            QuakeError::FeedRequestError(_) | QuakeError::FeedUnavailableError { .. } => {
                ErrorCategory::Network
            }
            QuakeError::FeedFormatError(_)
            | QuakeError::FeedShapeError { .. }
            | QuakeError::MalformedFeatureError { .. }
            | QuakeError::ExportError { .. } => ErrorCategory::Data,
            QuakeError::ZipError(_) | QuakeError::CsvError(_) | QuakeError::IoError(_) => {
                ErrorCategory::Storage
            }
            QuakeError::MissingConfigError { .. }
            | QuakeError::InvalidConfigValueError { .. }
            | QuakeError::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 單筆資料問題，整體仍可繼續
            QuakeError::MalformedFeatureError { .. } => ErrorSeverity::Low,
            QuakeError::FeedRequestError(_) | QuakeError::FeedUnavailableError { .. } => {
                ErrorSeverity::Medium
            }
            QuakeError::FeedFormatError(_)
            | QuakeError::FeedShapeError { .. }
            | QuakeError::ExportError { .. }
            | QuakeError::MissingConfigError { .. }
            | QuakeError::InvalidConfigValueError { .. }
            | QuakeError::ConfigValidationError { .. } => ErrorSeverity::High,
            QuakeError::ZipError(_) | QuakeError::CsvError(_) | QuakeError::IoError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            QuakeError::FeedRequestError(_) => {
                "Check network connectivity and that the feed URL is reachable".to_string()
            }
            QuakeError::FeedUnavailableError { status, .. } if *status >= 500 => {
                "The feed server is having trouble; try again later".to_string()
            }
            QuakeError::FeedUnavailableError { .. } => {
                "Verify the feed URL (--feed-url or [source].endpoint)".to_string()
            }
            QuakeError::FeedFormatError(_) | QuakeError::FeedShapeError { .. } => {
                "Make sure the endpoint serves a geoJSON FeatureCollection".to_string()
            }
            QuakeError::MalformedFeatureError { .. } => {
                "The record was skipped; no action required".to_string()
            }
            QuakeError::ExportError { format, .. } => {
                format!("Try again without the '{}' output format", format)
            }
            QuakeError::ZipError(_) | QuakeError::CsvError(_) | QuakeError::IoError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            QuakeError::MissingConfigError { field }
            | QuakeError::InvalidConfigValueError { field, .. }
            | QuakeError::ConfigValidationError { field, .. } => {
                format!("Fix the '{}' setting and run again", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not download the earthquake feed: {}", self),
            ErrorCategory::Data => format!("The earthquake feed could not be used: {}", self),
            ErrorCategory::Storage => format!("Could not write the map output: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, QuakeError>;
