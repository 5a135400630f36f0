use crate::forms::FieldErrors;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),


    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation failed: {0}")]
    ValidationError(FieldErrors),

    #[error("Not authenticated: {message}")]
    AuthError { message: String },

    #[error("Upload rejected for '{file}': {reason}")]
    UploadError { file: String, reason: String },

    #[error("PDF error: {0}")]
    PdfError(#[from] lopdf::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("QR code error: {message}")]
    QrError { message: String },

    #[error("Failed to generate PDF")]
    SlipGeneration {
        #[source]
        source: Box<PortalError>,
    },
}

/// How a failure should be surfaced to the person using the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Shown inline next to the offending form fields.
    Validation,
    /// Shown as a banner carrying the message from the API or transport.
    Network,
    Unexpected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PortalError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn slip_generation(source: PortalError) -> Self {
        Self::SlipGeneration {
            source: Box::new(source),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError(_) | Self::UploadError { .. } => ErrorCategory::Validation,
            Self::HttpError(_) | Self::ApiError { .. } | Self::AuthError { .. } => {
                ErrorCategory::Network
            }
            _ => ErrorCategory::Unexpected,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ValidationError(_) | Self::UploadError { .. } => ErrorSeverity::Low,
            Self::HttpError(_) | Self::ApiError { .. } | Self::AuthError { .. } => {
                ErrorSeverity::Medium
            }
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorSeverity::High,
            _ => ErrorSeverity::Critical,
        }
    }

    /// Human-readable text for a banner or alert.
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError(errors) => {
                format!("Please correct the highlighted fields: {}", errors)
            }
            Self::ApiError { message, .. } => message.clone(),
            Self::HttpError(e) if e.is_timeout() => {
                "The server took too long to respond".to_string()
            }
            Self::HttpError(e) if e.is_connect() => "Unable to reach the server".to_string(),
            Self::HttpError(_) => "A network error occurred".to_string(),
            Self::AuthError { message } => message.clone(),
            Self::UploadError { reason, .. } => reason.clone(),
            Self::SlipGeneration { .. } => "Failed to generate PDF".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ValidationError(_) => "Fix the listed fields and submit again",
            Self::UploadError { .. } => "Choose a smaller JPG, PNG or PDF file",
            Self::HttpError(_) => "Check your connection and the configured base URL",
            Self::ApiError { status: 401, .. } | Self::AuthError { .. } => {
                "Log in again with `school-portal login`"
            }
            Self::ApiError { status: 404, .. } => "Check the record identifier",
            Self::ApiError { .. } => "Try again later or contact the administrator",
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Review the configuration file",
            _ => "Re-run with --verbose and report the log output",
        }
    }
}

pub type Result<T> = std::result::Result<T, PortalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let validation = PortalError::ValidationError(FieldErrors::single("email", "Invalid email"));
        assert_eq!(validation.category(), ErrorCategory::Validation);

        let api = PortalError::ApiError {
            status: 422,
            message: "Roll number already assigned".to_string(),
        };
        assert_eq!(api.category(), ErrorCategory::Network);
        assert_eq!(api.user_friendly_message(), "Roll number already assigned");

        let slip = PortalError::slip_generation(PortalError::config("boom"));
        assert_eq!(slip.category(), ErrorCategory::Unexpected);
        assert_eq!(slip.to_string(), "Failed to generate PDF");
    }

    #[test]
    fn test_severity_ordering() {
        let low = PortalError::ValidationError(FieldErrors::default());
        let high = PortalError::config("missing base url");
        assert!(low.severity() < high.severity());
    }
}
