use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("XML parsing error: {message}")]
    XmlError { message: String },

    #[error("Structure error: {event} document has no <{element}> element")]
    StructureError { event: String, element: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

/// 錯誤分類，用於日誌與退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Parse,
    Document,
    Configuration,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn xml(message: impl Into<String>) -> Self {
        EtlError::XmlError {
            message: message.into(),
        }
    }

    pub fn processing(message: impl Into<String>) -> Self {
        EtlError::ProcessingError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ZipError(_) | EtlError::IoError(_) => ErrorCategory::Io,
            EtlError::CsvError(_) | EtlError::SerializationError(_) | EtlError::TomlError(_) => {
                ErrorCategory::Parse
            }
            EtlError::XmlError { .. } | EtlError::StructureError { .. } => ErrorCategory::Document,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::ProcessingError { .. } | EtlError::ValidationError { .. } => {
                ErrorCategory::Processing
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 單一文件的錯誤不影響整批
            ErrorCategory::Document => ErrorSeverity::Low,
            ErrorCategory::Parse | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::XmlError { .. } => "Check that the file is a well-formed UTF-8 XML document",
            EtlError::StructureError { .. } => {
                "Make sure the file was uploaded to the step matching its event type"
            }
            EtlError::IoError(_) => "Check that the input files exist and the output path is writable",
            EtlError::ZipError(_) => "Check free disk space and permissions on the output path",
            EtlError::TomlError(_) | EtlError::ConfigValidationError { .. } => {
                "Fix the configuration file syntax and try again"
            }
            EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::ConfigError { .. } => "Review the command line flags or configuration values",
            EtlError::ProcessingError { .. } => {
                "Provide at least one valid S-1010, S-1200 or S-2299 document"
            }
            EtlError::CsvError(_) | EtlError::SerializationError(_) | EtlError::ValidationError { .. } => {
                "Re-run with --verbose and inspect the offending table"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::StructureError { event, element } => {
                format!("The {} document is missing the <{}> element", event, element)
            }
            EtlError::XmlError { .. } => "The file is not a readable XML document".to_string(),
            EtlError::IoError(e) => format!("File access failed: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_errors_are_low_severity() {
        let err = EtlError::StructureError {
            event: "S-1200".to_string(),
            element: "evtRemun".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Document);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert!(err.user_friendly_message().contains("<evtRemun>"));
    }

    #[test]
    fn test_io_errors_are_critical() {
        let err = EtlError::IoError(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.severity() > ErrorSeverity::High);
    }
}
