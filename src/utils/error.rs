use crate::domain::model::FlowError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SankeyError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid budget flow: {0}")]
    FlowError(#[from] FlowError),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Nothing to draw: {message}")]
    EmptyInput { message: String },

    #[error("Strict audit failed with {count} warning(s): {first}")]
    StrictAudit { count: usize, first: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Parsing,
    Configuration,
    Validation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SankeyError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SankeyError::IoError(_) => ErrorCategory::Io,
            SankeyError::CsvError(_) | SankeyError::SerializationError(_) => ErrorCategory::Parsing,
            SankeyError::ConfigValidationError { .. }
            | SankeyError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            SankeyError::FlowError(_)
            | SankeyError::EmptyInput { .. }
            | SankeyError::StrictAudit { .. } => ErrorCategory::Validation,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Io => ErrorSeverity::Critical,
            ErrorCategory::Parsing | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Validation => ErrorSeverity::Medium,
        }
    }

    /// Process exit code used by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Io => 2,
            _ => 1,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SankeyError::IoError(_) => {
                "Check that the input file exists and the output directory is writable".to_string()
            }
            SankeyError::CsvError(_) => {
                "CSV input needs a 'source,target,amount' header and one flow per row".to_string()
            }
            SankeyError::SerializationError(_) => {
                "The generated diagram data could not be encoded; re-run with --verbose".to_string()
            }
            SankeyError::FlowError(FlowError::InvalidAmount { row, .. }) => {
                format!("Enter a positive amount on row {}", row)
            }
            SankeyError::FlowError(FlowError::InvalidLabel { row, field }) => {
                format!("Fill in the {} name on row {}", field, row)
            }
            SankeyError::FlowError(FlowError::SelfLoop { node, .. }) => {
                format!("'{}' cannot send money to itself; pick a different target", node)
            }
            SankeyError::FlowError(FlowError::CycleDetected { path }) => format!(
                "Money cannot flow in a circle; remove one of the flows between {}",
                path.join(", ")
            ),
            SankeyError::ConfigValidationError { field, .. }
            | SankeyError::InvalidConfigValueError { field, .. } => {
                format!("Fix the '{}' setting in your budget file", field)
            }
            SankeyError::EmptyInput { .. } => {
                "Enter at least one income source and one expense category".to_string()
            }
            SankeyError::StrictAudit { .. } => {
                "Resolve the audit warnings or run without --strict".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SankeyError::IoError(e) => format!("Could not read or write a file: {}", e),
            SankeyError::CsvError(e) => format!("The CSV input could not be read: {}", e),
            SankeyError::FlowError(e) => format!("The budget cannot be drawn: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SankeyError>;
