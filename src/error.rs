/*!
 * Error handling for doctor directory operations
 *
 * Only catalog loading, configuration, and export can fail. Missing or
 * malformed record fields are never errors: they degrade to display-safe
 * defaults in `data_types`. URL parameters never fail either.
 */

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use serde::{Serialize, Deserialize};

/// Doctor directory result type
pub type Result<T> = std::result::Result<T, DirectoryError>;

/// Error types with context and suggestions
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// Network, HTTP status, or body decoding failure while loading the catalog
    #[error("Failed to fetch doctors data from {url}: {message}")]
    Fetch {
        url: String,
        message: String,
        status: Option<u16>,
        suggestion: Option<String>,
    },

    /// A local catalog document could not be parsed
    #[error("Catalog parse error{}: {message}", .path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default())]
    Parse {
        message: String,
        path: Option<PathBuf>,
        line: Option<usize>,
    },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
        path: Option<PathBuf>,
    },

    /// File not found with suggestions
    #[error("File not found: {path}")]
    FileNotFound {
        path: PathBuf,
        suggestion: String,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        suggestion: Option<String>,
    },

    /// Export errors
    #[error("Export error: {message}")]
    Export {
        message: String,
        format: OutputFormat,
        suggestion: Option<String>,
    },

    /// Generic errors with custom message
    #[error("{message}")]
    Custom {
        message: String,
        suggestion: Option<String>,
    },
}

/// Output format for rendered results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonLines,
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::JsonLines => write!(f, "JSON Lines"),
            OutputFormat::Csv => write!(f, "CSV"),
        }
    }
}

impl DirectoryError {
    /// Create a fetch error for a transport failure
    pub fn fetch_failed(url: &str, err: impl fmt::Display) -> Self {
        Self::Fetch {
            url: url.to_string(),
            message: err.to_string(),
            status: None,
            suggestion: Some("Check the endpoint URL and your internet connection".to_string()),
        }
    }

    /// Create a fetch error for a non-success HTTP status
    pub fn http_status(url: &str, status: u16) -> Self {
        Self::Fetch {
            url: url.to_string(),
            message: format!("HTTP error {}", status),
            status: Some(status),
            suggestion: Some("Check if the URL is correct and accessible".to_string()),
        }
    }

    /// Create a fetch error for a body that is not a doctor catalog
    pub fn invalid_payload(url: &str, err: impl fmt::Display) -> Self {
        Self::Fetch {
            url: url.to_string(),
            message: format!("response is not a doctor catalog: {}", err),
            status: None,
            suggestion: Some("The endpoint must return a JSON object or an array of doctor objects".to_string()),
        }
    }

    /// Create a file not found error with helpful suggestion
    pub fn file_not_found_with_suggestion(path: PathBuf) -> Self {
        let suggestion = if path.extension().map(|e| e == "json").unwrap_or(false) {
            format!(
                "Check if the catalog file exists at '{}'. It must hold a JSON object or an array of doctor objects.",
                path.display()
            )
        } else {
            format!(
                "Check if the file exists at '{}'. Make sure the path is correct and you have read permissions.",
                path.display()
            )
        };

        Self::FileNotFound { path, suggestion }
    }

    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::Fetch { suggestion: Some(sug), .. } => {
                format!("{}\n\nSuggestion: {}", self, sug)
            }
            Self::FileNotFound { suggestion, .. } => {
                format!("{}\n\nSuggestion: {}", self, suggestion)
            }
            Self::Configuration { suggestion: Some(sug), .. } => {
                format!("{}\n\nSuggestion: {}", self, sug)
            }
            Self::Export { suggestion: Some(sug), .. } => {
                format!("{}\n\nSuggestion: {}", self, sug)
            }
            Self::Custom { suggestion: Some(sug), .. } => {
                format!("{}\n\nSuggestion: {}", self, sug)
            }
            _ => self.to_string(),
        }
    }

    /// Whether this error came from loading the catalog
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }
}

// Convenience conversions
impl From<std::io::Error> for DirectoryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: err,
            path: None,
        }
    }
}

impl From<csv::Error> for DirectoryError {
    fn from(err: csv::Error) -> Self {
        Self::Export {
            message: err.to_string(),
            format: OutputFormat::Csv,
            suggestion: None,
        }
    }
}

impl From<serde_json::Error> for DirectoryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            message: err.to_string(),
            path: None,
            line: Some(err.line()),
        }
    }
}
