//! Error types for the accessibility suite

use a11y_report::{AuditResults, ReportError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Target {url} not reachable after {attempts} attempts")]
    TargetUnreachable { url: String, attempts: usize },

    #[error("Playwright not found. Install with: npm install playwright && npx playwright install")]
    PlaywrightNotFound,

    #[error("Playwright error: {0}")]
    Playwright(String),

    #[error("Audit engine error: {0}")]
    Engine(String),

    /// The audit found rule failures. `message` is the formatted,
    /// human-readable diagnostic; `results` holds the raw result set.
    #[error("{message}")]
    ViolationsFound {
        message: String,
        results: Box<AuditResults>,
    },

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("No element matches selector: {0}")]
    ElementNotFound(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Not supported by this page: {0}")]
    Unsupported(String),

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl AuditError {
    /// Whether this error reports accessibility violations rather than an
    /// infrastructure failure
    pub fn is_violation(&self) -> bool {
        matches!(self, AuditError::ViolationsFound { .. })
    }
}

pub type AuditResult<T> = Result<T, AuditError>;
