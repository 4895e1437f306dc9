//! Unified error types for the page object layer

use thiserror::Error;

/// Unified Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for page and region operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Malformed URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Driver or transport failure not covered by a more specific variant
    #[error("Driver error: {0}")]
    Driver(String),

    /// Element not found within the wait budget
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Element handle used after the document it came from was replaced
    #[error("Stale element reference: {0}")]
    StaleReference(String),

    /// Navigation did not land on the expected page
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// Action invoked against a region in the wrong state
    #[error("Unexpected state: {0}")]
    UnexpectedState(String),

    /// Timeout
    #[error("Operation timeout: {0}")]
    Timeout(String),

    /// Remote browser session does not exist
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// No credentials configured for a user identity
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new driver error
    pub fn driver<S: Into<String>>(msg: S) -> Self {
        Error::Driver(msg.into())
    }

    /// Create a new element not found error
    pub fn element_not_found<S: Into<String>>(what: S) -> Self {
        Error::ElementNotFound(what.into())
    }

    /// Create a new stale reference error
    pub fn stale_reference<S: Into<String>>(what: S) -> Self {
        Error::StaleReference(what.into())
    }

    /// Create a new navigation failed error
    pub fn navigation_failed<S: Into<String>>(msg: S) -> Self {
        Error::NavigationFailed(msg.into())
    }

    /// Create a new unexpected state error
    pub fn unexpected_state<S: Into<String>>(msg: S) -> Self {
        Error::UnexpectedState(msg.into())
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        Error::Timeout(msg.into())
    }

    /// Create a new session not found error
    pub fn session_not_found<S: Into<String>>(id: S) -> Self {
        Error::SessionNotFound(id.into())
    }

    /// Create a new unknown user error
    pub fn unknown_user<S: Into<String>>(name: S) -> Self {
        Error::UnknownUser(name.into())
    }

    /// Create a new configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Error::Configuration(msg.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Error::Internal(msg.into())
    }

    /// True for `ElementNotFound`
    pub fn is_element_not_found(&self) -> bool {
        matches!(self, Error::ElementNotFound(_))
    }

    /// True for `StaleReference`; callers must re-obtain the page or region
    pub fn is_stale(&self) -> bool {
        matches!(self, Error::StaleReference(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout(err.to_string())
        } else {
            Error::Driver(err.to_string())
        }
    }
}
