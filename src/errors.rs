/*!
 * Error types for the weblingo application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when calling a translation provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The provider cannot translate between the requested languages
    #[error("Unsupported language pair: {source_lang} -> {target}")]
    UnsupportedLanguagePair {
        /// Source language code
        source_lang: String,
        /// Target language code
        target: String,
    },
}

impl ProviderError {
    /// Whether a retry can reasonably succeed.
    ///
    /// Rate limiting, connection problems and server-side errors are
    /// transient; authentication failures, client errors, unparseable
    /// responses and unsupported language pairs are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RequestFailed(_) => true,
            Self::ConnectionError(_) => true,
            Self::RateLimitExceeded(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500,
            Self::ParseError(_) => false,
            Self::AuthenticationError(_) => false,
            Self::UnsupportedLanguagePair { .. } => false,
        }
    }
}

/// Errors that can occur in the localization pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A required slug or cross-reference entry is absent
    #[error("Missing mapping for '{entry}' in language '{language}'")]
    MissingMapping {
        /// The article key or symbol id that has no mapping
        entry: String,
        /// The language the mapping was needed for
        language: String,
    },

    /// An expected structural element is absent from a source document
    #[error("Malformed source document {path:?}: {reason}")]
    MalformedSource {
        /// Document the problem was found in
        path: PathBuf,
        /// What was expected and missing
        reason: String,
    },

    /// Transient translation failures exhausted the retry budget
    #[error("Translation failed after {attempts} attempts: {source}")]
    ServiceExhausted {
        /// Number of attempts made before giving up
        attempts: u32,
        /// The last provider failure observed
        #[source]
        source: ProviderError,
    },

    /// A structured-data payload could not be re-serialized
    #[error("Structured data validation failed in {context}: {reason}")]
    Validation {
        /// Where the payload lives (document path or field)
        context: String,
        /// Serializer failure message
        reason: String,
    },

    /// A non-retryable error from the provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from the localization pipeline
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
