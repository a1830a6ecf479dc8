//! Error types for quge operations.
//!
//! This module defines the main error type [`QugeError`] which represents
//! everything that can go wrong while classifying a URL, fetching pages,
//! and writing the assembled book.
//!
//! Pattern misses are never errors: a table of contents without a title or
//! without chapter lines simply produces a less complete [`Book`](crate::Book).
//!
//! # Example
//!
//! ```rust
//! use quge_core::{QugeError, Result};
//!
//! fn require_host(url: &str) -> Result<String> {
//!     let parsed = url::Url::parse(url).map_err(|e| QugeError::InvalidUrl(e.to_string()))?;
//!     parsed
//!         .host_str()
//!         .map(str::to_string)
//!         .ok_or_else(|| QugeError::InvalidUrl(url.to_string()))
//! }
//! # assert!(require_host("http://www.qu.la/book/1/").is_ok());
//! ```

use thiserror::Error;

/// Main error type for book assembly.
///
/// # Example
///
/// ```rust
/// use quge_core::{QugeError, SiteRegistry, Assembler, FetchConfig};
///
/// # async fn run() -> quge_core::Result<()> {
/// let registry = SiteRegistry::builtin()?;
/// let fetcher = quge_core::HttpFetcher::new(FetchConfig::default())?;
/// match Assembler::new(&registry, &fetcher).assemble("http://example.com/").await {
///     Ok(book) => println!("{} chapters", book.chapters.len()),
///     Err(QugeError::UnsupportedSite(host)) => println!("no profile for {}", host),
///     Err(e) => println!("Error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Error, Debug)]
pub enum QugeError {
    /// HTTP request errors from reqwest.
    ///
    /// Wraps network errors, DNS failures and connection problems.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// The server answered, but not with a success status.
    #[error("HTTP {status} while fetching {url}")]
    HttpStatus { url: String, status: u16 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// No site profile is registered for the host.
    #[error("Unsupported site: {0}")]
    UnsupportedSite(String),

    /// A site profile pattern failed to compile.
    #[error("Invalid site pattern: {0}")]
    InvalidPattern(String),

    /// File write errors.
    #[error("Failed to write output: {0}")]
    WriteError(#[from] std::io::Error),

    /// E-book container errors.
    #[error("Failed to build archive: {0}")]
    ArchiveError(String),

    /// Serialization errors for structured output.
    #[error("Failed to serialize book: {0}")]
    SerializeError(String),
}

impl From<zip::result::ZipError> for QugeError {
    fn from(err: zip::result::ZipError) -> Self {
        QugeError::ArchiveError(err.to_string())
    }
}

impl From<serde_json::Error> for QugeError {
    fn from(err: serde_json::Error) -> Self {
        QugeError::SerializeError(err.to_string())
    }
}

/// Result type alias for QugeError.
pub type Result<T> = std::result::Result<T, QugeError>;
