//! Client construction errors
//!
//! Per-request failures are reported as [`mortgage_core::ClientError`].

/// Errors building an [`crate::HttpCollectionClient`]
#[derive(Debug, thiserror::Error)]
pub enum HttpSetupError {
    /// Base URL does not parse
    #[error("invalid base url '{url}': {source}")]
    InvalidBaseUrl {
        /// Configured value
        url: String,
        /// Parse failure
        #[source]
        source: url::ParseError,
    },

    /// Base URL is not http or https
    #[error("unsupported url scheme '{0}', expected http or https")]
    UnsupportedScheme(String),

    /// Collection name is empty or contains a path separator
    #[error("invalid collection name '{0}'")]
    InvalidCollection(String),

    /// TLS or resolver setup failed
    #[error("failed to build http client: {0}")]
    Build(#[from] reqwest::Error),
}
