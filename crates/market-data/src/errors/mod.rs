//! Error types for the market data crate.

use thiserror::Error;

/// Errors that can occur while fetching a snapshot from a provider.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The provider does not know this symbol.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request did not complete within the allotted time.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A provider-specific failure (bad status, auth, unparseable body).
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider answered but the payload was unusable.
    #[error("Validation failed: {message}")]
    ValidationFailed {
        /// Description of the validation failure
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Transient failures a later enrichment attempt could get past.
    ///
    /// Enrichment never retries on its own; this only drives log severity.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Timeout { .. } | Self::Network(_) => true,
            Self::SymbolNotFound(_) | Self::ProviderError { .. } | Self::ValidationFailed { .. } => {
                false
            }
        }
    }
}
