//! Session error types

use std::error::Error as StdError;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors produced while building a session or resolving its credentials
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Building a session failed outright
    #[error("{context}: {source}")]
    Construction {
        context: String,
        #[source]
        source: BoxError,
    },

    /// The loaded configuration carries no credentials provider at all
    #[error("no credentials provider is configured")]
    MissingCredentialsProvider,

    /// The credential chain yielded no usable credentials on first use
    #[error("failed to resolve credentials: {0}")]
    CredentialResolution(String),
}

impl SessionError {
    /// Wrap `source` with a context message describing the failed step
    pub fn construction(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        SessionError::Construction {
            context: context.into(),
            source: source.into(),
        }
    }

    pub fn is_construction(&self) -> bool {
        matches!(self, SessionError::Construction { .. })
    }
}
