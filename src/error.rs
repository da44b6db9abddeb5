use thiserror::Error;

/// Failure of the reply-generation provider.
///
/// The orchestrator never surfaces these to the HTTP caller; it matches on
/// them to pick a fallback reply. `Api` keeps both the HTTP status and the
/// provider's embedded error code, since rate limiting can show up in either
/// place depending on how the provider reports it.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned {status}: {message}")]
    Api {
        status: u16,
        /// Provider-specific error code embedded in the response body, if any.
        code: Option<u16>,
        message: String,
    },

    #[error("provider returned an empty completion")]
    EmptyResponse,
}

impl ProviderError {
    /// HTTP status of the failed call, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Provider-specific error code from the response body, if present.
    pub fn provider_code(&self) -> Option<u16> {
        match self {
            ProviderError::Api { code, .. } => *code,
            _ => None,
        }
    }
}

/// Failure of a translation backend. Absorbed by the orchestrator's
/// best-effort degrade, never surfaced raw.
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("translation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("translation backend returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("translation backend returned an empty result")]
    EmptyResponse,
}

/// Failures that a turn submission can surface to its caller.
///
/// Everything the providers can throw is absorbed before this point; only
/// malformed input and a broken conversation log escape.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("message required")]
    EmptyMessage,

    #[error("failed to persist chat message")]
    Persistence(#[source] anyhow::Error),
}
