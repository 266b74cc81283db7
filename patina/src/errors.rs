//! Error types for the restoration pipeline.
//!
//! The taxonomy has three tiers: precondition failures detected before any
//! remote call, provider failures raised by the hosted model or search
//! services, and non-fatal template warnings that ride along on stage
//! outputs without ever failing a run.

use thiserror::Error;

use crate::context::StageName;

/// The top-level error type for pipeline operations.
#[derive(Debug, Error)]
pub enum RestorationError {
    /// A required input was missing; the pipeline never started.
    #[error("{0}")]
    Precondition(#[from] PreconditionError),

    /// A remote provider call failed; the run was aborted.
    #[error("{0}")]
    Provider(#[from] ProviderError),

    /// The run was cancelled between stages.
    #[error("Pipeline cancelled: {reason}")]
    Cancelled {
        /// The reason supplied to the cancellation token.
        reason: String,
    },

    /// An invariant was violated inside the pipeline itself.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A missing input detected before any remote call is made.
///
/// Each missing item gets its own variant so callers can address the
/// specific gap rather than reporting a combined generic error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PreconditionError {
    /// No model-provider API key was supplied.
    #[error("Missing model provider API key")]
    MissingModelCredential,

    /// No search-provider API key was supplied.
    #[error("Missing search provider API key")]
    MissingSearchCredential,

    /// No car image was supplied.
    #[error("Missing car image")]
    MissingImage,
}

/// A failure from a hosted provider (language model or search service).
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider rejected the supplied credentials.
    #[error("{provider} rejected the API key (status {status})")]
    Auth {
        /// The provider name.
        provider: &'static str,
        /// The HTTP status returned.
        status: u16,
    },

    /// The provider could not be reached.
    #[error("{provider} request failed: {source}")]
    Transport {
        /// The provider name.
        provider: &'static str,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The provider returned a non-success status.
    #[error("{provider} returned status {status}: {message}")]
    Status {
        /// The provider name.
        provider: &'static str,
        /// The HTTP status returned.
        status: u16,
        /// The response body, truncated for logging.
        message: String,
    },

    /// The call exceeded its deadline.
    #[error("{provider} request timed out after {seconds}s")]
    Timeout {
        /// The provider name.
        provider: &'static str,
        /// The deadline in seconds.
        seconds: u64,
    },

    /// The provider responded with a body this client cannot interpret.
    #[error("{provider} returned a malformed response: {detail}")]
    MalformedResponse {
        /// The provider name.
        provider: &'static str,
        /// What was wrong with the body.
        detail: String,
    },
}

impl ProviderError {
    /// Whether the failure was an authentication rejection.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }
}

/// A non-fatal structural mismatch between a stage's output and the
/// template its instructions requested.
///
/// The pipeline attaches these to the offending [`crate::context::StageOutput`]
/// and logs them; stage output is free-form text for human reading, so a
/// mismatch never fails the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateWarning {
    /// The stage whose output missed its template.
    pub stage: StageName,
    /// The required heading that was not found.
    pub missing_heading: String,
}

impl std::fmt::Display for TemplateWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "stage '{}' output is missing required heading '{}'",
            self.stage.as_str(),
            self.missing_heading
        )
    }
}
