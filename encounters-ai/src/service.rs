// The seam between the request controller and whatever produces the narrative.

use thiserror::Error;

/// A text-generation backend: prompt in, narrative out.
///
/// Implementations block; async callers move them onto a blocking thread.
pub trait GenerationService: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String, ServiceError>;
}

/// Any failure of the generation call. Never shown to the user verbatim.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("no API key configured")]
    MissingCredential,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("response contained no text (reason: {reason:?})")]
    EmptyResponse { reason: Option<String> },

    #[error("generation worker interrupted: {0}")]
    Interrupted(String),
}
