//! Request lifecycle: Idle -> Pending -> {Success, Failure}, and back to
//! Pending on the next submit.
//!
//! Each accepted submission is tagged with a monotonically increasing
//! sequence number. Only the most recently issued one may resolve the
//! result; anything older is dropped as stale, so overlapping calls cannot
//! overwrite a newer answer with an older one.

use std::sync::Arc;

use encounters_params::ParameterSnapshot;
use tracing::{debug, error, info, warn};

use crate::prompt::{compile, validate, CompiledPrompt, IncompleteInput};
use crate::service::{GenerationService, ServiceError};

/// Output-region text while nothing has resolved yet.
pub const PLACEHOLDER_TEXT: &str = "Generating...";

/// Output-region text for any service failure.
pub const FAILURE_MESSAGE: &str = "Failed to generate planet. Please try again later.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestResult {
    #[default]
    Idle,
    Pending,
    Success(String),
    Failure(String),
}

impl RequestResult {
    /// What the output region should show for this state.
    pub fn display_text(&self) -> &str {
        match self {
            RequestResult::Idle | RequestResult::Pending => PLACEHOLDER_TEXT,
            RequestResult::Success(text) | RequestResult::Failure(text) => text,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, RequestResult::Pending)
    }
}

/// An accepted submission: its sequence number and the prompt to send.
#[derive(Debug, Clone)]
pub struct Ticket {
    seq: u64,
    prompt: CompiledPrompt,
}

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn prompt(&self) -> &CompiledPrompt {
        &self.prompt
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The outcome became the current result.
    Applied,
    /// The outcome belonged to a superseded or already-resolved submission.
    Stale,
}

#[derive(Debug, Default)]
pub struct RequestController {
    result: RequestResult,
    issued: u64,
    outstanding: Option<u64>,
}

impl RequestController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn result(&self) -> &RequestResult {
        &self.result
    }

    /// Validate and compile a snapshot, then move to `Pending`.
    ///
    /// On `IncompleteInput` nothing changes: the result keeps its old value
    /// and no sequence number is consumed.
    pub fn begin(&mut self, snapshot: &ParameterSnapshot) -> Result<Ticket, IncompleteInput> {
        let spec = validate(snapshot).inspect_err(|e| {
            warn!(missing = ?e.missing, "submission blocked");
        })?;

        self.issued += 1;
        let seq = self.issued;
        self.outstanding = Some(seq);
        self.result = RequestResult::Pending;

        let prompt = compile(&spec);
        info!(seq, "submission pending");
        debug!(seq, prompt = prompt.as_str(), "compiled prompt");

        Ok(Ticket { seq, prompt })
    }

    /// Apply the service outcome for submission `seq`.
    ///
    /// Failures are logged with their cause and replaced by the fixed
    /// user-facing message. Empty text counts as a malformed response.
    pub fn resolve(&mut self, seq: u64, outcome: Result<String, ServiceError>) -> Resolution {
        if self.outstanding != Some(seq) {
            warn!(seq, latest = self.issued, "discarding stale response");
            return Resolution::Stale;
        }
        self.outstanding = None;

        let outcome = match outcome {
            Ok(text) if text.trim().is_empty() => {
                Err(ServiceError::EmptyResponse { reason: None })
            }
            other => other,
        };

        self.result = match outcome {
            Ok(text) => {
                info!(seq, chars = text.len(), "generation succeeded");
                RequestResult::Success(text)
            }
            Err(err) => {
                error!(seq, error = %err, "generation failed");
                RequestResult::Failure(FAILURE_MESSAGE.to_string())
            }
        };
        Resolution::Applied
    }

    /// Run a whole submission on the current thread.
    pub fn submit_blocking(
        &mut self,
        snapshot: &ParameterSnapshot,
        service: &dyn GenerationService,
    ) -> Result<&RequestResult, IncompleteInput> {
        let ticket = self.begin(snapshot)?;
        let outcome = service.generate(ticket.prompt().as_str());
        self.resolve(ticket.seq(), outcome);
        Ok(&self.result)
    }

    /// Run a whole submission, with the service call on tokio's blocking pool.
    ///
    /// No timeout is applied; the service's own limits govern.
    pub async fn submit(
        &mut self,
        snapshot: &ParameterSnapshot,
        service: Arc<dyn GenerationService>,
    ) -> Result<&RequestResult, IncompleteInput> {
        let Ticket { seq, prompt } = self.begin(snapshot)?;

        let outcome =
            match tokio::task::spawn_blocking(move || service.generate(prompt.as_str())).await {
                Ok(outcome) => outcome,
                Err(join) => Err(ServiceError::Interrupted(join.to_string())),
            };

        self.resolve(seq, outcome);
        Ok(&self.result)
    }
}
