//! One form session: the parameter state, its request controller, and the
//! service they talk to. Nothing here outlives the session.

use std::sync::Arc;

use encounters_params::ParameterState;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::controller::{RequestController, RequestResult};
use crate::prompt::{compile, validate, CompiledPrompt, IncompleteInput};
use crate::service::GenerationService;

pub struct FormSession {
    session_id: Uuid,
    state: ParameterState,
    controller: RequestController,
    service: Arc<dyn GenerationService>,
}

impl FormSession {
    pub fn new(service: Arc<dyn GenerationService>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            state: ParameterState::new(),
            controller: RequestController::new(),
            service,
        }
    }

    pub fn id(&self) -> Uuid {
        self.session_id
    }

    pub fn state(&self) -> &ParameterState {
        &self.state
    }

    /// Widgets write through this; the controller only ever sees snapshots.
    pub fn state_mut(&mut self) -> &mut ParameterState {
        &mut self.state
    }

    pub fn result(&self) -> &RequestResult {
        self.controller.result()
    }

    /// The prompt a submit would send right now, without sending it.
    pub fn preview_prompt(&self) -> Result<CompiledPrompt, IncompleteInput> {
        validate(&self.state.snapshot()).map(|spec| compile(&spec))
    }

    /// Snapshot the form and run one submission against the service.
    pub async fn generate(&mut self) -> Result<&RequestResult, IncompleteInput> {
        let span = info_span!("generate", session = %self.session_id);
        let snapshot = self.state.snapshot();
        self.controller
            .submit(&snapshot, Arc::clone(&self.service))
            .instrument(span)
            .await
    }
}
