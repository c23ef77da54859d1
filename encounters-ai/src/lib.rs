// Turns a planet snapshot into a prompt, sends it to the text model,
// and tracks what the output region should show.

pub mod controller;
pub mod gemini;
pub mod prompt;
pub mod service;
pub mod session;

pub use controller::{
    RequestController, RequestResult, Resolution, Ticket, FAILURE_MESSAGE, PLACEHOLDER_TEXT,
};
pub use gemini::{extract_text, ClientConfig, GeminiClient};
pub use prompt::{compile, validate, CompiledPrompt, IncompleteInput, PlanetSpec, VALIDATION_ALERT};
pub use service::{GenerationService, ServiceError};
pub use session::FormSession;
