use std::sync::{Arc, Mutex};

use encounters_ai::{
    compile, validate, FormSession, GenerationService, RequestController, RequestResult,
    Resolution, ServiceError, FAILURE_MESSAGE,
};
use encounters_params::{ClimateType, NumericField, ParameterSnapshot, StarType};

/// Returns a canned reply and records every prompt it sees.
struct Scripted {
    reply: fn() -> Result<String, ServiceError>,
    prompts: Mutex<Vec<String>>,
}

impl Scripted {
    fn new(reply: fn() -> Result<String, ServiceError>) -> Self {
        Self {
            reply,
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

impl GenerationService for Scripted {
    fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        (self.reply)()
    }
}

fn scenario_a() -> ParameterSnapshot {
    ParameterSnapshot {
        planet_size: 10000,
        climate_type: Some(ClimateType::Temperate),
        star_type: Some(StarType::Sun),
        distance_from_star: 1.2,
        n2: 50,
        o2: 50,
        co2: 50,
        day_length: 24,
        year_length: 365,
        axial_tilt: 23.5,
        timeline: 8.0,
    }
}

#[test]
fn scenario_a_compiles_labelled_fields() {
    let spec = validate(&scenario_a()).unwrap();
    let prompt = compile(&spec);

    assert!(prompt.as_str().contains("Planet Size (Diameter): 10000 Km"));
    assert!(prompt.as_str().contains("Climate Type: Temperate"));
    assert!(prompt.as_str().contains("Type of Star: Sun"));
    assert!(prompt.as_str().contains("Distance from Star (AU): 1.2"));
}

#[test]
fn compilation_is_deterministic() {
    let a = compile(&validate(&scenario_a()).unwrap());
    let b = compile(&validate(&scenario_a().clone()).unwrap());
    assert_eq!(a.as_str().as_bytes(), b.as_str().as_bytes());
}

#[test]
fn validation_fails_iff_a_selection_is_unset() {
    for climate in [None, Some(ClimateType::Tropical)] {
        for star in [None, Some(StarType::Dwarf)] {
            let snapshot = ParameterSnapshot {
                climate_type: climate,
                star_type: star,
                planet_size: 20000,
                axial_tilt: 90.0,
                ..Default::default()
            };
            let complete = climate.is_some() && star.is_some();
            assert_eq!(validate(&snapshot).is_ok(), complete);
        }
    }
}

#[test]
fn scenario_b_missing_climate_blocks_submission() {
    let service = Scripted::new(|| Ok("never".into()));
    let mut ctl = RequestController::new();
    let snapshot = ParameterSnapshot {
        climate_type: None,
        ..scenario_a()
    };

    let err = ctl.submit_blocking(&snapshot, &service).unwrap_err();

    assert_eq!(err.missing, vec!["climate type"]);
    assert_eq!(ctl.result(), &RequestResult::Idle);
    assert_eq!(service.calls(), 0);
}

#[test]
fn blocked_submission_keeps_previous_result() {
    let service = Scripted::new(|| Ok("a world of gliders".into()));
    let mut ctl = RequestController::new();
    ctl.submit_blocking(&scenario_a(), &service).unwrap();

    let incomplete = ParameterSnapshot {
        star_type: None,
        ..scenario_a()
    };
    assert!(ctl.submit_blocking(&incomplete, &service).is_err());

    assert_eq!(
        ctl.result(),
        &RequestResult::Success("a world of gliders".into())
    );
}

#[test]
fn scenario_c_network_error_shows_generic_message() {
    let service = Scripted::new(|| Err(ServiceError::Transport("connection reset by peer".into())));
    let mut ctl = RequestController::new();

    let result = ctl.submit_blocking(&scenario_a(), &service).unwrap();

    assert_eq!(result, &RequestResult::Failure(FAILURE_MESSAGE.into()));
    assert!(!result.display_text().contains("connection reset"));
}

#[test]
fn success_carries_service_text_and_sends_compiled_prompt() {
    let service = Scripted::new(|| Ok("Here, on this temperate world...".into()));
    let mut ctl = RequestController::new();

    let result = ctl.submit_blocking(&scenario_a(), &service).unwrap().clone();

    assert_eq!(
        result,
        RequestResult::Success("Here, on this temperate world...".into())
    );
    let expected = compile(&validate(&scenario_a()).unwrap());
    assert_eq!(service.prompts.lock().unwrap()[0], expected.as_str());
}

#[test]
fn resubmitting_after_failure_goes_back_to_pending() {
    let mut ctl = RequestController::new();
    let first = ctl.begin(&scenario_a()).unwrap();
    ctl.resolve(first.seq(), Err(ServiceError::MissingCredential));
    assert!(matches!(ctl.result(), RequestResult::Failure(_)));

    ctl.begin(&scenario_a()).unwrap();
    assert!(ctl.result().is_pending());
}

#[test]
fn late_response_from_superseded_submission_is_dropped() {
    let mut ctl = RequestController::new();
    let older = ctl.begin(&scenario_a()).unwrap();
    let newer = ctl.begin(&scenario_a()).unwrap();
    assert!(newer.seq() > older.seq());

    assert_eq!(ctl.resolve(newer.seq(), Ok("newer".into())), Resolution::Applied);
    assert_eq!(ctl.resolve(older.seq(), Ok("older".into())), Resolution::Stale);

    assert_eq!(ctl.result(), &RequestResult::Success("newer".into()));
}

#[test]
fn superseded_response_arriving_first_does_not_resolve() {
    let mut ctl = RequestController::new();
    let older = ctl.begin(&scenario_a()).unwrap();
    let newer = ctl.begin(&scenario_a()).unwrap();

    assert_eq!(ctl.resolve(older.seq(), Ok("older".into())), Resolution::Stale);
    assert!(ctl.result().is_pending());

    ctl.resolve(newer.seq(), Err(ServiceError::EmptyResponse { reason: None }));
    assert_eq!(ctl.result(), &RequestResult::Failure(FAILURE_MESSAGE.into()));
}

#[tokio::test]
async fn async_submit_resolves_through_blocking_pool() {
    let service: Arc<dyn GenerationService> =
        Arc::new(Scripted::new(|| Ok("six-legged grazers".into())));
    let mut ctl = RequestController::new();

    let result = ctl.submit(&scenario_a(), service).await.unwrap();

    assert_eq!(result, &RequestResult::Success("six-legged grazers".into()));
}

#[tokio::test]
async fn session_runs_form_events_through_to_result() {
    let scripted = Arc::new(Scripted::new(|| Ok("ice-skimming filter feeders".into())));
    let mut session = FormSession::new(scripted.clone());

    assert!(session.generate().await.is_err());
    assert_eq!(session.result(), &RequestResult::Idle);

    let form = session.state_mut();
    form.set(NumericField::DistanceFromStar, 1.4).unwrap();
    form.set_climate_type(Some(ClimateType::Polar));
    form.set_star_type(Some(StarType::Dwarf));

    let preview = session.preview_prompt().unwrap();
    assert!(preview.as_str().contains("Distance from Star (AU): 0.2"));

    let result = session.generate().await.unwrap();
    assert_eq!(
        result,
        &RequestResult::Success("ice-skimming filter feeders".into())
    );
    assert_eq!(scripted.calls(), 1);
    assert_eq!(scripted.prompts.lock().unwrap()[0], preview.as_str());
}
