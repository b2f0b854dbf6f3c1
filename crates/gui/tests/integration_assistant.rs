//! Integration tests for the AI suggestion bridge with fake backends.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use maker3d_gui_lib::ai::{self, AiError, GenerateFuture, SuggestionBackend};
use maker3d_gui_lib::state::settings::AiSettings;
use maker3d_gui_lib::state::{AppState, AppSettings, AssistantState};
use shared::{ShapeType, DEFAULT_COLOR};

/// Returns a fixed reply and records the instruction it was sent
struct Recording {
    reply: String,
    seen: Mutex<Vec<String>>,
}

impl Recording {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            seen: Mutex::new(Vec::new()),
        })
    }
}

impl SuggestionBackend for Recording {
    fn generate<'a>(&'a self, instruction: &'a str) -> GenerateFuture<'a> {
        Box::pin(async move {
            self.seen.lock().unwrap().push(instruction.to_string());
            Ok(self.reply.clone())
        })
    }
}

struct Down;

impl SuggestionBackend for Down {
    fn generate<'a>(&'a self, _instruction: &'a str) -> GenerateFuture<'a> {
        Box::pin(async { Err::<String, _>(AiError::Status { status: 503, body: "unavailable".into() }) })
    }
}

const SNOWMAN: &str = r##"[
    {"type":"sphere","position":[0,1,0],"scale":[2,2,2],"color":"#ffffff","name":"Base"},
    {"type":"sphere","position":[0,2.6,0],"scale":[1.4,1.4,1.4],"color":"#ffffff","name":"Head"},
    {"type":"cone","position":[0,2.6,0.7],"scale":[0.2,0.5,0.2]}
]"##;

fn wait_for(state: &mut AppState) -> Option<Vec<String>> {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if let Some(ids) = state.poll_assistant() {
            return Some(ids);
        }
        if !state.assistant.is_loading() {
            return None;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    panic!("assistant request did not finish");
}

#[tokio::test]
async fn test_suggest_sends_prompt_in_instruction() {
    let backend = Recording::new(SNOWMAN);
    let suggestions = ai::suggest(backend.as_ref(), "  un bonhomme de neige  ").await.unwrap();
    assert_eq!(suggestions.len(), 3);
    assert_eq!(suggestions[2].kind, Some(ShapeType::Cone));
    assert_eq!(suggestions[2].color, None);

    let seen = backend.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].contains("\"un bonhomme de neige\""));
}

#[tokio::test]
async fn test_suggest_blank_prompt_never_calls_backend() {
    let backend = Recording::new("[]");
    let err = ai::suggest(backend.as_ref(), "   ").await.unwrap_err();
    assert!(matches!(err, AiError::EmptyPrompt));
    assert!(backend.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_suggest_unusable_reply_is_empty_not_error() {
    let backend = Recording::new("Désolé, je ne peux pas.");
    let suggestions = ai::suggest(backend.as_ref(), "une fusée").await.unwrap();
    assert!(suggestions.is_empty());
}

#[tokio::test]
async fn test_suggest_transport_failure_is_error() {
    let err = ai::suggest(&Down, "une fusée").await.unwrap_err();
    assert!(matches!(err, AiError::Status { status: 503, .. }));
}

#[test]
fn test_assistant_appends_without_selecting() {
    let mut state = AppState::with_settings(AppSettings::default());
    state.assistant = AssistantState::with_backend(Recording::new(SNOWMAN));
    let existing = state.scene.add_from_palette(ShapeType::Box);
    let version = state.scene.version();

    state.assistant.input = "un bonhomme de neige".into();
    assert!(state.assistant.send(&AiSettings::default(), None));
    assert!(state.assistant.is_loading());
    assert!(!state.assistant.can_send(), "no overlapping requests");

    let ids = wait_for(&mut state).expect("request should succeed");
    assert_eq!(ids.len(), 3);
    assert_eq!(state.scene.len(), 4);
    assert_eq!(state.scene.version(), version + 1, "one batch insert");
    assert_eq!(state.scene.selected_id(), Some(existing.as_str()));

    let cone = state.scene.get(&ids[2]).unwrap();
    assert_eq!(cone.color, DEFAULT_COLOR);
    assert_eq!(cone.name, "IA Object 4");
    assert_eq!(cone.rotation, [0.0, 0.0, 0.0]);
    assert!(state.assistant.input.is_empty());
}

#[test]
fn test_assistant_failure_leaves_scene_and_input() {
    let mut state = AppState::with_settings(AppSettings::default());
    state.assistant = AssistantState::with_backend(Arc::new(Down));
    state.assistant.input = "une fusée".into();

    assert!(state.assistant.send(&AiSettings::default(), None));
    assert!(wait_for(&mut state).is_none());
    assert!(state.scene.is_empty());
    assert_eq!(state.assistant.input, "une fusée");
    assert!(state.assistant.messages.last().unwrap().is_error);
    assert!(state.assistant.can_send());
}

#[test]
fn test_assistant_single_sphere_lands_exactly() {
    let reply = r##"[{"type":"sphere","position":[1,2,3],"scale":[2,2,2],"color":"#ff0000","name":"Ball"}]"##;
    let mut state = AppState::with_settings(AppSettings::default());
    state.assistant = AssistantState::with_backend(Recording::new(reply));
    let existing = state.scene.add_from_palette(ShapeType::Box);
    let before = state.scene.len();

    state.assistant.input = "une balle rouge".into();
    assert!(state.assistant.send(&AiSettings::default(), None));
    let ids = wait_for(&mut state).expect("request should succeed");

    assert_eq!(ids.len(), 1);
    assert_eq!(state.scene.len(), before + 1);
    assert_eq!(state.scene.objects().last().unwrap().id, ids[0]);
    assert_ne!(ids[0], existing);
    assert!(!ids[0].is_empty());

    let ball = state.scene.get(&ids[0]).unwrap();
    assert_eq!(ball.kind, ShapeType::Sphere);
    assert_eq!(ball.position, [1.0, 2.0, 3.0]);
    assert_eq!(ball.rotation, [0.0, 0.0, 0.0]);
    assert_eq!(ball.scale, [2.0, 2.0, 2.0]);
    assert_eq!(ball.color, "#ff0000");
    assert_eq!(ball.name, "Ball");
}
