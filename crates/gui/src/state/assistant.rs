use std::sync::mpsc;
use std::sync::Arc;

use shared::{ShapeId, SuggestedShape};

use super::scene::SceneState;
use super::settings::AiSettings;
use crate::ai::{self, AiError, GeminiBackend, SuggestionBackend};

/// Role of a message in the assistant log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// A single assistant log entry
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub is_error: bool,
}

type SuggestResult = Result<Vec<SuggestedShape>, AiError>;

/// Prompt box, in-flight request and message log of the AI assistant
#[derive(Default)]
pub struct AssistantState {
    pub messages: Vec<ChatMessage>,
    pub input: String,
    is_loading: bool,
    pending: Option<mpsc::Receiver<SuggestResult>>,
    runtime: Option<Arc<tokio::runtime::Runtime>>,
    backend: Option<Arc<dyn SuggestionBackend>>,
}

impl AssistantState {
    /// Assistant with a fixed backend instead of the one built from settings
    pub fn with_backend(backend: Arc<dyn SuggestionBackend>) -> Self {
        Self {
            backend: Some(backend),
            ..Default::default()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// True when the send button should be enabled
    pub fn can_send(&self) -> bool {
        !self.is_loading && !self.input.trim().is_empty()
    }

    /// Start a request for the current input.
    ///
    /// Returns false when nothing was sent: blank input, a request already
    /// in flight, or no usable backend. The input is kept until the request
    /// succeeds.
    pub fn send(&mut self, settings: &AiSettings, repaint: Option<egui::Context>) -> bool {
        if !self.can_send() {
            return false;
        }
        let prompt = self.input.trim().to_string();

        let backend = match self.backend_for(settings) {
            Ok(backend) => backend,
            Err(e) => {
                tracing::warn!("AI assistant unavailable: {e}");
                self.push_error(e.to_string());
                return false;
            }
        };
        let runtime = match self.runtime() {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::warn!("Failed to start async runtime: {e}");
                self.push_error(e.to_string());
                return false;
            }
        };

        self.messages.push(ChatMessage {
            role: ChatRole::User,
            text: prompt.clone(),
            is_error: false,
        });

        let (tx, rx) = mpsc::channel();
        runtime.spawn(async move {
            let result = ai::suggest(backend.as_ref(), &prompt).await;
            // Receiver gone means the app is shutting down
            let _ = tx.send(result);
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });

        self.pending = Some(rx);
        self.is_loading = true;
        tracing::info!("AI request sent");
        true
    }

    /// Drain a finished request into the scene.
    ///
    /// Returns the ids of the inserted shapes once the request completes
    /// successfully (possibly empty), `None` while waiting or on failure.
    pub fn poll(&mut self, scene: &mut SceneState) -> Option<Vec<ShapeId>> {
        let rx = self.pending.as_ref()?;
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(mpsc::TryRecvError::Empty) => return None,
            Err(mpsc::TryRecvError::Disconnected) => Err(AiError::EmptyResponse),
        };
        self.pending = None;
        self.is_loading = false;

        match result {
            Ok(suggestions) => {
                let shapes = ai::materialize(&suggestions, scene.len());
                let ids = scene.add_many(shapes);
                self.messages.push(ChatMessage {
                    role: ChatRole::Assistant,
                    text: format!("{} {}", ids.len(), crate::i18n::t("ai.added")),
                    is_error: false,
                });
                self.input.clear();
                Some(ids)
            }
            Err(e) => {
                tracing::warn!("AI generation failed: {e}");
                self.push_error(crate::i18n::t("ai.error").to_string());
                None
            }
        }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.input.clear();
    }

    /// Forget the backend so the next request builds one from the current
    /// settings
    pub fn reset_backend(&mut self) {
        self.backend = None;
    }

    fn push_error(&mut self, text: String) {
        self.messages.push(ChatMessage {
            role: ChatRole::Assistant,
            text,
            is_error: true,
        });
    }

    fn backend_for(&mut self, settings: &AiSettings) -> Result<Arc<dyn SuggestionBackend>, AiError> {
        if let Some(backend) = &self.backend {
            return Ok(backend.clone());
        }
        let backend: Arc<dyn SuggestionBackend> = Arc::new(GeminiBackend::from_settings(settings)?);
        self.backend = Some(backend.clone());
        Ok(backend)
    }

    fn runtime(&mut self) -> std::io::Result<Arc<tokio::runtime::Runtime>> {
        if let Some(runtime) = &self.runtime {
            return Ok(runtime.clone());
        }
        let runtime = Arc::new(
            tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()?,
        );
        self.runtime = Some(runtime.clone());
        Ok(runtime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::GenerateFuture;
    use std::time::{Duration, Instant};

    struct Canned(&'static str);

    impl SuggestionBackend for Canned {
        fn generate<'a>(&'a self, _instruction: &'a str) -> GenerateFuture<'a> {
            Box::pin(async move { Ok(self.0.to_string()) })
        }
    }

    struct Failing;

    impl SuggestionBackend for Failing {
        fn generate<'a>(&'a self, _instruction: &'a str) -> GenerateFuture<'a> {
            Box::pin(async { Err::<String, _>(AiError::Status { status: 500, body: "boom".into() }) })
        }
    }

    fn wait(assistant: &mut AssistantState, scene: &mut SceneState) -> Option<Vec<ShapeId>> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while assistant.is_loading() && Instant::now() < deadline {
            if let Some(ids) = assistant.poll(scene) {
                return Some(ids);
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        None
    }

    #[test]
    fn test_blank_input_is_not_sent() {
        let mut assistant = AssistantState::with_backend(Arc::new(Canned("[]")));
        assistant.input = "   ".into();
        assert!(!assistant.send(&AiSettings::default(), None));
        assert!(!assistant.is_loading());
        assert!(assistant.messages.is_empty());
    }

    #[test]
    fn test_success_inserts_and_clears_input() {
        let reply = r##"[{"type":"sphere","position":[0,1,0],"scale":[1,1,1],"color":"#ffffff","name":"Head"},
                        {"type":"box","position":[0,0,0],"scale":[1,1,1],"color":"#000000","name":"Body"}]"##;
        let mut assistant = AssistantState::with_backend(Arc::new(Canned(reply)));
        let mut scene = SceneState::new();
        assistant.input = "a snowman".into();

        assert!(assistant.send(&AiSettings::default(), None));
        assert!(assistant.is_loading());
        assert!(!assistant.can_send(), "no overlapping requests");
        assert!(!assistant.send(&AiSettings::default(), None));

        let ids = wait(&mut assistant, &mut scene).unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.get(&ids[0]).unwrap().name, "Head");
        assert!(assistant.input.is_empty());
        assert!(!assistant.is_loading());
        assert_eq!(assistant.messages[0].role, ChatRole::User);
    }

    #[test]
    fn test_failure_keeps_input_and_reports() {
        let mut assistant = AssistantState::with_backend(Arc::new(Failing));
        let mut scene = SceneState::new();
        assistant.input = "a car".into();

        assert!(assistant.send(&AiSettings::default(), None));
        let deadline = Instant::now() + Duration::from_secs(5);
        while assistant.is_loading() && Instant::now() < deadline {
            assert!(assistant.poll(&mut scene).is_none());
            std::thread::sleep(Duration::from_millis(5));
        }

        assert!(!assistant.is_loading());
        assert!(scene.is_empty());
        assert_eq!(assistant.input, "a car");
        let last = assistant.messages.last().unwrap();
        assert!(last.is_error);
        assert_eq!(last.role, ChatRole::Assistant);
    }

    #[test]
    fn test_unusable_reply_adds_nothing() {
        let mut assistant = AssistantState::with_backend(Arc::new(Canned("not json")));
        let mut scene = SceneState::new();
        assistant.input = "whatever".into();
        assistant.send(&AiSettings::default(), None);

        let ids = wait(&mut assistant, &mut scene).unwrap();
        assert!(ids.is_empty());
        assert!(scene.is_empty());
    }
}
