use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use aid_core::model::{Difficulty, QuestionDraft, QuestionId, Topic};
use aid_core::time::fixed_clock;
use services::ai::{ChatMessage, ChatRole, GeneratedQuestion, GenerativeService};
use services::assistant::FALLBACK_REPLY;
use services::error::GenerationError;
use services::{
    AssistantService, ChatSession, ImportError, PerformanceService, QuestionImportService,
    ScenarioImageService,
};
use storage::repository::Storage;

#[derive(Default)]
struct FakeGenerator {
    extracted: Vec<GeneratedQuestion>,
    fail: bool,
    chat_history_lens: Mutex<Vec<usize>>,
}

fn generated(text: &str, correct_answer: i64) -> GeneratedQuestion {
    GeneratedQuestion {
        text: text.into(),
        options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
        correct_answer,
        explanation: "Açıklama".into(),
    }
}

#[async_trait]
impl GenerativeService for FakeGenerator {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn generate_question(
        &self,
        _topic: Topic,
        _difficulty: Difficulty,
    ) -> Result<GeneratedQuestion, GenerationError> {
        if self.fail {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(generated("Üretilen soru", 1))
    }

    async fn generate_image(&self, _question_text: &str) -> Result<String, GenerationError> {
        if self.fail {
            return Err(GenerationError::EmptyResponse);
        }
        Ok("data:image/png;base64,AAAA".into())
    }

    async fn extract_questions(
        &self,
        _content: &str,
    ) -> Result<Vec<GeneratedQuestion>, GenerationError> {
        if self.fail {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(self.extracted.clone())
    }

    async fn chat(
        &self,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String, GenerationError> {
        self.chat_history_lens.lock().unwrap().push(history.len());
        if self.fail {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(format!("Yanıt: {message}"))
    }
}

fn import_service(generator: FakeGenerator, storage: &Storage) -> QuestionImportService {
    QuestionImportService::new(
        fixed_clock(),
        Arc::new(generator),
        PerformanceService::new(storage.user_state.clone()),
    )
}

#[tokio::test]
async fn import_keeps_valid_items_under_exam_topic() {
    let storage = Storage::in_memory();
    let generator = FakeGenerator {
        extracted: vec![generated("Bir", 0), generated("İki", 7), generated("Üç", 3)],
        ..FakeGenerator::default()
    };
    let service = import_service(generator, &storage);

    let report = service.import_text("ders notu").await.unwrap();
    assert_eq!(report.added, 2);
    assert_eq!(report.rejected, 1);

    let state = PerformanceService::new(storage.user_state.clone())
        .load()
        .await
        .unwrap();
    let custom = state.custom_questions();
    assert_eq!(custom.len(), 2);
    assert!(custom.iter().all(|q| q.topic() == Topic::PdfExam));
    assert!(custom.iter().all(|q| q.difficulty() == Difficulty::Medium));
    assert!(custom[0].id().as_str().starts_with("imported-"));
    assert!(custom[1].id().as_str().ends_with("-2"));
}

#[tokio::test]
async fn import_rejects_blank_and_empty_extractions() {
    let storage = Storage::in_memory();
    let service = import_service(FakeGenerator::default(), &storage);

    assert!(matches!(
        service.import_text("   ").await.unwrap_err(),
        ImportError::EmptyInput
    ));
    assert!(matches!(
        service.import_text("metin").await.unwrap_err(),
        ImportError::NothingExtracted
    ));
    assert!(storage.user_state.load_user_state().await.unwrap().is_none());
}

#[tokio::test]
async fn generated_question_is_stored_and_removable() {
    let storage = Storage::in_memory();
    let service = import_service(FakeGenerator::default(), &storage);

    let question = service
        .generate_for_topic(Topic::Choking, Difficulty::Hard)
        .await
        .unwrap();
    assert!(question.id().as_str().starts_with("ai-"));
    assert_eq!(question.topic(), Topic::Choking);

    assert!(service.remove(question.id()).await.unwrap());
    assert!(!service.remove(question.id()).await.unwrap());
}

#[tokio::test]
async fn generation_with_taken_id_is_an_error() {
    let storage = Storage::in_memory();
    let service = import_service(FakeGenerator::default(), &storage);

    let first = service
        .generate_for_topic(Topic::Burns, Difficulty::Hard)
        .await
        .unwrap();
    let err = service
        .generate_for_topic(Topic::Burns, Difficulty::Hard)
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::DuplicateId(ref id) if id == first.id()));

    let state = PerformanceService::new(storage.user_state.clone())
        .load()
        .await
        .unwrap();
    assert_eq!(state.custom_questions().len(), 1);
}

#[tokio::test]
async fn images_prefer_existing_url_and_swallow_failures() {
    let with_url = QuestionDraft {
        id: QuestionId::new("q1"),
        text: "Soru".into(),
        options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
        correct_answer: 0,
        explanation: String::new(),
        topic: Topic::Fractures,
        difficulty: Difficulty::Easy,
        image_url: Some("https://example.org/kirik.png".into()),
    }
    .validate()
    .unwrap();

    let failing = ScenarioImageService::new(Arc::new(FakeGenerator {
        fail: true,
        ..FakeGenerator::default()
    }));
    assert_eq!(
        failing.image_for(&with_url).await.as_deref(),
        Some("https://example.org/kirik.png")
    );

    let bare = QuestionDraft {
        id: QuestionId::new("q2"),
        text: "Soru".into(),
        options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
        correct_answer: 0,
        explanation: String::new(),
        topic: Topic::Fractures,
        difficulty: Difficulty::Easy,
        image_url: None,
    }
    .validate()
    .unwrap();
    assert!(failing.image_for(&bare).await.is_none());

    let working = ScenarioImageService::new(Arc::new(FakeGenerator::default()));
    let handle = working.spawn_prefetch(bare);
    assert_eq!(
        handle.await.unwrap().as_deref(),
        Some("data:image/png;base64,AAAA")
    );
}

#[tokio::test]
async fn assistant_keeps_history_and_falls_back() {
    let generator = Arc::new(FakeGenerator::default());
    let assistant = AssistantService::new(generator.clone());
    let mut session = ChatSession::new();

    assert!(assistant.send(&mut session, "  ").await.is_none());
    let reply = assistant.send(&mut session, "Merhaba").await.unwrap();
    assert_eq!(reply.role, ChatRole::Model);
    assert_eq!(reply.text, "Yanıt: Merhaba");
    assistant.send(&mut session, "Yanığa ne iyi gelir?").await.unwrap();

    assert_eq!(session.messages().len(), 4);
    assert_eq!(*generator.chat_history_lens.lock().unwrap(), vec![0, 2]);

    let failing = AssistantService::new(Arc::new(FakeGenerator {
        fail: true,
        ..FakeGenerator::default()
    }));
    let reply = failing.send(&mut session, "Kalp masajı hızı nedir?").await.unwrap();
    assert_eq!(reply.text, FALLBACK_REPLY);
    assert_eq!(session.messages().len(), 6);
}
