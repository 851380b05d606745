use aid_core::model::{AnswerOutcome, QuestionId, Theme, Topic, UserState};
use storage::repository::{KeyValueStore, Storage};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_kv_overwrites_and_removes() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get("missing").await.unwrap(), None);

    repo.set("k", "first").await.unwrap();
    repo.set("k", "second").await.unwrap();
    assert_eq!(repo.get("k").await.unwrap().as_deref(), Some("second"));

    repo.remove("k").await.unwrap();
    assert_eq!(repo.get("k").await.unwrap(), None);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");
}

#[tokio::test]
async fn sqlite_storage_round_trips_user_state_and_credential() {
    let storage = Storage::sqlite("sqlite:file:memdb_state?mode=memory&cache=shared")
        .await
        .expect("storage");

    let mut state = UserState::new();
    state.record_session(&[
        AnswerOutcome {
            question_id: QuestionId::new("burn_1"),
            topic: Topic::Burns,
            correct: false,
        },
        AnswerOutcome {
            question_id: QuestionId::new("burn_2"),
            topic: Topic::Burns,
            correct: true,
        },
    ]);
    state.set_theme(Theme::Dark);

    storage.user_state.save_user_state(&state).await.unwrap();
    storage.credentials.save_api_key("abc123").await.unwrap();

    let loaded = storage.user_state.load_user_state().await.unwrap().unwrap();
    assert_eq!(loaded, state);
    assert_eq!(loaded.topic_stats().get(Topic::Burns).total(), 2);
    assert_eq!(
        storage.credentials.load_api_key().await.unwrap().as_deref(),
        Some("abc123")
    );
}
