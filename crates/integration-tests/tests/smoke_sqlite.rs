//! Smoke driver against the SQLite-backed log service
//!
//! Covers the full in-process path: driver -> LogService -> SQLite.

use std::sync::Arc;

use qlog_core::application::{run_smoke_test, CreateQuestionLog, LogService, SmokeScenario};
use qlog_core::domain::QuestionId;
use qlog_core::port::id_provider::{SequentialIdProvider, UuidProvider};
use qlog_core::port::time_provider::{FixedTimeProvider, SystemTimeProvider};
use qlog_infra_sqlite::{create_pool, run_migrations, SqliteQuestionLogRepository};

async fn sqlite_service(url: &str, time: Arc<FixedTimeProvider>) -> LogService {
    let pool = create_pool(url).await.unwrap();
    run_migrations(&pool).await.unwrap();

    LogService::new(
        Arc::new(SqliteQuestionLogRepository::new(pool)),
        Arc::new(SequentialIdProvider::new("q")),
        time,
    )
}

fn output_lines(out: Vec<u8>) -> Vec<String> {
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_smoke_run_persists_every_update() {
    let time = Arc::new(FixedTimeProvider::new(1_700_000_000_000));
    let service = sqlite_service("sqlite::memory:", time).await;

    let mut out = Vec::new();
    let outcome = run_smoke_test(&service, &SmokeScenario::default(), &mut out)
        .await
        .unwrap();

    assert_eq!(
        output_lines(out),
        vec![
            "Testing logging functionality...",
            "Created log with ID: q-1",
            "Updated model choices",
            "Updated response timestamp",
            "Updated errors",
            "Test complete",
        ]
    );
    assert_eq!(outcome.updates_sent, 3);

    let log = service.get(&QuestionId::new("q-1")).await.unwrap().unwrap();
    assert_eq!(log.conversation_id, "test-conv-123");
    assert_eq!(log.user_id, "test-user-456");
    assert_eq!(log.model_choices, vec!["General"]);
    assert_eq!(log.response_timestamp, Some(1_700_000_000_000));
    assert_eq!(log.error_codes, vec!["TestError: This is a test"]);
}

#[tokio::test]
async fn test_repeated_runs_create_separate_logs() {
    let time = Arc::new(FixedTimeProvider::new(1_000_000));
    let service = sqlite_service("sqlite::memory:", time.clone()).await;
    let scenario = SmokeScenario::default();

    for _ in 0..3 {
        let mut out = Vec::new();
        run_smoke_test(&service, &scenario, &mut out).await.unwrap();
        time.advance(1_000);
    }

    assert_eq!(service.count().await.unwrap(), 3);

    let logs = service
        .query_logs("test-conv-123", "test-user-456", None)
        .await
        .unwrap();
    let ids: Vec<&str> = logs.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["q-3", "q-2", "q-1"]);

    // each run appends to its own log only
    for log in logs {
        assert_eq!(log.error_codes.len(), 1);
    }
}

#[tokio::test]
async fn test_disabled_service_prints_only_banners() {
    let service = LogService::disabled(Arc::new(UuidProvider), Arc::new(SystemTimeProvider));

    let mut out = Vec::new();
    let outcome = run_smoke_test(&service, &SmokeScenario::default(), &mut out)
        .await
        .unwrap();

    assert_eq!(
        output_lines(out),
        vec!["Testing logging functionality...", "Test complete"]
    );
    assert_eq!(outcome.question_id, None);
    assert_eq!(outcome.updates_sent, 0);
}

#[tokio::test]
async fn test_backend_reattributes_frontend_log() {
    let time = Arc::new(FixedTimeProvider::new(10 * 60 * 1000));
    let service = sqlite_service("sqlite::memory:", time.clone()).await;

    // an old log outside the default 5 minute window
    service
        .create(CreateQuestionLog::new("conv", "frontend-user").submitted_at(0))
        .await
        .unwrap();
    let recent = service
        .create(CreateQuestionLog::new("conv", "frontend-user"))
        .await
        .unwrap()
        .unwrap();

    let found = service
        .query_recent_logs_by_conversation("conv", None)
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, recent);

    assert!(service
        .update_user_id(&recent, "backend-user".to_string())
        .await
        .unwrap());

    let mine = service
        .query_logs("conv", "backend-user", None)
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, recent);
}

#[tokio::test]
async fn test_logs_survive_reopening_the_database() {
    let path = std::env::temp_dir().join(format!("qlog_test_{}.db", uuid::Uuid::new_v4()));
    let url = path.to_string_lossy().into_owned();

    {
        let time = Arc::new(FixedTimeProvider::new(42));
        let service = sqlite_service(&url, time).await;
        let mut out = Vec::new();
        run_smoke_test(&service, &SmokeScenario::default(), &mut out)
            .await
            .unwrap();
    }

    let time = Arc::new(FixedTimeProvider::new(43));
    let service = sqlite_service(&url, time).await;
    let log = service.get(&QuestionId::new("q-1")).await.unwrap().unwrap();
    assert_eq!(log.model_choices, vec!["General"]);
    assert_eq!(log.response_timestamp, Some(42));

    let _ = std::fs::remove_file(&path);
}
