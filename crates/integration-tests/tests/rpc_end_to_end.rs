//! End-to-end: SDK client -> JSON-RPC server -> LogService -> SQLite

use std::sync::Arc;

use jsonrpsee::server::ServerHandle;
use qlog_api_rpc::{RpcServer, RpcServerConfig};
use qlog_core::application::{run_smoke_test, LogService, SmokeScenario};
use qlog_core::port::id_provider::{SequentialIdProvider, UuidProvider};
use qlog_core::port::time_provider::{FixedTimeProvider, SystemTimeProvider};
use qlog_infra_sqlite::{create_pool, run_migrations, SqliteQuestionLogRepository};
use qlog_sdk::{QuestionLogClient, SdkError};

struct TestDaemon {
    client: QuestionLogClient,
    // dropping the handle stops the server
    _handle: ServerHandle,
}

async fn start_daemon(service: LogService) -> TestDaemon {
    start_daemon_with(service, RpcServerConfig::default()).await
}

async fn start_daemon_with(service: LogService, config: RpcServerConfig) -> TestDaemon {
    let config = RpcServerConfig { port: 0, ..config };
    let (addr, handle) = RpcServer::new(config, Arc::new(service))
        .start()
        .await
        .unwrap();

    let client = QuestionLogClient::connect(format!("http://{}", addr))
        .await
        .unwrap();

    TestDaemon {
        client,
        _handle: handle,
    }
}

async fn sqlite_service(now_millis: i64) -> LogService {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();

    LogService::new(
        Arc::new(SqliteQuestionLogRepository::new(pool)),
        Arc::new(SequentialIdProvider::new("q")),
        Arc::new(FixedTimeProvider::new(now_millis)),
    )
}

#[tokio::test]
async fn test_smoke_over_rpc_persists_log() {
    let daemon = start_daemon(sqlite_service(1_700_000_000_000).await).await;

    let mut out = Vec::new();
    let outcome = run_smoke_test(&daemon.client, &SmokeScenario::default(), &mut out)
        .await
        .unwrap();

    let output = String::from_utf8(out).unwrap();
    assert_eq!(
        output,
        "Testing logging functionality...\n\
         Created log with ID: q-1\n\
         Updated model choices\n\
         Updated response timestamp\n\
         Updated errors\n\
         Test complete\n"
    );
    assert_eq!(outcome.updates_sent, 3);

    let log = daemon.client.get("q-1").await.unwrap();
    assert_eq!(log.model_choices, vec!["General"]);
    assert_eq!(log.response_timestamp, Some(1_700_000_000_000));
    assert_eq!(log.error_codes, vec!["TestError: This is a test"]);

    let stats = daemon.client.stats().await.unwrap();
    assert_eq!(stats.total_logs, 1);
    assert!(stats.logging_enabled);
}

#[tokio::test]
async fn test_extended_methods_over_rpc() {
    let daemon = start_daemon(sqlite_service(600_000).await).await;
    let client = &daemon.client;

    let created = client
        .create("conv", "frontend", Some(550_000), vec!["Code".to_string()])
        .await
        .unwrap();
    assert!(created.created);
    let id = created.question_id.unwrap();

    let updated = client.update_tokens(&id, Some(12), None).await.unwrap();
    assert!(updated.updated);
    client.update_tokens(&id, None, Some(340)).await.unwrap();

    let recent = client.query_recent("conv", Some(5)).await.unwrap();
    assert_eq!(recent.logs.len(), 1);

    client.update_user(&id, "backend").await.unwrap();
    let mine = client.query("conv", "backend", Some(10)).await.unwrap();
    assert_eq!(mine.logs.len(), 1);

    let log = &mine.logs[0];
    assert_eq!(log.model_choices, vec!["Code"]);
    assert_eq!(log.submit_timestamp, 550_000);
    assert_eq!(log.user_query_tokens, Some(12));
    assert_eq!(log.bot_response_tokens, Some(340));

    let explicit = client.update_response(&id, Some(560_000)).await.unwrap();
    assert!(explicit.updated);
    assert_eq!(
        client.get(&id).await.unwrap().response_timestamp,
        Some(560_000)
    );
}

#[tokio::test]
async fn test_error_codes_reach_the_client() {
    let daemon = start_daemon(sqlite_service(0).await).await;
    let client = &daemon.client;

    let err = client.get("ghost").await.unwrap_err();
    assert!(matches!(err, SdkError::Rpc { code: 4001, .. }));

    let err = client.create("", "user", None, vec![]).await.unwrap_err();
    assert!(matches!(err, SdkError::Rpc { code: 4000, .. }));

    let err = client.update_tokens("q-1", Some(-1), None).await.unwrap_err();
    assert!(matches!(err, SdkError::Rpc { code: 4000, .. }));

    let skipped = client
        .update_errors("ghost", vec!["Timeout".to_string()])
        .await
        .unwrap();
    assert!(!skipped.updated);
}

#[tokio::test]
async fn test_writes_are_throttled_over_rpc() {
    let config = RpcServerConfig {
        rate_limit_burst: 2,
        rate_limit_per_sec: 1,
        ..Default::default()
    };
    let daemon = start_daemon_with(sqlite_service(0).await, config).await;
    let client = &daemon.client;

    client.create("conv", "user", None, vec![]).await.unwrap();
    client.create("conv", "user", None, vec![]).await.unwrap();

    let err = client.create("conv", "user", None, vec![]).await.unwrap_err();
    assert!(matches!(err, SdkError::Rpc { code: 4003, .. }));

    // reads still work
    assert_eq!(client.stats().await.unwrap().total_logs, 2);
}

#[tokio::test]
async fn test_disabled_daemon_skips_updates() {
    let service = LogService::disabled(Arc::new(UuidProvider), Arc::new(SystemTimeProvider));
    let daemon = start_daemon(service).await;

    let mut out = Vec::new();
    let outcome = run_smoke_test(&daemon.client, &SmokeScenario::default(), &mut out)
        .await
        .unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Testing logging functionality...\nTest complete\n"
    );
    assert!(outcome.question_id.is_none());

    let stats = daemon.client.stats().await.unwrap();
    assert!(!stats.logging_enabled);
    assert_eq!(stats.total_logs, 0);
}
