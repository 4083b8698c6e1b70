//! Offline unit tests for lovetrip-db pool configuration and row types.
//! These tests do not require a live database connection.

use chrono::Utc;
use lovetrip_core::{AppConfig, Environment};
use lovetrip_db::{BatchReport, PoolConfig, RetryPolicy, SyncRunRow};
use uuid::Uuid;

fn test_app_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        log_level: "info".to_string(),
        tour_api_base_url: "https://apis.data.go.kr/B551011/KorService1".to_string(),
        tour_api_key: None,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        crawler_request_timeout_secs: 30,
        crawler_throttle_delay_ms: 1000,
        crawler_max_pages: 200,
        crawler_page_size: 100,
        crawler_batch_size: 50,
        crawler_max_attempts: 5,
        crawler_retry_backoff_base_ms: 2000,
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&test_app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn retry_policy_defaults_match_documented_budget() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.max_attempts, 5);
    assert_eq!(policy.backoff_base_ms, 2_000);
}

/// Compile-time smoke test: confirm that [`SyncRunRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn sync_run_row_has_expected_fields() {
    let row = SyncRunRow {
        id: 1_i64,
        public_id: Uuid::new_v4(),
        trigger_source: "cli".to_string(),
        status: "running".to_string(),
        started_at: Utc::now(),
        completed_at: None,
        items_inserted: 0_i32,
        items_updated: 0_i32,
        items_errors: 0_i32,
        duration_seconds: None,
        error_message: None,
        logs: vec![],
        created_at: Utc::now(),
    };

    assert_eq!(row.id, 1);
    assert_eq!(row.trigger_source, "cli");
    assert_eq!(row.status, "running");
    assert!(row.completed_at.is_none());
    assert_eq!(row.items_inserted, 0);
    assert!(row.logs.is_empty());
}

#[test]
fn batch_report_defaults_to_zero() {
    let report = BatchReport::default();
    assert_eq!(report.inserted, 0);
    assert_eq!(report.updated, 0);
    assert_eq!(report.errors, 0);
}
