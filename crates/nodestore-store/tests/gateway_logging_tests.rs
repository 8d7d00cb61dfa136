#![allow(clippy::unwrap_used, clippy::expect_used)]
// Lifecycle logging emitted by the gateway and the migration runner

use nodestore_core::logging_facility::test_capture::init_test_capture;
use nodestore_core::{Contact, Post, Record, StoreError};
use nodestore_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_ERR_CODE, FIELD_MIGRATION_ID, FIELD_RECORD_ID,
    FIELD_ROW_COUNT,
};
use nodestore_store::{run_migrations, Migrations, SqliteDriver, StoreGateway};

fn setup_gateway() -> StoreGateway {
    let driver = SqliteDriver::open_in_memory().unwrap();
    let migrations = Migrations::new()
        .register::<Contact>()
        .unwrap()
        .register::<Post>()
        .unwrap();
    run_migrations(&migrations, &driver).unwrap();
    StoreGateway::new(driver)
}

#[test]
fn test_save_emits_start_and_end() {
    let capture = init_test_capture();
    let gateway = setup_gateway();

    gateway.save(Contact::new("Ada", "ada@example.org")).unwrap();

    capture.assert_event_exists("save", EVENT_START);
    capture.assert_event_exists("save", EVENT_END);
    let ends = capture.count_events(|e| {
        e.op.as_deref() == Some("save")
            && e.event.as_deref() == Some(EVENT_END)
            && e.entity.as_deref() == Some(Contact::ENTITY)
    });
    assert!(ends >= 1);
}

#[test]
fn test_save_end_carries_record_id() {
    let capture = init_test_capture();
    let gateway = setup_gateway();
    let post = Post::new("tagged");
    let token = post.id().map(ToString::to_string).unwrap();

    gateway.save(post).unwrap();

    let found = capture.count_events(|e| {
        e.op.as_deref() == Some("save")
            && e.event.as_deref() == Some(EVENT_END)
            && e.field(FIELD_RECORD_ID) == Some(token.as_str())
    });
    assert_eq!(found, 1);
}

#[test]
fn test_fetch_all_reports_row_count() {
    let capture = init_test_capture();
    let gateway = setup_gateway();
    gateway.save(Post::new("one")).unwrap();
    gateway.save(Post::new("two")).unwrap();

    gateway.fetch_all::<Post>().unwrap();

    let found = capture.count_events(|e| {
        e.op.as_deref() == Some("fetch_all")
            && e.event.as_deref() == Some(EVENT_END)
            && e.entity.as_deref() == Some(Post::ENTITY)
            && e.field(FIELD_ROW_COUNT) == Some("2")
    });
    assert!(found >= 1, "Expected a fetch_all end event with row_count=2");
}

#[test]
fn test_failed_raw_query_emits_error_event() {
    let capture = init_test_capture();
    let gateway = setup_gateway();
    let result = gateway.raw_query("SELECT * FROM never_migrated");
    assert!(matches!(result, Err(StoreError::Driver(_))));

    let errors = capture.count_events(|e| {
        e.op.as_deref() == Some("raw_query")
            && e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.field(FIELD_ERR_CODE) == Some("ERR_PERSISTENCE")
    });
    assert!(errors >= 1);
}

#[test]
fn test_detached_save_logs_connection_error() {
    let capture = init_test_capture();
    let gateway = StoreGateway::detached();

    let _ = gateway.save(Contact::new("Nobody", "nobody@example.org"));

    let errors = capture.count_events(|e| {
        e.op.as_deref() == Some("save")
            && e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.field(FIELD_ERR_CODE) == Some("ERR_CONNECTION")
    });
    assert!(errors >= 1);
}

#[test]
fn test_run_migrations_lifecycle() {
    let capture = init_test_capture();
    let _gateway = setup_gateway();

    capture.assert_event_exists("run_migrations", EVENT_START);
    capture.assert_event_exists("run_migrations", EVENT_END);
    let applied = capture.count_events(|e| e.field(FIELD_MIGRATION_ID) == Some("create_posts"));
    assert!(applied >= 1, "Expected a per-migration event for create_posts");
}
