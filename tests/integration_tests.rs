mod common;

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal_macros::dec;

use common::{
    make_account, make_statement, make_synced_account, statement_days_ago, statement_days_ahead,
    statement_with_refs, ScriptedSource,
};
use kontosync::models::Balance;
use kontosync::sinks::{MemoryDocumentSink, MemoryRelationalSink};
use kontosync::SyncEngine;

fn engine_over(
    source: ScriptedSource,
) -> SyncEngine<ScriptedSource, MemoryRelationalSink, MemoryDocumentSink> {
    SyncEngine::new(source, MemoryRelationalSink::new(), MemoryDocumentSink::new())
}

#[tokio::test]
async fn test_single_account_end_to_end() {
    let account = make_account("100", "10010010", "user1");
    let source = ScriptedSource::new()
        .with_account(&account)
        .with_statements(
            &account,
            vec![
                statement_with_refs(5, dec!(-42.00), "A1", "Groceries"),
                statement_with_refs(3, dec!(1200.00), "A2", "Salary"),
            ],
        )
        .with_balance(
            &account,
            Balance {
                amount: dec!(1158.00),
                currency: Some("EUR".to_string()),
                date: None,
            },
        );
    let engine = engine_over(source);

    let report = engine.run(std::slice::from_ref(&account)).await;

    assert_eq!(report.fetched(&account), 2);
    assert_eq!(report.succeeded(&account), 2);
    assert_eq!(report.document_stored(&account), 2);
    assert_eq!(report.balance(&account).unwrap().amount, dec!(1158.00));
    assert!(report.failures().is_empty());
    assert_eq!(engine.relational().len(), 2);
    assert_eq!(engine.documents().len(), 2);
    assert!(engine.documents().is_closed());
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    // The same statement set fetched twice with overlapping windows: the
    // second run finds every record already present and stores nothing.
    let account = make_account("100", "10010010", "user1");
    let source = ScriptedSource::new().with_account(&account).with_statements(
        &account,
        vec![
            statement_with_refs(5, dec!(-42.00), "A1", "Groceries"),
            statement_with_refs(3, dec!(1200.00), "A2", "Salary"),
        ],
    );
    let engine = engine_over(source);

    let first = engine.run(std::slice::from_ref(&account)).await;
    let rows_after_first = engine.relational().rows();

    let second = engine.run(std::slice::from_ref(&account)).await;

    assert_eq!(first.succeeded(&account), 2);
    assert_eq!(second.fetched(&account), 2);
    assert_eq!(second.succeeded(&account), 0);
    assert_eq!(second.document_stored(&account), 0);
    assert!(second.failures().is_empty());
    assert_eq!(engine.relational().rows(), rows_after_first);
}

#[tokio::test]
async fn test_counter_accuracy_with_future_and_duplicate_records() {
    // 5 fetched, 1 future-dated, 1 duplicate among the remaining 4:
    // fetched = 5, relational successes = 3.
    let account = make_account("100", "10010010", "user1");
    let source = ScriptedSource::new().with_account(&account).with_statements(
        &account,
        vec![
            statement_with_refs(5, dec!(-10.00), "A1", "One"),
            statement_with_refs(4, dec!(-20.00), "A2", "Two"),
            statement_with_refs(4, dec!(-20.00), "A2", "Two"), // same natural key
            statement_with_refs(2, dec!(-30.00), "A3", "Three"),
            statement_days_ahead(3, dec!(-40.00)),
        ],
    );
    let engine = engine_over(source);

    let report = engine.run(std::slice::from_ref(&account)).await;

    assert_eq!(report.fetched(&account), 5);
    assert_eq!(report.succeeded(&account), 3);
    assert_eq!(report.document_stored(&account), 3);
    assert!(report.failures().is_empty());
    assert_eq!(engine.relational().len(), 3);
}

#[tokio::test]
async fn test_sink_independence_on_relational_failure() {
    // A non-duplicate relational failure lands the record in the error
    // collection exactly once and never skips the document write.
    let account = make_account("100", "10010010", "user1");
    let source = ScriptedSource::new()
        .with_account(&account)
        .with_statements(&account, vec![statement_with_refs(2, dec!(-5.00), "A1", "One")]);
    let engine = engine_over(source);
    engine.relational().poison();

    let report = engine.run(std::slice::from_ref(&account)).await;

    assert_eq!(report.succeeded(&account), 0);
    assert_eq!(report.document_stored(&account), 1);
    assert_eq!(report.failures().len(), 1);
    assert_eq!(report.failures()[0].title, "A1/One");
    assert!(engine.relational().is_empty());
    assert_eq!(engine.documents().len(), 1);
}

#[tokio::test]
async fn test_document_failure_does_not_touch_error_collection() {
    let account = make_account("100", "10010010", "user1");
    let source = ScriptedSource::new()
        .with_account(&account)
        .with_statements(&account, vec![statement_days_ago(2, dec!(-5.00))]);
    let engine = engine_over(source);
    engine.documents().poison();

    let report = engine.run(std::slice::from_ref(&account)).await;

    assert_eq!(report.succeeded(&account), 1);
    assert_eq!(report.document_stored(&account), 0);
    // Document failures are warnings only, never collected
    assert!(report.failures().is_empty());
    assert_eq!(engine.relational().len(), 1);
}

#[tokio::test]
async fn test_fetch_failure_aborts_only_that_account() {
    let broken = make_account("100", "10010010", "user1");
    let healthy = make_account("200", "20020020", "user1");
    let source = ScriptedSource::new()
        .with_account(&broken)
        .with_account(&healthy)
        .failing_statements(&broken)
        .with_statements(&healthy, vec![statement_days_ago(2, dec!(9.99))]);
    let engine = engine_over(source);

    let report = engine.run(&[broken.clone(), healthy.clone()]).await;

    assert_eq!(report.fetched(&broken), 0);
    assert_eq!(report.fetched(&healthy), 1);
    assert_eq!(report.succeeded(&healthy), 1);
    assert!(engine.documents().is_closed());
}

#[tokio::test]
async fn test_balance_failure_aborts_only_that_account() {
    let broken = make_account("100", "10010010", "user1");
    let healthy = make_account("200", "20020020", "user1");
    let source = ScriptedSource::new()
        .with_account(&broken)
        .with_account(&healthy)
        .failing_balance(&broken)
        .with_statements(&broken, vec![statement_days_ago(2, dec!(1.00))])
        .with_statements(&healthy, vec![statement_days_ago(2, dec!(2.00))]);
    let engine = engine_over(source);

    let report = engine.run(&[broken.clone(), healthy.clone()]).await;

    // The balance request precedes the statement fetch
    assert_eq!(report.fetched(&broken), 0);
    assert_eq!(report.succeeded(&broken), 0);
    assert_eq!(report.succeeded(&healthy), 1);
}

#[tokio::test]
async fn test_window_for_synced_account_overlaps_one_day() {
    let last = Utc::now() - Duration::days(7);
    let account = make_synced_account("100", "10010010", "user1", last);
    let source = ScriptedSource::new().with_account(&account);
    let engine = engine_over(source);

    engine.run(std::slice::from_ref(&account)).await;

    let windows = engine.source().requested_windows();
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].start, last - Duration::days(1));
    assert!(windows[0].end <= Utc::now());
}

#[tokio::test]
async fn test_window_for_new_account_starts_at_epoch_floor() {
    let account = make_account("100", "10010010", "user1");
    let source = ScriptedSource::new().with_account(&account);
    let engine = engine_over(source);

    engine.run(std::slice::from_ref(&account)).await;

    let windows = engine.source().requested_windows();
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].start, kontosync::window::epoch_floor());
}

#[tokio::test]
async fn test_entry_date_correction_applies_before_persistence() {
    // Entry date 90 days past the posting date is an upstream artifact; the
    // stored record carries the posting date in both columns.
    let posting = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let entry = NaiveDate::from_ymd_opt(2023, 4, 1).unwrap();
    let account = make_account("100", "10010010", "user1");
    let source = ScriptedSource::new()
        .with_account(&account)
        .with_statements(&account, vec![make_statement(posting, entry, dec!(3.00))]);
    let engine = engine_over(source);

    let report = engine.run(std::slice::from_ref(&account)).await;

    assert_eq!(report.succeeded(&account), 1);
    let rows = engine.relational().rows();
    assert_eq!(rows[0].date, posting);
    assert_eq!(rows[0].entry_date, posting);
    assert_eq!(engine.documents().documents()[0].entry_date, "2023-01-01");
}

#[tokio::test]
async fn test_correction_rescues_spuriously_future_entry_date() {
    // A bogus far-future entry date would park the record forever; after
    // correction it passes the future filter in the same run.
    let posting = (Utc::now() - Duration::days(3)).date_naive();
    let entry = posting + Duration::days(200);
    let account = make_account("100", "10010010", "user1");
    let source = ScriptedSource::new()
        .with_account(&account)
        .with_statements(&account, vec![make_statement(posting, entry, dec!(3.00))]);
    let engine = engine_over(source);

    let report = engine.run(std::slice::from_ref(&account)).await;

    assert_eq!(report.succeeded(&account), 1);
}

#[tokio::test]
async fn test_same_account_number_at_two_banks_does_not_collide() {
    let first = make_account("100", "10010010", "user1");
    let second = make_account("100", "20020020", "user2");
    let source = ScriptedSource::new()
        .with_account(&first)
        .with_account(&second)
        .with_statements(&first, vec![statement_with_refs(2, dec!(-1.00), "X", "P")])
        .with_statements(&second, vec![statement_with_refs(2, dec!(-1.00), "X", "P")]);
    let engine = engine_over(source);

    let report = engine.run(&[first.clone(), second.clone()]).await;

    // The BLZ is part of the natural key and of the counter key
    assert_eq!(report.succeeded(&first), 1);
    assert_eq!(report.succeeded(&second), 1);
    assert_eq!(engine.relational().len(), 2);
}

#[tokio::test]
async fn test_run_without_accounts_still_closes_document_store() {
    let engine = engine_over(ScriptedSource::new());

    let report = engine.run(&[]).await;

    assert!(report.failures().is_empty());
    assert!(engine.documents().is_closed());
}
