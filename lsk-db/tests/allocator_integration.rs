//! DB-backed integration tests for the Postgres-backed Range Allocator
//! and Audit Log Store, run end to end through
//! `lsk_engine::ResolutionCoordinator`.
//!
//! Requires a real Postgres instance with the `lsk_audit_log` table
//! (see `lsk_db::audit_store` for the DDL) and `DB_TESTS=1`; skipped
//! otherwise, per `support::db_test_pool`.

mod support;

use lsk_db::{TxAuditLogStore, TxRangeAllocator};
use lsk_engine::{ResolutionCoordinator, ResolveRequest};

fn req(module: &str, xml: &str) -> ResolveRequest {
    ResolveRequest {
        module_name: module.to_string(),
        input_xml: xml.to_string(),
        dev_email: "dev@example.com".to_string(),
    }
}

#[tokio::test]
async fn allocations_continue_from_committed_high_water_mark() {
    let Some(pool) = support::db_test_pool().await else {
        return;
    };
    support::reset_range_key(&pool, "T", "C", "IntegrationA").await;

    let coordinator = ResolutionCoordinator::new();

    let mut conn = pool.get().await.unwrap();
    let tx = conn.transaction().await.unwrap();
    let out = coordinator
        .resolve(
            &TxRangeAllocator::new(&tx),
            &TxAuditLogStore::new(&tx),
            &req("IntegrationA", r#"<A id="T:C:x"/>"#),
        )
        .await
        .unwrap();
    tx.commit().await.unwrap();
    assert_eq!(out, r#"<A id="T:C:IntegrationA:1"/>"#);

    let mut conn = pool.get().await.unwrap();
    let tx = conn.transaction().await.unwrap();
    let out = coordinator
        .resolve(
            &TxRangeAllocator::new(&tx),
            &TxAuditLogStore::new(&tx),
            &req("IntegrationA", r#"<A id="T:C:y"/>"#),
        )
        .await
        .unwrap();
    tx.commit().await.unwrap();
    assert_eq!(out, r#"<A id="T:C:IntegrationA:2"/>"#);
}

#[tokio::test]
async fn rolled_back_resolution_does_not_advance_the_high_water_mark() {
    let Some(pool) = support::db_test_pool().await else {
        return;
    };
    support::reset_range_key(&pool, "T", "C", "IntegrationB").await;

    let coordinator = ResolutionCoordinator::new();

    let mut conn = pool.get().await.unwrap();
    let tx = conn.transaction().await.unwrap();
    coordinator
        .resolve(
            &TxRangeAllocator::new(&tx),
            &TxAuditLogStore::new(&tx),
            &req("IntegrationB", r#"<A id="T:C:x"/>"#),
        )
        .await
        .unwrap();
    // Cancellation before the Phase E commit: roll back explicitly
    // instead of committing.
    tx.rollback().await.unwrap();

    let mut conn = pool.get().await.unwrap();
    let tx = conn.transaction().await.unwrap();
    let out = coordinator
        .resolve(
            &TxRangeAllocator::new(&tx),
            &TxAuditLogStore::new(&tx),
            &req("IntegrationB", r#"<A id="T:C:y"/>"#),
        )
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(out, r#"<A id="T:C:IntegrationB:1"/>"#);
}

#[tokio::test]
async fn unresolved_reference_rolls_back_and_writes_no_audit_row() {
    let Some(pool) = support::db_test_pool().await else {
        return;
    };
    support::reset_range_key(&pool, "T", "C", "IntegrationC").await;

    let coordinator = ResolutionCoordinator::new();

    let mut conn = pool.get().await.unwrap();
    let tx = conn.transaction().await.unwrap();
    let err = coordinator
        .resolve(
            &TxRangeAllocator::new(&tx),
            &TxAuditLogStore::new(&tx),
            &req("IntegrationC", r#"<Q r="REF:{T:C:missing}"/>"#),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, lsk_core::ResolutionError::UnresolvedReference(_)));
    drop(tx);

    let conn = pool.get().await.unwrap();
    let row = conn
        .query_one(
            "SELECT COUNT(*) FROM lsk_audit_log WHERE table_name = $1 AND column_name = $2 AND module_name = $3",
            &[&"T", &"C", &"IntegrationC"],
        )
        .await
        .unwrap();
    let count: i64 = row.get(0);
    assert_eq!(count, 0);
}
