//! Property 8 (`spec.md` §8): N parallel requests each claiming K
//! placeholders of the same RangeKey must, once all commit, union to
//! `[1, N*K]` with no gaps and no overlaps.
//!
//! DB-backed (advisory-lock serialization only exists against a real
//! Postgres instance); skipped unless `DB_TESTS=1`.

mod support;

use std::collections::HashSet;

use lsk_db::{TxAuditLogStore, TxRangeAllocator};
use lsk_engine::{ResolutionCoordinator, ResolveRequest};

const MODULE: &str = "StressMod";
const REQUESTS: usize = 8;
const PLACEHOLDERS_PER_REQUEST: usize = 5;

#[tokio::test]
async fn concurrent_requests_for_one_range_key_partition_without_gaps_or_overlap() {
    let Some(pool) = support::db_test_pool().await else {
        return;
    };
    support::reset_range_key(&pool, "T", "C", MODULE).await;

    let mut handles = Vec::new();
    for req_idx in 0..REQUESTS {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            let xml: String = (0..PLACEHOLDERS_PER_REQUEST)
                .map(|i| format!(r#"<Row k="T:C:r{req_idx}_{i}"/>"#))
                .collect();

            let mut conn = pool.get().await.unwrap();
            let tx = conn.transaction().await.unwrap();
            let coordinator = ResolutionCoordinator::new();
            let out = coordinator
                .resolve(
                    &TxRangeAllocator::new(&tx),
                    &TxAuditLogStore::new(&tx),
                    &ResolveRequest {
                        module_name: MODULE.to_string(),
                        input_xml: xml,
                        dev_email: "dev@example.com".to_string(),
                    },
                )
                .await
                .unwrap();
            tx.commit().await.unwrap();
            out
        }));
    }

    let mut assigned_values: HashSet<i64> = HashSet::new();
    for handle in handles {
        let out = handle.await.unwrap();
        for cap in out.split('"').filter(|s| s.starts_with("T:C:")) {
            let value: i64 = cap.rsplit(':').next().unwrap().parse().unwrap();
            // Each of these per-request XMLs has distinct placeholders,
            // so every resolved attribute value is a freshly assigned
            // one: no duplicate insert expected within a single task's
            // output, but across tasks duplicates would indicate an
            // overlap bug.
            assert!(assigned_values.insert(value), "value {value} assigned twice across requests");
        }
    }

    assert_eq!(assigned_values.len(), REQUESTS * PLACEHOLDERS_PER_REQUEST);
    let expected: HashSet<i64> = (1..=(REQUESTS * PLACEHOLDERS_PER_REQUEST) as i64).collect();
    assert_eq!(assigned_values, expected, "union of intervals must be [1, N*K] with no gaps");
}
