//! DB-backed test gating, grounded on
//! `caliber-api::services::lock_service`'s `db_test_context` pattern:
//! skip (not fail) unless `DB_TESTS=1` and a database is actually
//! reachable, so these tests are opt-in in CI and local dev alike.

use deadpool_postgres::{Config, ManagerConfig, Pool, RecyclingMethod, Runtime};
use tokio_postgres::NoTls;

/// Reachable only when `DB_TESTS=1`. Connection info comes from
/// `LSK_TEST_DATABASE_URL` (a full `postgres://` DSN) falling back to
/// the same `LSK_DB_*` variables `lsk_db::DbConfig::from_env` reads.
pub async fn db_test_pool() -> Option<Pool> {
    if std::env::var("DB_TESTS").ok().as_deref() != Some("1") {
        return None;
    }

    let pool = if let Ok(url) = std::env::var("LSK_TEST_DATABASE_URL") {
        let mut cfg = Config::new();
        cfg.url = Some(url);
        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        cfg.create_pool(Some(Runtime::Tokio1), NoTls).ok()?
    } else {
        lsk_db::DbConfig::from_env().create_pool().ok()?
    };

    // Confirm the schema this test suite needs actually exists before
    // handing back a pool tests will otherwise fail against confusingly.
    let conn = pool.get().await.ok()?;
    conn.query_one("SELECT 1 FROM lsk_audit_log LIMIT 0", &[]).await.ok()?;

    Some(pool)
}

/// Delete every row for one `(table, column, module)` triple so a test
/// run starts from a known high-water mark. Only ever used by tests;
/// the engine itself never deletes audit rows.
pub async fn reset_range_key(pool: &Pool, table: &str, column: &str, module: &str) {
    let conn = pool.get().await.expect("pool checkout");
    conn.execute(
        "DELETE FROM lsk_audit_log WHERE table_name = $1 AND column_name = $2 AND module_name = $3",
        &[&table, &column, &module],
    )
    .await
    .expect("cleanup delete");
}
