//! Embedded schema migrations for `SQLite`.
//!
//! Each migration is compiled into the binary and applied at most once. The
//! applied set is tracked in `_tenantry_migrations`.

use sqlx::{Executor, SqlitePool};

const CORE_MIGRATIONS: &[(&str, &str)] = &[
    (
        "20250301000001_create_organizations_table",
        include_str!("../../migrations_sqlite/core/20250301000001_create_organizations_table.sql"),
    ),
    (
        "20250301000002_create_users_table",
        include_str!("../../migrations_sqlite/core/20250301000002_create_users_table.sql"),
    ),
    (
        "20250301000003_create_organization_members_table",
        include_str!(
            "../../migrations_sqlite/core/20250301000003_create_organization_members_table.sql"
        ),
    ),
    (
        "20250301000004_create_plans_table",
        include_str!("../../migrations_sqlite/core/20250301000004_create_plans_table.sql"),
    ),
    (
        "20250301000005_create_subscriptions_table",
        include_str!("../../migrations_sqlite/core/20250301000005_create_subscriptions_table.sql"),
    ),
    (
        "20250301000006_create_audit_logs_table",
        include_str!("../../migrations_sqlite/core/20250301000006_create_audit_logs_table.sql"),
    ),
];

/// Applies every pending migration in order.
pub async fn run(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    pool.execute(
        r"
        CREATE TABLE IF NOT EXISTS _tenantry_migrations (
            name TEXT PRIMARY KEY,
            applied_at INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER) * 1000)
        )
        ",
    )
    .await?;

    for (name, sql) in CORE_MIGRATIONS {
        let applied: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _tenantry_migrations WHERE name = ?)")
                .bind(*name)
                .fetch_one(pool)
                .await?;

        if applied {
            continue;
        }

        // One statement per execute. Migrations must not put `;` inside literals.
        let mut tx = pool.begin().await?;
        for statement in sql.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                (&mut *tx).execute(trimmed).await?;
            }
        }
        sqlx::query("INSERT INTO _tenantry_migrations (name) VALUES (?)")
            .bind(*name)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        log::info!(target: "tenantry_auth", "msg=\"migration applied\", name=\"{name}\"");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_run_is_idempotent() {
        let pool = pool().await;
        run(&pool).await.unwrap();
        run(&pool).await.unwrap();

        let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _tenantry_migrations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(applied, CORE_MIGRATIONS.len() as i64);
    }

    #[tokio::test]
    async fn test_plans_are_seeded() {
        let pool = pool().await;
        run(&pool).await.unwrap();

        let slugs: Vec<String> = sqlx::query_scalar("SELECT slug FROM plans ORDER BY price")
            .fetch_all(&pool)
            .await
            .unwrap();
        assert_eq!(slugs, vec!["free", "pro", "enterprise"]);
    }

    #[tokio::test]
    async fn test_role_check_constraint() {
        let pool = pool().await;
        run(&pool).await.unwrap();

        sqlx::query("INSERT INTO organizations (id, name, slug, created_at, updated_at) VALUES ('o1', 'Acme', 'acme', 0, 0)")
            .execute(&pool)
            .await
            .unwrap();
        let result = sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, system_role, organization_id, created_at, updated_at) VALUES ('u1', 'Jane', 'jane@x.com', 'h', 'root', 'o1', 0, 0)",
        )
        .execute(&pool)
        .await;
        assert!(result.is_err());
    }
}
