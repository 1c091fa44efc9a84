//! Repository for the singleton `system_status` row.

use crate::DbPool;

/// Read/write access to the global system-active flag.
pub struct SystemStatusRepo;

impl SystemStatusRepo {
    /// Current flag value. Defaults to active when the row is missing
    /// (it is seeded by the migration, but a wiped table must not take
    /// the storefront down).
    pub async fn get(pool: &DbPool) -> Result<bool, sqlx::Error> {
        let row: Option<bool> =
            sqlx::query_scalar("SELECT is_active FROM system_status WHERE id = 1")
                .fetch_optional(pool)
                .await?;

        Ok(row.unwrap_or(true))
    }

    /// Write-through update of the flag, bumping `updated_at`.
    pub async fn set(pool: &DbPool, is_active: bool) -> Result<bool, sqlx::Error> {
        sqlx::query(
            "INSERT INTO system_status (id, is_active, updated_at)
             VALUES (1, ?, datetime('now'))
             ON CONFLICT(id) DO UPDATE SET
                is_active = excluded.is_active,
                updated_at = datetime('now')",
        )
        .bind(is_active)
        .execute(pool)
        .await?;

        Ok(is_active)
    }
}
