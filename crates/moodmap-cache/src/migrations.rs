//! # Cache Migrations
//!
//! SQL files under `migrations/sqlite/` at the workspace root, embedded at
//! compile time.
//!
//! ## Adding New Migrations
//!
//! 1. Create `migrations/sqlite/NNN_description.sql` with the next number
//! 2. Use `IF NOT EXISTS` where possible
//! 3. **NEVER** edit an applied migration; add a new one

use sqlx::SqlitePool;
use tracing::info;

use crate::error::CacheResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending migrations in filename order.
pub async fn run_migrations(pool: &SqlitePool) -> CacheResult<()> {
    info!("Checking for pending cache migrations");
    MIGRATOR.run(pool).await?;
    info!("Cache migrations applied");
    Ok(())
}
