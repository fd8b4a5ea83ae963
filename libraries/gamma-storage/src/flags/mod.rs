//! Persistent UI flags
//!
//! Flags are stored as plain text key/value pairs. Booleans are written as
//! `"true"`/`"false"`.
//!
//! # Example
//!
//! ```rust,no_run
//! use gamma_core::GroupId;
//! use gamma_storage::flags;
//! # async fn example(pool: &sqlx::SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
//! let group = GroupId::new("tinnitus-relief");
//! flags::set_group_expanded(pool, &group, false).await?;
//! assert!(!flags::group_expanded(pool, &group).await?);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use gamma_core::{FlagStore, GroupId};
use sqlx::{Row, SqlitePool};

use crate::error::{Result, StorageError};

// Flag key constants
/// Set once the user has finished onboarding
pub const FLAG_ONBOARDING_SEEN: &str = "onboarding.seen";

/// Key of the expanded/collapsed state of a catalog group
pub fn group_expanded_key(group_id: &GroupId) -> String {
    format!("groups.{}.expanded", group_id)
}

/// Get a flag value, `None` if never set
///
/// # Errors
///
/// Returns an error if the database query fails
pub async fn get_flag(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let row = sqlx::query("SELECT value FROM flags WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| row.get::<String, _>("value")))
}

/// Set a flag value, replacing any previous one
///
/// # Errors
///
/// Returns an error if the database query fails
pub async fn set_flag(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO flags (key, value, updated_at)
         VALUES (?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )
    .bind(key)
    .bind(value)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Remove a flag
///
/// # Errors
///
/// Returns an error if the database query fails
pub async fn clear_flag(pool: &SqlitePool, key: &str) -> Result<()> {
    sqlx::query("DELETE FROM flags WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;
    Ok(())
}

async fn get_bool(pool: &SqlitePool, key: &str, default: bool) -> Result<bool> {
    match get_flag(pool, key).await?.as_deref() {
        None => Ok(default),
        Some("true") => Ok(true),
        Some("false") => Ok(false),
        Some(other) => Err(StorageError::invalid_value(key, other)),
    }
}

async fn set_bool(pool: &SqlitePool, key: &str, value: bool) -> Result<()> {
    set_flag(pool, key, if value { "true" } else { "false" }).await
}

/// Whether onboarding has been completed (false on first launch)
pub async fn onboarding_seen(pool: &SqlitePool) -> Result<bool> {
    get_bool(pool, FLAG_ONBOARDING_SEEN, false).await
}

/// Record whether onboarding has been completed
pub async fn set_onboarding_seen(pool: &SqlitePool, seen: bool) -> Result<()> {
    set_bool(pool, FLAG_ONBOARDING_SEEN, seen).await
}

/// Whether a catalog group is expanded (groups start expanded)
pub async fn group_expanded(pool: &SqlitePool, group_id: &GroupId) -> Result<bool> {
    get_bool(pool, &group_expanded_key(group_id), true).await
}

/// Record the expanded/collapsed state of a catalog group
pub async fn set_group_expanded(
    pool: &SqlitePool,
    group_id: &GroupId,
    expanded: bool,
) -> Result<()> {
    set_bool(pool, &group_expanded_key(group_id), expanded).await
}

/// `FlagStore` backed by the `flags` table
#[derive(Debug, Clone)]
pub struct SqliteFlagStore {
    pool: SqlitePool,
}

impl SqliteFlagStore {
    /// Wrap a pool whose migrations have already run
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl FlagStore for SqliteFlagStore {
    async fn get(&self, key: &str) -> gamma_core::Result<Option<String>> {
        Ok(get_flag(&self.pool, key).await?)
    }

    async fn set(&self, key: &str, value: &str) -> gamma_core::Result<()> {
        Ok(set_flag(&self.pool, key, value).await?)
    }
}
