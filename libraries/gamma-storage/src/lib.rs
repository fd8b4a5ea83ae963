//! Gamma Noise Storage
//!
//! `SQLite` persistence for the handful of flags the UI keeps between launches
//! (onboarding seen, which catalog groups are expanded). The playback
//! controller never touches storage.
//!
//! # Example
//!
//! ```rust,no_run
//! use gamma_storage::{create_pool, flags, run_migrations};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://gamma.db").await?;
//! run_migrations(&pool).await?;
//!
//! if !flags::onboarding_seen(&pool).await? {
//!     // show onboarding
//!     flags::set_onboarding_seen(&pool, true).await?;
//! }
//! # Ok(())
//! # }
//! ```

mod error;

pub mod flags;

pub use error::{Result, StorageError};
pub use flags::SqliteFlagStore;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use tracing::debug;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// Call once at startup, before any flag is read.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://gamma.db>`
///   or `sqlite::memory:`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    debug!("Creating SQLite pool for {}", database_url);

    let in_memory = database_url.contains(":memory:");
    let mut options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .busy_timeout(std::time::Duration::from_secs(30));
    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    // Every connection to an in-memory database sees its own empty database
    let max_connections = if in_memory { 1 } else { 5 };

    let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections);
    if in_memory {
        pool_options = pool_options.idle_timeout(None).max_lifetime(None);
    }

    let pool = pool_options.connect_with(options).await?;

    Ok(pool)
}
