pub mod errors;
pub mod models;
pub mod pool;
pub mod purge;
pub mod schema;

use deadpool_diesel::postgres::{Manager, Pool, Runtime};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

pub use errors::{DatabaseError, InitError};
pub use pool::JournalPool;
pub use purge::purge_user_journal;

/// Embedded schema migrations, applied at startup by [`run_migrations`].
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Build the connection pool. No connection is opened until first use.
pub fn init_pool(database_url: &str, max_size: usize) -> Result<Pool, InitError> {
    let manager = Manager::new(database_url, Runtime::Tokio1);
    Pool::builder(manager)
        .max_size(max_size)
        .build()
        .map_err(|e| InitError::Pool(e.to_string()))
}

/// Apply every pending migration.
pub async fn run_migrations(pool: &Pool) -> Result<(), InitError> {
    let conn = pool
        .get()
        .await
        .map_err(|e| InitError::Pool(e.to_string()))?;

    let applied = conn
        .interact(|conn| {
            conn.run_pending_migrations(MIGRATIONS)
                .map(|versions| versions.len())
                .map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| InitError::Migration(e.to_string()))?
        .map_err(InitError::Migration)?;

    tracing::info!(applied, "Database migrations up to date");
    Ok(())
}
