use sqlx::{PgPool, migrate::Migrator, postgres::PgPoolOptions};

/// Compile-time discovered SQLx migrations for the `mvc-database` crate.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Shared database handle passed across crates.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a database handle from an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url` with at most `max_connections` connections.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self::new(pool))
    }

    /// Apply pending migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        MIGRATOR.run(&self.pool).await
    }

    /// Expose the underlying pool for query modules.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Balance ledger operations (deposit, withdraw, transfer).
pub mod ledger;
/// Record types mapped onto tables.
pub mod models;
/// Generic create/get/update/delete/filter wrapper shared by every model.
pub mod record;

pub use ledger::LedgerError;
pub use record::{FieldValue, Record, RecordError};
