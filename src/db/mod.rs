//! Database module providing connection management, migrations, and queries.
//!
//! A single [`DbPool`] is built at startup and handed to every component;
//! nothing else opens or closes connections.

pub mod areas;
pub mod machines;
pub mod oems;
pub mod parts;
pub mod users;

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::config::{Config, DatabaseSettings};
use crate::error::{AppError, AppResult};
use crate::migration::Migrator;

/// Timeout for establishing a connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared database handle.
///
/// Cloning is cheap: the underlying sea-orm connection is reference counted.
#[derive(Clone)]
pub struct DbPool {
    conn: DatabaseConnection,
}

impl DbPool {
    /// Connect using the application configuration.
    pub async fn new(config: &Config) -> AppResult<Self> {
        Self::connect(&config.database).await
    }

    /// Connect with explicit settings.
    pub async fn connect(settings: &DatabaseSettings) -> AppResult<Self> {
        let mut options = ConnectOptions::new(settings.url.clone());
        options
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .connect_timeout(CONNECT_TIMEOUT)
            .sqlx_logging(false);

        let conn = Database::connect(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to database: {}", e)))?;

        info!(
            backend = if settings.is_sqlite() { "sqlite" } else { "postgres" },
            max_connections = settings.max_connections,
            "Database pool created"
        );

        Ok(Self { conn })
    }

    /// Fresh, migrated in-memory SQLite database.
    pub async fn in_memory() -> AppResult<Self> {
        let pool = Self::connect(&DatabaseSettings::sqlite_memory()).await?;
        pool.run_migrations().await?;
        Ok(pool)
    }

    /// Borrow the underlying connection.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Apply all pending migrations.
    pub async fn run_migrations(&self) -> AppResult<()> {
        Migrator::up(&self.conn, None)
            .await
            .map_err(|e| AppError::Database(format!("Failed to run migrations: {}", e)))
    }

    /// Round-trip to the database.
    pub async fn ping(&self) -> AppResult<()> {
        self.conn
            .ping()
            .await
            .map_err(|e| AppError::Database(format!("Database ping failed: {}", e)))
    }
}
