use crate::common::error::{BookingError, Result};
use libsql::{Builder, Connection, Database};
use std::env;
use tracing::info;

pub struct DatabaseManager {
    db: Database,
}

impl DatabaseManager {
    /// Create a database manager from the environment. A `libsql://` URL in
    /// `BOOKING_DB_URL` connects to Turso and requires
    /// `BOOKING_DB_AUTH_TOKEN`; anything else is treated as a local file
    /// path, defaulting to `booking.db`.
    pub async fn new() -> Result<Self> {
        let url = env::var("BOOKING_DB_URL").unwrap_or_else(|_| "booking.db".to_string());

        if url.starts_with("libsql://") {
            let auth_token =
                env::var("BOOKING_DB_AUTH_TOKEN").map_err(|_| BookingError::Database {
                    message: "BOOKING_DB_AUTH_TOKEN must be set for a remote database"
                        .to_string(),
                })?;

            info!("Connecting to remote database at {}", url);

            let db = Builder::new_remote(url, auth_token)
                .build()
                .await
                .map_err(|e| BookingError::Database {
                    message: format!("Failed to connect to database: {e}"),
                })?;

            Ok(Self { db })
        } else {
            Self::new_local(&url).await
        }
    }

    /// Open a local database file directly. Tests use this with a scratch
    /// path.
    pub async fn new_local(path: &str) -> Result<Self> {
        info!("Opening local database at {}", path);

        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| BookingError::Database {
                message: format!("Failed to open database: {e}"),
            })?;

        Ok(Self { db })
    }

    /// Get a connection to the database. Foreign-key enforcement is
    /// per-connection in SQLite, so it is switched on here.
    pub async fn get_connection(&self) -> Result<Connection> {
        let conn = self.db.connect().map_err(|e| BookingError::Database {
            message: format!("Failed to get database connection: {e}"),
        })?;

        conn.execute("PRAGMA foreign_keys = ON", libsql::params![])
            .await
            .map_err(|e| BookingError::Database {
                message: format!("Failed to enable foreign keys: {e}"),
            })?;

        Ok(conn)
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations...");

        let conn = self.get_connection().await?;

        let migration_sql_001 = include_str!("../migrations/001_create_tables.sql");
        conn.execute_batch(migration_sql_001)
            .await
            .map_err(|e| BookingError::Database {
                message: format!("Failed to run base migration: {e}"),
            })?;

        let migration_sql_002 = include_str!("../migrations/002_indexes.sql");
        conn.execute_batch(migration_sql_002)
            .await
            .map_err(|e| BookingError::Database {
                message: format!("Failed to run index migration: {e}"),
            })?;

        info!("Database migrations completed successfully");
        Ok(())
    }
}
