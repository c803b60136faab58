use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, RuntimeErr, SqlErr};
use tracing::{error, info, warn};

use crate::domain::common::{DatabaseConfig, entities::app_errors::CoreError};

#[derive(Clone)]
pub struct Postgres {
    db: DatabaseConnection,
}

impl Postgres {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, anyhow::Error> {
        let mut options = ConnectOptions::new(config.url());
        options.sqlx_logging(false);

        let db = Database::connect(options).await?;
        info!(
            "Connected to postgres at {}:{}/{}",
            config.host, config.port, config.name
        );

        Ok(Self { db })
    }

    /// Applies the SQL migrations shipped with the crate.
    pub async fn migrate(&self) -> Result<(), anyhow::Error> {
        sqlx::migrate!("./migrations")
            .run(self.db.get_postgres_connection_pool())
            .await?;
        info!("Database migrations applied");

        Ok(())
    }

    pub fn get_db(&self) -> DatabaseConnection {
        self.db.clone()
    }
}

/// Maps a database error onto the domain error space.
///
/// Unique violations become [`CoreError::PersistenceConflict`], lost connections
/// [`CoreError::PersistenceUnavailable`].
pub fn map_db_error(context: &str, e: DbErr) -> CoreError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = e.sql_err() {
        warn!("{}: unique constraint violated: {}", context, detail);
        return CoreError::PersistenceConflict;
    }

    match e {
        DbErr::Conn(_)
        | DbErr::ConnectionAcquire(_)
        | DbErr::Query(RuntimeErr::SqlxError(
            sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed,
        ))
        | DbErr::Exec(RuntimeErr::SqlxError(
            sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed,
        )) => {
            error!("{}: database unavailable: {}", context, e);
            CoreError::PersistenceUnavailable(e.to_string())
        }
        _ => {
            error!("{}: {}", context, e);
            CoreError::InternalServerError
        }
    }
}
