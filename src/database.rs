use sqlx::{postgres::PgPoolOptions, Pool, Postgres};
use std::future::Future;
use std::time::Duration;
use tracing::info;

use crate::error::ServiceError;

#[derive(Clone)]
pub struct Database {
    pub pool: Pool<Postgres>,
    query_timeout: Duration,
}

impl Database {
    pub async fn new(database_url: &str, pool_size: u32, query_timeout: Duration) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(query_timeout)
            .connect(database_url)
            .await?;

        Ok(Database { pool, query_timeout })
    }

    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running database migrations...");
        sqlx::migrate!("./src/migrations")
            .run(&self.pool)
            .await?;
        info!("Migrations completed");
        Ok(())
    }

    /// Ограничивает одно обращение к БД таймаутом. Истёкший таймаут - это сбой:
    /// незавершённая транзакция откатывается при drop.
    pub async fn timed<T, F>(&self, fut: F) -> Result<T, ServiceError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(result) => result.map_err(ServiceError::from),
            Err(_) => Err(ServiceError::Timeout),
        }
    }
}
