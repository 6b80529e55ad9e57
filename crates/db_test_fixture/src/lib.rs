use anyhow::Result;
use sqlx::{Connection, PgConnection, PgPool};
use store::run_migrations;
use uuid::Uuid;

/// Disposable migrated database for integration tests.
pub struct TempDatabase {
    pool: PgPool,
    url: String,
    name: String,
    admin_url: String,
}

/// Creates a uniquely named, fully migrated database and returns a handle to
/// it. Yields `None` when neither `TEST_ADMIN_URL` nor `DATABASE_URL` is set,
/// so tests can skip themselves on machines without Postgres.
pub async fn create(prefix: &str) -> Result<Option<TempDatabase>> {
    let admin_url = match std::env::var("TEST_ADMIN_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => return Ok(None),
    };

    let name = format!("test_{prefix}_{}", Uuid::new_v4().simple());

    let mut admin = PgConnection::connect(&admin_url).await?;
    sqlx::query(&format!(r#"CREATE DATABASE "{name}""#))
        .execute(&mut admin)
        .await?;
    admin.close().await?;

    let url = format!("{admin_url}/{name}");
    let pool = PgPool::connect(&url).await?;
    run_migrations(&pool).await?;

    Ok(Some(TempDatabase {
        pool,
        url,
        name,
        admin_url,
    }))
}

impl TempDatabase {
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Drops the database, kicking out any connection still attached to it.
    pub async fn delete(self) -> Result<()> {
        self.pool.close().await;

        let mut admin = PgConnection::connect(&self.admin_url).await?;
        sqlx::query(&format!(
            r#"DROP DATABASE IF EXISTS "{}" WITH (FORCE)"#,
            self.name
        ))
        .execute(&mut admin)
        .await?;
        admin.close().await?;

        Ok(())
    }
}
