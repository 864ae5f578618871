use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, PgPool};

use crate::config::PostgreSql;
use crate::error::AppResult;
use crate::models::Paste;

const SCHEMA: &str = include_str!("../schema/pastes.sql");

/// Somewhere pastes can be written to. Shared by every listener.
#[async_trait]
pub trait PasteStore: Send + Sync {
    /// Insert a paste. Duplicate ids are reported as errors, never upserted.
    async fn insert_paste(&self, paste: &Paste) -> AppResult<()>;
}

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and make sure the server answers.
    pub async fn connect(params: &PostgreSql) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .connect_with(params.connect_options())
            .await?;

        let mut conn = pool.acquire().await?;
        conn.ping().await?;

        Ok(Self { pool })
    }

    /// Create the pastes table if it does not exist yet.
    pub async fn create_schema(&self) -> AppResult<()> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl PasteStore for Database {
    async fn insert_paste(&self, paste: &Paste) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO pastes (id, text, title, password, expiration, creation) VALUES ($1, \
             $2, $3, $4, $5, $6)",
        )
        .bind(&paste.id)
        .bind(&paste.text)
        .bind(&paste.title)
        .bind(&paste.password)
        .bind(paste.expiration)
        .bind(paste.creation)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
