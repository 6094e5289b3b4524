//! `PostgreSQL` storage implementation.
//!
//! This module provides the `PgStore` implementation of the `Store` trait.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::error::{Result, StoreError};
use crate::schema::CREATE_ROOMS_TABLE;
use crate::types::{NewRoom, Room};
use crate::Store;

/// PostgreSQL-backed storage implementation.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect to the database at `database_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be created.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the underlying pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the `rooms` table if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_ROOMS_TABLE).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn get_room(&self, id: i64) -> Result<Option<Room>> {
        let room = sqlx::query_as::<_, Room>(
            "SELECT id, slug, space_id, created_at, updated_at FROM rooms WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(room)
    }

    async fn get_room_by_slug(&self, slug: &str) -> Result<Option<Room>> {
        let room = sqlx::query_as::<_, Room>(
            "SELECT id, slug, space_id, created_at, updated_at FROM rooms WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(room)
    }

    async fn list_rooms(&self) -> Result<Vec<Room>> {
        let rooms = sqlx::query_as::<_, Room>(
            "SELECT id, slug, space_id, created_at, updated_at FROM rooms ORDER BY slug ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rooms)
    }

    async fn insert_room(&self, room: NewRoom) -> Result<Room> {
        let now = Utc::now();
        let room = sqlx::query_as::<_, Room>(
            r"
            INSERT INTO rooms (slug, space_id, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            RETURNING id, slug, space_id, created_at, updated_at
            ",
        )
        .bind(&room.slug)
        .bind(&room.space_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(room_id = room.id, slug = %room.slug, "Inserted room");

        Ok(room)
    }

    async fn update_space_id(&self, id: i64, space_id: &str) -> Result<Room> {
        let room = sqlx::query_as::<_, Room>(
            r"
            UPDATE rooms
            SET space_id = $1, updated_at = $2
            WHERE id = $3
            RETURNING id, slug, space_id, created_at, updated_at
            ",
        )
        .bind(space_id)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        room.ok_or(StoreError::NotFound)
    }

    async fn delete_room(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
