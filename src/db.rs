use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::fs;
use std::str::FromStr;

pub type DbPool = SqlitePool;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum PersistenceError {
  #[error("Database error: {0}")]
  Database(String),

  #[error("Serialization error: {0}")]
  Serialization(String),
}

impl From<sqlx::Error> for PersistenceError {
  fn from(e: sqlx::Error) -> Self {
    PersistenceError::Database(e.to_string())
  }
}

impl From<sqlx::migrate::MigrateError> for PersistenceError {
  fn from(e: sqlx::migrate::MigrateError) -> Self {
    PersistenceError::Database(e.to_string())
  }
}

impl From<serde_json::Error> for PersistenceError {
  fn from(e: serde_json::Error) -> Self {
    PersistenceError::Serialization(e.to_string())
  }
}

impl From<std::io::Error> for PersistenceError {
  fn from(e: std::io::Error) -> Self {
    PersistenceError::Database(e.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Connection Setup
/// ---------------------------------------------------------------------------

/// Initialize the database connection pool and run migrations
pub async fn initialize_db(database_url: &str) -> Result<DbPool, PersistenceError> {
  let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

  // Create the parent directory if it doesn't exist
  if let Some(parent) = options
    .get_filename()
    .parent()
    .filter(|p| !p.as_os_str().is_empty())
  {
    fs::create_dir_all(parent)?;
  }

  tracing::info!(url = %database_url, "Initializing database");

  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect_with(options)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  tracing::info!("Database initialized successfully");

  Ok(pool)
}

/// ---------------------------------------------------------------------------
/// Named Storage Slots
/// ---------------------------------------------------------------------------

/// Read the payload stored under `name`, if any
pub async fn load_slot(db: &DbPool, name: &str) -> Result<Option<String>, PersistenceError> {
  let payload: Option<String> =
    sqlx::query_scalar("SELECT payload FROM storage_slots WHERE name = ?1")
      .bind(name)
      .fetch_optional(db)
      .await?;

  Ok(payload)
}

/// Replace the payload stored under `name`
pub async fn save_slot(db: &DbPool, name: &str, payload: &str) -> Result<(), PersistenceError> {
  sqlx::query(
    r#"
    INSERT INTO storage_slots (name, payload, updated_at)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(name) DO UPDATE SET
      payload = excluded.payload,
      updated_at = excluded.updated_at
    "#,
  )
  .bind(name)
  .bind(payload)
  .bind(Utc::now())
  .execute(db)
  .await?;

  Ok(())
}

/// Remove the slot entirely (returns true if it existed)
pub async fn erase_slot(db: &DbPool, name: &str) -> Result<bool, PersistenceError> {
  let result = sqlx::query("DELETE FROM storage_slots WHERE name = ?1")
    .bind(name)
    .execute(db)
    .await?;

  Ok(result.rows_affected() > 0)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
