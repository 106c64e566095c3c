//! SQLite-backed settings store adapter.
//!
//! Stores one JSON blob per key in a single `settings` table. Merge runs
//! read-merge-write inside one transaction, so each call is atomic on its
//! own; there are no multi-key transactions.

use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};
use sqlx::Row;

use modkit::prelude::*;
use modkit::settings_adapter::{merge_blob, SettingsAdapter};

mod schema;

use schema::init_db;

fn db_err(err: &sqlx::Error) -> Error {
	warn!("DB: {:#?}", err);
	Error::Storage("database error".into())
}

#[derive(Debug)]
pub struct SettingsAdapterSqlite {
	db: SqlitePool,
}

impl SettingsAdapterSqlite {
	pub async fn new(path: impl AsRef<Path>) -> MkResult<Self> {
		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path.as_ref())
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.map_err(|err| db_err(&err))?;

		init_db(&db).await.map_err(|err| db_err(&err))?;

		Ok(Self { db })
	}
}

#[async_trait]
impl SettingsAdapter for SettingsAdapterSqlite {
	async fn read(&self, key: &str) -> MkResult<Option<serde_json::Value>> {
		let row = sqlx::query("SELECT value FROM settings WHERE key = ?1")
			.bind(key)
			.fetch_optional(&self.db)
			.await
			.map_err(|err| db_err(&err))?;

		Ok(row.and_then(|row| {
			let value: Option<String> = row.try_get("value").ok()?;
			value.and_then(|value| serde_json::from_str(&value).ok())
		}))
	}

	async fn merge(
		&self,
		key: &str,
		patch: &serde_json::Map<String, serde_json::Value>,
	) -> MkResult<serde_json::Value> {
		let mut tx = self.db.begin().await.map_err(|err| db_err(&err))?;

		let row = sqlx::query("SELECT value FROM settings WHERE key = ?1")
			.bind(key)
			.fetch_optional(&mut *tx)
			.await
			.map_err(|err| db_err(&err))?;
		let base = row.and_then(|row| {
			let value: Option<String> = row.try_get("value").ok()?;
			value.and_then(|value| serde_json::from_str(&value).ok())
		});

		let merged = merge_blob(base, patch);
		sqlx::query(
			"INSERT INTO settings (key, value) VALUES (?1, ?2)
			ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = unixepoch()",
		)
		.bind(key)
		.bind(merged.to_string())
		.execute(&mut *tx)
		.await
		.map_err(|err| db_err(&err))?;

		tx.commit().await.map_err(|err| db_err(&err))?;
		Ok(merged)
	}

	async fn delete(&self, key: &str) -> MkResult<()> {
		sqlx::query("DELETE FROM settings WHERE key = ?1")
			.bind(key)
			.execute(&self.db)
			.await
			.map_err(|err| db_err(&err))?;
		Ok(())
	}
}
