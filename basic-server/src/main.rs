//! Minimal Modkit server: sample catalog over the SQLite settings adapter.

use std::{env, path, sync::Arc};

use modkit_settings_adapter_sqlite::SettingsAdapterSqlite;

mod collaborators;
mod modules;

use collaborators::{RoleAccessChecker, StaticAuthenticator, StaticUserDirectory};
use modules::{AnalyticsModule, AudienceModule, PagespeedModule, VerificationModule};

pub struct Config {
	pub db_dir: path::PathBuf,
	pub listen: String,
}

#[tokio::main]
async fn main() -> modkit::error::MkResult<()> {
	let config = Config {
		db_dir: path::PathBuf::from(env::var("DB_DIR").unwrap_or("./data".to_string())),
		listen: env::var("LISTEN").unwrap_or("127.0.0.1:8080".to_string()),
	};

	tokio::fs::create_dir_all(&config.db_dir).await?;
	let settings_adapter =
		Arc::new(SettingsAdapterSqlite::new(config.db_dir.join("settings.db")).await?);

	let mut builder = modkit::AppBuilder::new();
	builder
		.listen(config.listen)
		.settings_adapter(settings_adapter.clone())
		.access_checker(Arc::new(RoleAccessChecker))
		.user_directory(Arc::new(StaticUserDirectory))
		.authenticator(Arc::new(StaticAuthenticator))
		.module(Arc::new(VerificationModule::new()))
		.module(Arc::new(AnalyticsModule::new(settings_adapter)))
		.module(Arc::new(AudienceModule::new()))
		.module(Arc::new(PagespeedModule::new()));

	builder.run().await
}

// vim: ts=4
