//! Route assembly: one explicit table, built at startup.

use axum::{middleware, Router};

use crate::prelude::*;

/// Assemble the full route table for an app. Registration happens here and
/// nowhere else; feature crates only *return* their route tables.
pub fn init(app: App) -> Router {
	Router::new()
		.nest("/api/modules", modkit_modules::router())
		.layer(middleware::from_fn_with_state(app.clone(), modkit_core::middleware::authenticate))
		.with_state(app)
}

// vim: ts=4
