//! Auth middleware: resolves a bearer token into an `Auth` extension.
//!
//! Requests without a token, or with a token the authenticator rejects,
//! proceed without the extension; handlers that extract `Auth` then fail
//! with the permission-denied error.

use axum::{
	extract::{Request, State},
	http::header::AUTHORIZATION,
	middleware::Next,
	response::Response,
};

use crate::extract::Auth;
use crate::prelude::*;

fn bearer_token(req: &Request) -> Option<String> {
	let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
	header.strip_prefix("Bearer ").map(str::to_owned)
}

pub async fn authenticate(
	State(app): State<App>,
	mut req: Request,
	next: Next,
) -> Response {
	if let Some(token) = bearer_token(&req) {
		match app.authenticator.authenticate(&token).await {
			Ok(ctx) => {
				req.extensions_mut().insert(Auth(ctx));
			}
			Err(err) => {
				warn!(error = %err, "Rejected bearer token");
			}
		}
	}
	next.run(req).await
}

// vim: ts=4
