//! End-to-end fixtures: in-memory settings store, token collaborators,
//! and a small module catalog driven through the real router.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Map, Value};
use tower::ServiceExt;

use modkit::access::{AccessChecker, AuthCtx, Authenticator, Capability, UserDirectory};
use modkit::error::{Error, MkResult};
use modkit::settings_adapter::{merge_blob, SettingsAdapter};
use modkit::types::UserId;
use modkit::{AppBuilder, Module, ModuleDescriptor};

// MemorySettingsAdapter //
//***********************//
#[derive(Default)]
pub struct MemorySettingsAdapter {
	blobs: Mutex<HashMap<String, Value>>,
}

impl MemorySettingsAdapter {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn blob(&self, key: &str) -> Option<Value> {
		self.blobs.lock().unwrap().get(key).cloned()
	}

	pub fn put(&self, key: &str, blob: Value) {
		self.blobs.lock().unwrap().insert(key.into(), blob);
	}
}

#[async_trait]
impl SettingsAdapter for MemorySettingsAdapter {
	async fn read(&self, key: &str) -> MkResult<Option<Value>> {
		Ok(self.blobs.lock().unwrap().get(key).cloned())
	}

	async fn merge(&self, key: &str, patch: &Map<String, Value>) -> MkResult<Value> {
		let mut blobs = self.blobs.lock().unwrap();
		let merged = merge_blob(blobs.get(key).cloned(), patch);
		blobs.insert(key.into(), merged.clone());
		Ok(merged)
	}

	async fn delete(&self, key: &str) -> MkResult<()> {
		self.blobs.lock().unwrap().remove(key);
		Ok(())
	}
}

// Collaborators //
//***************//
/// Tokens: `admin` (all capabilities), `editor` (options + insights),
/// `viewer` (views only). User 3 ("ghost") exists but holds no valid
/// credentials.
pub struct Tokens;

fn users() -> Vec<(&'static str, UserId, &'static str, &'static str)> {
	vec![
		("admin", UserId(1), "admin", "admin"),
		("editor", UserId(2), "editor", "editor"),
		("ghost", UserId(3), "ghost", "editor"),
		("viewer", UserId(4), "viewer", "viewer"),
	]
}

#[async_trait]
impl Authenticator for Tokens {
	async fn authenticate(&self, token: &str) -> MkResult<AuthCtx> {
		users()
			.into_iter()
			.find(|(t, ..)| *t == token)
			.map(|(_, user_id, login, role)| AuthCtx {
				user_id,
				login: login.into(),
				roles: [Box::from(role)].into(),
			})
			.ok_or(Error::PermissionDenied)
	}
}

pub struct Roles;

#[async_trait]
impl AccessChecker for Roles {
	async fn can(&self, auth: &AuthCtx, capability: Capability) -> bool {
		let has_role = |role: &str| auth.roles.iter().any(|r| r.as_ref() == role);
		match capability {
			Capability::Authenticate | Capability::ViewSplash | Capability::ViewDashboard => true,
			Capability::ViewInsights | Capability::ManageOptions => {
				has_role("admin") || has_role("editor")
			}
			Capability::Setup | Capability::ListUsers => has_role("admin"),
		}
	}
}

pub struct Users;

#[async_trait]
impl UserDirectory for Users {
	async fn login(&self, user_id: UserId) -> MkResult<Option<Box<str>>> {
		Ok(users().into_iter().find(|(_, id, ..)| *id == user_id).map(|(_, _, login, _)| login.into()))
	}

	async fn has_valid_credentials(&self, user_id: UserId) -> MkResult<bool> {
		// "ghost" lost its credentials
		Ok(user_id != UserId(3) && users().iter().any(|(_, id, ..)| *id == user_id))
	}
}

// Catalog //
//*********//
struct Verification {
	descriptor: ModuleDescriptor,
}

#[async_trait]
impl Module for Verification {
	fn descriptor(&self) -> &ModuleDescriptor {
		&self.descriptor
	}
}

struct Analytics {
	descriptor: ModuleDescriptor,
	settings: Arc<MemorySettingsAdapter>,
}

#[async_trait]
impl Module for Analytics {
	fn descriptor(&self) -> &ModuleDescriptor {
		&self.descriptor
	}

	async fn is_connected(&self) -> MkResult<bool> {
		let blob = self.settings.read("analytics").await?;
		Ok(blob.as_ref().and_then(|blob| blob.get("measurementID")).is_some())
	}

	async fn check_service_entity_access(&self, auth: &AuthCtx) -> MkResult<bool> {
		let blob = self.settings.read("analytics").await?.unwrap_or_else(|| json!({}));
		if blob.get("ownerID").and_then(Value::as_i64) == Some(auth.user_id.0) {
			return Ok(true);
		}
		Ok(blob
			.get("sharedWith")
			.and_then(Value::as_array)
			.is_some_and(|ids| ids.iter().any(|id| id.as_i64() == Some(auth.user_id.0))))
	}

	async fn get_data(
		&self,
		_auth: &AuthCtx,
		datapoint: &str,
		_params: &Map<String, Value>,
	) -> MkResult<Value> {
		match datapoint {
			"notifications" => Ok(json!([{ "id": "analytics-live" }])),
			_ => Err(Error::UnknownDatapoint {
				slug: self.descriptor.slug.clone(),
				datapoint: datapoint.into(),
			}),
		}
	}
}

struct Audience {
	descriptor: ModuleDescriptor,
}

#[async_trait]
impl Module for Audience {
	fn descriptor(&self) -> &ModuleDescriptor {
		&self.descriptor
	}
}

struct Pagespeed {
	descriptor: ModuleDescriptor,
}

#[async_trait]
impl Module for Pagespeed {
	fn descriptor(&self) -> &ModuleDescriptor {
		&self.descriptor
	}

	async fn get_data(
		&self,
		_auth: &AuthCtx,
		datapoint: &str,
		params: &Map<String, Value>,
	) -> MkResult<Value> {
		match datapoint {
			"report" => {
				let url = params.get("url").and_then(Value::as_str).unwrap_or("/");
				Ok(json!({ "url": url, "score": 87 }))
			}
			_ => Err(Error::UnknownDatapoint {
				slug: self.descriptor.slug.clone(),
				datapoint: datapoint.into(),
			}),
		}
	}
}

/// Build the app + router over a fresh in-memory store.
pub async fn test_app() -> (Arc<MemorySettingsAdapter>, Router) {
	let settings = Arc::new(MemorySettingsAdapter::new());

	let mut builder = AppBuilder::new();
	builder
		.settings_adapter(settings.clone())
		.access_checker(Arc::new(Roles))
		.user_directory(Arc::new(Users))
		.authenticator(Arc::new(Tokens))
		.module(Arc::new(Verification {
			descriptor: ModuleDescriptor::builder("verification", "Verification")
				.internal()
				.force_active()
				.build(),
		}))
		.module(Arc::new(Analytics {
			descriptor: ModuleDescriptor::builder("analytics", "Analytics")
				.order(10)
				.shareable()
				.with_owner()
				.with_settings()
				.with_service_entity()
				.build(),
			settings: settings.clone(),
		}))
		.module(Arc::new(Audience {
			descriptor: ModuleDescriptor::builder("audience", "Audience Segments")
				.order(20)
				.dependency("analytics")
				.with_settings()
				.build(),
		}))
		.module(Arc::new(Pagespeed {
			descriptor: ModuleDescriptor::builder("pagespeed", "PageSpeed Insights")
				.order(30)
				.shareable()
				.build(),
		}));

	let (_, router) = builder.build().await.expect("app should build");
	(settings, router)
}

/// Drive one request through the router and decode the JSON response.
pub async fn request(
	router: &Router,
	method: &str,
	uri: &str,
	token: Option<&str>,
	body: Option<Value>,
) -> (StatusCode, Value) {
	let mut builder = Request::builder().method(method).uri(uri);
	if let Some(token) = token {
		builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
	}
	let request = match body {
		Some(body) => builder
			.header(header::CONTENT_TYPE, "application/json")
			.body(Body::from(body.to_string()))
			.unwrap(),
		None => builder.body(Body::empty()).unwrap(),
	};

	let response = router.clone().oneshot(request).await.unwrap();
	let status = response.status();
	let bytes = response.into_body().collect().await.unwrap().to_bytes();
	let value = if bytes.is_empty() {
		Value::Null
	} else {
		serde_json::from_slice(&bytes).unwrap_or(Value::Null)
	};
	(status, value)
}

// vim: ts=4
