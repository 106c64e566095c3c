//! Module API handlers: the request controller over the registry,
//! resolver, and gateway.
//!
//! Every handler runs its capability gate first, then dispatches; failures
//! at any stage produce the structured error envelope. Activation and
//! deactivation are idempotent; settings writes are merges.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use serde_with::skip_serializing_none;

use modkit_core::app::AppState;
use modkit_core::extract::Auth;
use modkit_types::types::OwnerInfo;

use crate::gateway::AccessGateway;
use crate::module::Module;
use crate::perm;
use crate::prelude::*;
use crate::registry::{ModuleRegistry, OWNER_ID_KEY};

/// Descriptor decorated with runtime state for API responses.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleInfo {
	pub slug: Box<str>,
	pub name: Box<str>,
	pub description: Box<str>,
	pub homepage: Box<str>,
	pub internal: bool,
	pub order: i32,
	pub force_active: bool,
	pub shareable: bool,
	pub recoverable: bool,
	pub active: bool,
	pub connected: bool,
	pub dependencies: Box<[Box<str>]>,
	pub dependants: Box<[Box<str>]>,
	pub owner: Option<OwnerInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivationRequest {
	slug: String,
	active: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SlugRequest {
	slug: String,
}

fn registry(app: &AppState) -> MkResult<&Arc<ModuleRegistry>> {
	app.ext::<Arc<ModuleRegistry>>()
}

fn gateway(app: &AppState) -> MkResult<&AccessGateway> {
	app.ext::<AccessGateway>()
}

/// Parse a JSON body into a typed request, mapping malformed payloads to
/// the validation error instead of a bare transport failure.
fn parse_body<T: DeserializeOwned>(body: Value) -> MkResult<T> {
	serde_json::from_value(body).map_err(|err| Error::Validation(err.to_string().into()))
}

/// Extract the optional `data` object of a write body.
fn data_object(body: &Value) -> MkResult<Map<String, Value>> {
	match body.get("data") {
		None | Some(Value::Null) => Ok(Map::new()),
		Some(Value::Object(map)) => Ok(map.clone()),
		Some(_) => Err(Error::Validation("data must be an object".into())),
	}
}

async fn decorate(
	registry: &ModuleRegistry,
	gateway: &AccessGateway,
	module: &dyn Module,
	include_owner: bool,
) -> ModuleInfo {
	let descriptor = module.descriptor();
	let slug = descriptor.slug.as_ref();

	let recoverable = gateway.is_recoverable(slug).await.unwrap_or_else(|err| {
		warn!(module = slug, error = %err, "Recoverability check failed");
		false
	});
	let owner = if include_owner && descriptor.has_owner {
		gateway.owner_info(slug).await.unwrap_or_else(|err| {
			warn!(module = slug, error = %err, "Owner lookup failed");
			None
		})
	} else {
		None
	};

	ModuleInfo {
		slug: descriptor.slug.clone(),
		name: descriptor.name.clone(),
		description: descriptor.description.clone(),
		homepage: descriptor.homepage.clone(),
		internal: descriptor.internal,
		order: descriptor.order,
		force_active: descriptor.force_active,
		shareable: descriptor.shareable,
		recoverable,
		active: registry.is_active(slug).await,
		connected: registry.is_connected(slug).await,
		dependencies: registry.graph().dependencies_of(slug).to_vec().into_boxed_slice(),
		dependants: registry.graph().dependants_of(slug).to_vec().into_boxed_slice(),
		owner,
	}
}

/// GET /list - all known modules decorated with runtime state
pub async fn list_modules(
	State(app): State<App>,
	Auth(auth): Auth,
) -> MkResult<Json<ApiResponse<Vec<ModuleInfo>>>> {
	perm::can_list_modules(&app, &auth).await?;
	let registry = registry(&app)?;
	let gateway = gateway(&app)?;
	let include_owner = app.access_checker.can(&auth, Capability::ListUsers).await;

	let mut modules = Vec::with_capacity(registry.list_available().len());
	for module in registry.list_available() {
		modules.push(decorate(registry, gateway, module.as_ref(), include_owner).await);
	}
	Ok(Json(ApiResponse::new(modules)))
}

/// POST /activation `{slug, active}` - activate or cascade-deactivate
pub async fn set_activation(
	State(app): State<App>,
	Auth(auth): Auth,
	Json(body): Json<Value>,
) -> MkResult<Json<ApiResponse<Value>>> {
	perm::can_manage_options(&app, &auth).await?;
	let req: ActivationRequest = parse_body(body)?;
	let registry = registry(&app)?;
	registry.get(&req.slug)?;

	if req.active {
		// Refuse instead of activating dependencies implicitly
		for dependency in registry.graph().dependencies_of(&req.slug) {
			if !registry.is_active(dependency).await {
				let dependency_name = registry.descriptor(dependency)?.name.clone();
				return Err(Error::InactiveDependency {
					slug: req.slug.into(),
					dependency: dependency.clone(),
					dependency_name,
				});
			}
		}
		registry.activate(&req.slug).await?;
	} else {
		let deactivated = registry.deactivate_cascade(&req.slug).await?;
		if !deactivated.is_empty() {
			info!(module = %req.slug, dependants = ?deactivated, "Cascade deactivated dependants");
		}
	}
	Ok(Json(ApiResponse::new(json!({ "success": true }))))
}

/// GET /info?slug= - one module decorated with runtime state
pub async fn module_info(
	State(app): State<App>,
	Auth(auth): Auth,
	Query(query): Query<HashMap<String, String>>,
) -> MkResult<Json<ApiResponse<ModuleInfo>>> {
	perm::can_authenticate(&app, &auth).await?;
	let slug = query.get("slug").ok_or_else(|| Error::Validation("slug is required".into()))?;
	let registry = registry(&app)?;
	let gateway = gateway(&app)?;
	let module = registry.get(slug)?;
	let include_owner = app.access_checker.can(&auth, Capability::ListUsers).await;

	Ok(Json(ApiResponse::new(decorate(registry, gateway, module.as_ref(), include_owner).await)))
}

/// POST /check-access `{slug}` - may the caller access the module's data
pub async fn check_access(
	State(app): State<App>,
	Auth(auth): Auth,
	Json(body): Json<Value>,
) -> MkResult<Json<ApiResponse<Value>>> {
	perm::can_setup(&app, &auth).await?;
	let req: SlugRequest = parse_body(body)?;
	let access = gateway(&app)?.check_access(&req.slug, &auth).await?;
	Ok(Json(ApiResponse::new(json!({ "access": access }))))
}

/// GET /{slug}/notifications - empty list for inactive modules and for
/// modules lacking the datapoint; dashboards stay resilient either way
pub async fn get_notifications(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(slug): Path<String>,
) -> MkResult<Json<ApiResponse<Value>>> {
	perm::can_authenticate(&app, &auth).await?;
	let registry = registry(&app)?;
	let module = registry.get(&slug)?;

	if !registry.is_active(&slug).await {
		return Ok(Json(ApiResponse::new(json!([]))));
	}
	match module.get_data(&auth, "notifications", &Map::new()).await {
		Ok(notifications) => Ok(Json(ApiResponse::new(notifications))),
		Err(Error::UnknownDatapoint { .. }) => Ok(Json(ApiResponse::new(json!([])))),
		Err(err) => Err(err),
	}
}

/// GET /{slug}/settings
pub async fn get_settings(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(slug): Path<String>,
) -> MkResult<Json<ApiResponse<Value>>> {
	perm::can_manage_options(&app, &auth).await?;
	let settings = registry(&app)?.read_settings(&slug).await?;
	Ok(Json(ApiResponse::new(settings)))
}

/// POST /{slug}/settings `{data}` - merge, not replace; returns the
/// settings after the merge
pub async fn set_settings(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(slug): Path<String>,
	Json(body): Json<Value>,
) -> MkResult<Json<ApiResponse<Value>>> {
	perm::can_manage_options(&app, &auth).await?;
	let patch = data_object(&body)?;
	let merged = registry(&app)?.merge_settings(&slug, &patch).await?;
	info!(module = %slug, "Module settings updated");
	Ok(Json(ApiResponse::new(merged)))
}

/// GET /{slug}/{datapoint} - forwarded to the module's own handler; module
/// errors surface unchanged
pub async fn get_datapoint(
	State(app): State<App>,
	Auth(auth): Auth,
	Path((slug, datapoint)): Path<(String, String)>,
	Query(query): Query<HashMap<String, String>>,
) -> MkResult<Json<ApiResponse<Value>>> {
	perm::can_view_insights(&app, &auth).await?;
	let module = registry(&app)?.get(&slug)?;
	let params: Map<String, Value> =
		query.into_iter().map(|(key, value)| (key, Value::String(value))).collect();
	let data = module.get_data(&auth, &datapoint, &params).await?;
	Ok(Json(ApiResponse::new(data)))
}

/// POST /{slug}/{datapoint} `{data}`
pub async fn set_datapoint(
	State(app): State<App>,
	Auth(auth): Auth,
	Path((slug, datapoint)): Path<(String, String)>,
	Json(body): Json<Value>,
) -> MkResult<Json<ApiResponse<Value>>> {
	perm::can_manage_options(&app, &auth).await?;
	let module = registry(&app)?.get(&slug)?;
	let data = data_object(&body)?;
	let result = module.set_data(&auth, &datapoint, &data).await?;
	Ok(Json(ApiResponse::new(result)))
}

/// POST /recover-module `{slug}` - reassign a stale owner to the caller
pub async fn recover_module(
	State(app): State<App>,
	Auth(auth): Auth,
	Json(body): Json<Value>,
) -> MkResult<Json<ApiResponse<Value>>> {
	perm::can_setup(&app, &auth).await?;
	let req: SlugRequest = parse_body(body)?;
	let registry = registry(&app)?;
	let gateway = gateway(&app)?;

	let descriptor = registry.descriptor(&req.slug)?;
	if !descriptor.shareable {
		return Err(Error::NotShareable(req.slug.into()));
	}
	if !gateway.is_recoverable(&req.slug).await? {
		return Err(Error::NotRecoverable(req.slug.into()));
	}
	// Re-check access as the current caller, directly in-process
	if !gateway.check_access(&req.slug, &auth).await? {
		return Err(Error::NotAccessible(req.slug.into()));
	}

	let mut patch = Map::new();
	patch.insert(OWNER_ID_KEY.into(), json!(auth.user_id));
	registry.merge_settings(&req.slug, &patch).await?;
	info!(module = %req.slug, user = %auth.user_id, "Module ownership recovered");

	Ok(Json(ApiResponse::new(Value::Object(patch))))
}

// vim: ts=4
