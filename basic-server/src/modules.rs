//! Sample module catalog for the demo server.
//!
//! Four modules exercising every capability flag: a force-active internal
//! verification module, a service-entity-backed analytics module with
//! settings and an owner, an audience module depending on analytics, and a
//! shareable pagespeed module without a service entity.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use modkit::access::AuthCtx;
use modkit::error::{Error, MkResult};
use modkit::settings_adapter::SettingsAdapter;
use modkit::{Module, ModuleDescriptor};

// Verification //
//**************//
#[derive(Debug)]
pub struct VerificationModule {
	descriptor: ModuleDescriptor,
}

impl VerificationModule {
	pub fn new() -> Self {
		Self {
			descriptor: ModuleDescriptor::builder("site-verification", "Site Verification")
				.description("Verifies ownership of the site with connected services")
				.homepage("https://modkit.dev/modules/site-verification")
				.internal()
				.force_active()
				.build(),
		}
	}
}

#[async_trait]
impl Module for VerificationModule {
	fn descriptor(&self) -> &ModuleDescriptor {
		&self.descriptor
	}
}

// Analytics //
//***********//
pub struct AnalyticsModule {
	descriptor: ModuleDescriptor,
	settings: Arc<dyn SettingsAdapter>,
}

impl AnalyticsModule {
	pub fn new(settings: Arc<dyn SettingsAdapter>) -> Self {
		Self {
			descriptor: ModuleDescriptor::builder("analytics", "Analytics")
				.description("Traffic and engagement reporting")
				.homepage("https://modkit.dev/modules/analytics")
				.order(10)
				.shareable()
				.with_owner()
				.with_settings()
				.with_service_entity()
				.build(),
			settings,
		}
	}

	async fn blob(&self) -> MkResult<Value> {
		Ok(self.settings.read(self.slug()).await?.unwrap_or_else(|| json!({})))
	}
}

#[async_trait]
impl Module for AnalyticsModule {
	fn descriptor(&self) -> &ModuleDescriptor {
		&self.descriptor
	}

	async fn is_connected(&self) -> MkResult<bool> {
		// Connected once a measurement ID has been configured
		Ok(self.blob().await?.get("measurementID").and_then(Value::as_str).is_some())
	}

	async fn on_activate(&self) -> MkResult<()> {
		let mut defaults = Map::new();
		defaults.insert("trackingDisabled".into(), json!([]));
		self.settings.merge(self.slug(), &defaults).await?;
		Ok(())
	}

	async fn check_service_entity_access(&self, auth: &AuthCtx) -> MkResult<bool> {
		let blob = self.blob().await?;
		let owner = blob.get("ownerID").and_then(Value::as_i64);
		if owner == Some(auth.user_id.0) {
			return Ok(true);
		}
		let shared = blob
			.get("sharedWith")
			.and_then(Value::as_array)
			.is_some_and(|users| users.iter().any(|user| user.as_i64() == Some(auth.user_id.0)));
		Ok(shared)
	}

	async fn get_data(
		&self,
		_auth: &AuthCtx,
		datapoint: &str,
		params: &Map<String, Value>,
	) -> MkResult<Value> {
		match datapoint {
			"notifications" => Ok(json!([
				{
					"id": "analytics-setup-complete",
					"title": "Analytics is receiving data",
				}
			])),
			"report" => {
				let metric =
					params.get("metric").and_then(Value::as_str).unwrap_or("pageviews");
				Ok(json!({
					"metric": metric,
					"rows": [
						{ "date": "2026-08-01", "value": 1284 },
						{ "date": "2026-08-02", "value": 1391 },
					],
				}))
			}
			_ => Err(Error::UnknownDatapoint {
				slug: self.descriptor.slug.clone(),
				datapoint: datapoint.into(),
			}),
		}
	}

	async fn set_data(
		&self,
		_auth: &AuthCtx,
		datapoint: &str,
		data: &Map<String, Value>,
	) -> MkResult<Value> {
		match datapoint {
			"goal" => {
				let Some(goal) = data.get("goal") else {
					return Err(Error::Validation("goal is required".into()));
				};
				let mut patch = Map::new();
				patch.insert("goal".into(), goal.clone());
				self.settings.merge(self.slug(), &patch).await
			}
			_ => Err(Error::UnknownDatapoint {
				slug: self.descriptor.slug.clone(),
				datapoint: datapoint.into(),
			}),
		}
	}
}

// Audience //
//**********//
pub struct AudienceModule {
	descriptor: ModuleDescriptor,
}

impl AudienceModule {
	pub fn new() -> Self {
		Self {
			descriptor: ModuleDescriptor::builder("audience", "Audience Segments")
				.description("Groups visitors into configurable audience segments")
				.homepage("https://modkit.dev/modules/audience")
				.order(20)
				.dependency("analytics")
				.with_settings()
				.build(),
		}
	}
}

#[async_trait]
impl Module for AudienceModule {
	fn descriptor(&self) -> &ModuleDescriptor {
		&self.descriptor
	}
}

// Pagespeed //
//***********//
pub struct PagespeedModule {
	descriptor: ModuleDescriptor,
}

impl PagespeedModule {
	pub fn new() -> Self {
		Self {
			descriptor: ModuleDescriptor::builder("pagespeed", "PageSpeed Insights")
				.description("Performance scores for the site's pages")
				.homepage("https://modkit.dev/modules/pagespeed")
				.order(30)
				.shareable()
				.build(),
		}
	}
}

#[async_trait]
impl Module for PagespeedModule {
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

// vim: ts=4
