//! The module trait: one pluggable feature unit.
//!
//! Implementations carry their own collaborator handles (settings adapter,
//! service clients) injected at construction; trait methods receive only the
//! per-request context they need. The registry and controller consult the
//! descriptor's capability flags before calling the optional operations, so
//! the defaults here simply refuse.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::descriptor::ModuleDescriptor;
use crate::prelude::*;

#[async_trait]
pub trait Module: Send + Sync {
	fn descriptor(&self) -> &ModuleDescriptor;

	fn slug(&self) -> &str {
		&self.descriptor().slug
	}

	/// Whether required setup (settings, service link) is complete.
	/// Failures are treated as "not connected" by the registry, never
	/// propagated.
	async fn is_connected(&self) -> MkResult<bool> {
		Ok(true)
	}

	/// Activation hook, invoked after the activation has been persisted.
	async fn on_activate(&self) -> MkResult<()> {
		Ok(())
	}

	/// Deactivation hook, invoked after the deactivation has been
	/// persisted. Errors are logged and discarded.
	async fn on_deactivate(&self) -> MkResult<()> {
		Ok(())
	}

	/// Whether the caller may access the module's service entity. Only
	/// called when the descriptor declares `has_service_entity`; results
	/// and errors pass through the gateway verbatim.
	async fn check_service_entity_access(&self, _auth: &AuthCtx) -> MkResult<bool> {
		Err(Error::NotCheckable(self.descriptor().slug.clone()))
	}

	/// Named datapoint read.
	async fn get_data(
		&self,
		_auth: &AuthCtx,
		datapoint: &str,
		_params: &Map<String, Value>,
	) -> MkResult<Value> {
		Err(Error::UnknownDatapoint {
			slug: self.descriptor().slug.clone(),
			datapoint: datapoint.into(),
		})
	}

	/// Named datapoint write.
	async fn set_data(
		&self,
		_auth: &AuthCtx,
		datapoint: &str,
		_data: &Map<String, Value>,
	) -> MkResult<Value> {
		Err(Error::UnknownDatapoint {
			slug: self.descriptor().slug.clone(),
			datapoint: datapoint.into(),
		})
	}
}

// vim: ts=4
