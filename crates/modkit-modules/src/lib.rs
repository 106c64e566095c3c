//! Module subsystem: catalog, dependency-aware activation, access gateway,
//! and the module API endpoints.
//!
//! The registry is the sole mutator of activation state; the resolver and
//! the gateway are read-only over it. Handlers translate requests into
//! registry/resolver/gateway calls behind capability gates.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod descriptor;
pub mod gateway;
pub mod handler;
pub mod module;
pub mod perm;
pub mod registry;
pub mod resolver;

mod prelude;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use prelude::*;

pub use descriptor::ModuleDescriptor;
pub use gateway::AccessGateway;
pub use module::Module;
pub use registry::{ModuleRegistry, RegistryBuilder};

/// Attach the module subsystem state to the app extensions.
pub fn init(
	extensions: &mut modkit_core::extensions::Extensions,
	registry: Arc<ModuleRegistry>,
	gateway: AccessGateway,
) {
	extensions.insert(registry);
	extensions.insert(gateway);
}

/// Explicit route table of the module API. The facade nests this under
/// `/api/modules`.
pub fn router() -> Router<App> {
	Router::new()
		.route("/list", get(handler::list_modules))
		.route("/activation", post(handler::set_activation))
		.route("/info", get(handler::module_info))
		.route("/check-access", post(handler::check_access))
		.route("/recover-module", post(handler::recover_module))
		.route("/{slug}/notifications", get(handler::get_notifications))
		.route("/{slug}/settings", get(handler::get_settings).post(handler::set_settings))
		.route("/{slug}/{datapoint}", get(handler::get_datapoint).post(handler::set_datapoint))
}

// vim: ts=4
