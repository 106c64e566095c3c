//! App state type

use std::sync::Arc;

use modkit_types::access::{AccessChecker, Authenticator, UserDirectory};
use modkit_types::settings_adapter::SettingsAdapter;

use crate::extensions::Extensions;
use crate::prelude::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct AppState {
	pub opts: AppBuilderOpts,

	pub settings_adapter: Arc<dyn SettingsAdapter>,
	pub access_checker: Arc<dyn AccessChecker>,
	pub user_directory: Arc<dyn UserDirectory>,
	pub authenticator: Arc<dyn Authenticator>,

	// Type-erased extension map for feature-specific state
	pub extensions: Extensions,
}

impl AppState {
	/// Get a registered extension by type. Returns error if not found.
	pub fn ext<T: Send + Sync + 'static>(&self) -> MkResult<&T> {
		self.extensions.require::<T>()
	}

	/// Capability gate: `Ok(())` when the caller holds `capability`, the
	/// permission-denied error otherwise.
	pub async fn require(&self, auth: &AuthCtx, capability: Capability) -> MkResult<()> {
		if self.access_checker.can(auth, capability).await {
			Ok(())
		} else {
			Err(Error::PermissionDenied)
		}
	}
}

impl std::fmt::Debug for AppState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AppState").field("opts", &self.opts).finish()
	}
}

pub type App = Arc<AppState>;

/// Collaborator adapters collected by the builder before the app exists.
pub struct Collaborators {
	pub settings_adapter: Option<Arc<dyn SettingsAdapter>>,
	pub access_checker: Option<Arc<dyn AccessChecker>>,
	pub user_directory: Option<Arc<dyn UserDirectory>>,
	pub authenticator: Option<Arc<dyn Authenticator>>,
}

#[derive(Debug)]
pub struct AppBuilderOpts {
	pub listen: Box<str>,
}

// vim: ts=4
