//! Capability model and the collaborator traits for authentication,
//! authorization, and user lookups.
//!
//! Permission evaluation itself lives outside this system: the platform only
//! asks whether the current caller holds a named capability and acts on the
//! boolean answer.

use async_trait::async_trait;

use crate::error::MkResult;
use crate::types::UserId;

/// Context struct for an authenticated caller.
#[derive(Clone, Debug)]
pub struct AuthCtx {
	pub user_id: UserId,
	pub login: Box<str>,
	pub roles: Box<[Box<str>]>,
}

/// Named capabilities the request controller gates on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
	/// May complete the authentication flow
	Authenticate,
	/// May perform initial platform setup
	Setup,
	/// May view the main dashboard
	ViewDashboard,
	/// May view the pre-setup splash
	ViewSplash,
	/// May view per-module insight data
	ViewInsights,
	/// May manage platform options
	ManageOptions,
	/// May enumerate users (gates owner details in module listings)
	ListUsers,
}

impl Capability {
	pub fn as_str(self) -> &'static str {
		match self {
			Capability::Authenticate => "authenticate",
			Capability::Setup => "setup",
			Capability::ViewDashboard => "view_dashboard",
			Capability::ViewSplash => "view_splash",
			Capability::ViewInsights => "view_insights",
			Capability::ManageOptions => "manage_options",
			Capability::ListUsers => "list_users",
		}
	}
}

impl std::fmt::Display for Capability {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Evaluates whether a caller holds a capability. Pure and infallible; an
/// implementation that cannot decide must answer `false`.
#[async_trait]
pub trait AccessChecker: Send + Sync {
	async fn can(&self, auth: &AuthCtx, capability: Capability) -> bool;
}

/// Resolves user identities for owner display and ownership recovery.
#[async_trait]
pub trait UserDirectory: Send + Sync {
	/// Login name for a user id, `None` when the user is unknown.
	async fn login(&self, user_id: UserId) -> MkResult<Option<Box<str>>>;

	/// Whether the user still holds valid service credentials. A stale
	/// owner (this returning `false`) is what makes a module recoverable.
	async fn has_valid_credentials(&self, user_id: UserId) -> MkResult<bool>;
}

/// Resolves a bearer token into an authenticated caller context. Consumed
/// only by the transport-side auth middleware.
#[async_trait]
pub trait Authenticator: Send + Sync {
	async fn authenticate(&self, token: &str) -> MkResult<AuthCtx>;
}

// vim: ts=4
