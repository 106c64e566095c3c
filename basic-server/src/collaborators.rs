//! Demo collaborator implementations: static tokens, role-based
//! capabilities, and a fixed user directory.

use std::collections::HashMap;

use async_trait::async_trait;

use modkit::access::{AccessChecker, AuthCtx, Authenticator, Capability, UserDirectory};
use modkit::error::{Error, MkResult};
use modkit::types::UserId;

/// One demo user: token, identity, roles, credential validity.
#[derive(Clone, Debug)]
pub struct DemoUser {
	pub token: &'static str,
	pub user_id: UserId,
	pub login: &'static str,
	pub roles: &'static [&'static str],
	pub credentials_valid: bool,
}

pub const USERS: &[DemoUser] = &[
	DemoUser {
		token: "admin-token",
		user_id: UserId(1),
		login: "admin",
		roles: &["admin"],
		credentials_valid: true,
	},
	DemoUser {
		token: "editor-token",
		user_id: UserId(2),
		login: "editor",
		roles: &["editor"],
		credentials_valid: true,
	},
	// Stale owner: still on record, credentials revoked
	DemoUser {
		token: "ghost-token",
		user_id: UserId(3),
		login: "ghost",
		roles: &["editor"],
		credentials_valid: false,
	},
];

#[derive(Debug, Default)]
pub struct StaticAuthenticator;

#[async_trait]
impl Authenticator for StaticAuthenticator {
	async fn authenticate(&self, token: &str) -> MkResult<AuthCtx> {
		USERS
			.iter()
			.find(|user| user.token == token)
			.map(|user| AuthCtx {
				user_id: user.user_id,
				login: user.login.into(),
				roles: user.roles.iter().map(|role| Box::from(*role)).collect(),
			})
			.ok_or(Error::PermissionDenied)
	}
}

/// Role-to-capability mapping: admins hold everything, editors manage
/// options and read insights, everyone authenticated may view.
#[derive(Debug, Default)]
pub struct RoleAccessChecker;

#[async_trait]
impl AccessChecker for RoleAccessChecker {
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

#[derive(Debug, Default)]
pub struct StaticUserDirectory;

impl StaticUserDirectory {
	fn users() -> HashMap<UserId, &'static DemoUser> {
		USERS.iter().map(|user| (user.user_id, user)).collect()
	}
}

#[async_trait]
impl UserDirectory for StaticUserDirectory {
	async fn login(&self, user_id: UserId) -> MkResult<Option<Box<str>>> {
		Ok(Self::users().get(&user_id).map(|user| user.login.into()))
	}

	async fn has_valid_credentials(&self, user_id: UserId) -> MkResult<bool> {
		Ok(Self::users().get(&user_id).is_some_and(|user| user.credentials_valid))
	}
}

// vim: ts=4
