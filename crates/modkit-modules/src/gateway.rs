//! Service access gateway: may the caller touch a module's remote-service
//! data, and is a module's ownership recoverable.
//!
//! Read-only over the registry. Entity-backed modules answer the access
//! question themselves; their result or error passes through verbatim.

use std::sync::Arc;

use modkit_types::access::UserDirectory;

use crate::prelude::*;
use crate::registry::ModuleRegistry;

pub struct AccessGateway {
	registry: Arc<ModuleRegistry>,
	users: Arc<dyn UserDirectory>,
}

impl AccessGateway {
	pub fn new(registry: Arc<ModuleRegistry>, users: Arc<dyn UserDirectory>) -> Self {
		Self { registry, users }
	}

	/// Whether `auth` may access the module's service-backed data.
	///
	/// Unknown slugs and unconnected modules fail; modules without a
	/// service entity are accessible exactly when they are shareable.
	pub async fn check_access(&self, slug: &str, auth: &AuthCtx) -> MkResult<bool> {
		let module = self.registry.get(slug)?;
		if !self.registry.is_connected(slug).await {
			return Err(Error::NotConnected(slug.into()));
		}

		let descriptor = module.descriptor();
		if !descriptor.has_service_entity {
			if descriptor.shareable {
				return Ok(true);
			}
			return Err(Error::NotCheckable(slug.into()));
		}

		module.check_service_entity_access(auth).await
	}

	/// A module is recoverable when it is shareable, owner-bearing, has an
	/// owner on record, and that owner no longer holds valid credentials.
	pub async fn is_recoverable(&self, slug: &str) -> MkResult<bool> {
		let descriptor = self.registry.descriptor(slug)?;
		if !descriptor.shareable || !descriptor.has_owner {
			return Ok(false);
		}
		let Some(owner) = self.registry.owner_id(slug).await? else {
			return Ok(false);
		};
		Ok(!self.users.has_valid_credentials(owner).await?)
	}

	/// Owner details for listings: id plus login resolved through the
	/// user directory.
	pub async fn owner_info(&self, slug: &str) -> MkResult<Option<modkit_types::types::OwnerInfo>> {
		let Some(owner) = self.registry.owner_id(slug).await? else {
			return Ok(None);
		};
		let login = self.users.login(owner).await.unwrap_or_else(|err| {
			warn!(module = slug, error = %err, "User directory lookup failed");
			None
		});
		Ok(Some(modkit_types::types::OwnerInfo { id: owner, login }))
	}
}

impl std::fmt::Debug for AccessGateway {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AccessGateway").finish()
	}
}

// vim: ts=4
