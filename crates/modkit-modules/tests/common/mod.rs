//! Shared fixtures: in-memory settings adapter and a configurable stub
//! module.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};

use modkit_modules::{Module, ModuleDescriptor};
use modkit_types::access::{AuthCtx, UserDirectory};
use modkit_types::error::{Error, MkResult};
use modkit_types::settings_adapter::{merge_blob, SettingsAdapter};
use modkit_types::types::UserId;

// MemorySettingsAdapter //
//***********************//
#[derive(Default)]
pub struct MemorySettingsAdapter {
	blobs: Mutex<HashMap<String, Value>>,
	/// `Some(n)`: the next `n` merges succeed, later ones fail
	fail_after_writes: Mutex<Option<usize>>,
}

impl MemorySettingsAdapter {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn fail_after_writes(&self, writes: usize) {
		*self.fail_after_writes.lock().unwrap() = Some(writes);
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
		if let Some(left) = self.fail_after_writes.lock().unwrap().as_mut() {
			if *left == 0 {
				return Err(Error::Storage("write refused".into()));
			}
			*left -= 1;
		}
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

// TestModule //
//************//
pub struct TestModule {
	descriptor: ModuleDescriptor,
	connected: MkResult<bool>,
	activation_hook: Option<Error>,
	entity_access: Option<MkResult<bool>>,
	notifications: Option<MkResult<Value>>,
	pub activations: AtomicUsize,
	pub deactivations: AtomicUsize,
}

impl TestModule {
	pub fn new(descriptor: ModuleDescriptor) -> Self {
		Self {
			descriptor,
			connected: Ok(true),
			activation_hook: None,
			entity_access: None,
			notifications: None,
			activations: AtomicUsize::new(0),
			deactivations: AtomicUsize::new(0),
		}
	}

	pub fn connected(mut self, connected: MkResult<bool>) -> Self {
		self.connected = connected;
		self
	}

	pub fn failing_activation_hook(mut self, error: Error) -> Self {
		self.activation_hook = Some(error);
		self
	}

	pub fn entity_access(mut self, access: MkResult<bool>) -> Self {
		self.entity_access = Some(access);
		self
	}

	pub fn notifications(mut self, notifications: MkResult<Value>) -> Self {
		self.notifications = Some(notifications);
		self
	}
}

#[async_trait]
impl Module for TestModule {
	fn descriptor(&self) -> &ModuleDescriptor {
		&self.descriptor
	}

	async fn is_connected(&self) -> MkResult<bool> {
		self.connected.clone()
	}

	async fn on_activate(&self) -> MkResult<()> {
		self.activations.fetch_add(1, Ordering::SeqCst);
		match &self.activation_hook {
			Some(error) => Err(error.clone()),
			None => Ok(()),
		}
	}

	async fn on_deactivate(&self) -> MkResult<()> {
		self.deactivations.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}

	async fn check_service_entity_access(&self, _auth: &AuthCtx) -> MkResult<bool> {
		match &self.entity_access {
			Some(access) => access.clone(),
			None => Err(Error::NotCheckable(self.descriptor.slug.clone())),
		}
	}

	async fn get_data(
		&self,
		_auth: &AuthCtx,
		datapoint: &str,
		_params: &Map<String, Value>,
	) -> MkResult<Value> {
		if datapoint == "notifications" {
			if let Some(notifications) = &self.notifications {
				return notifications.clone();
			}
		}
		Err(Error::UnknownDatapoint {
			slug: self.descriptor.slug.clone(),
			datapoint: datapoint.into(),
		})
	}
}

// StaticUsers //
//*************//
/// User directory where the listed ids hold *invalid* credentials.
#[derive(Default)]
pub struct StaticUsers {
	pub stale: Vec<UserId>,
}

#[async_trait]
impl UserDirectory for StaticUsers {
	async fn login(&self, user_id: UserId) -> MkResult<Option<Box<str>>> {
		Ok(Some(format!("user{}", user_id.0).into()))
	}

	async fn has_valid_credentials(&self, user_id: UserId) -> MkResult<bool> {
		Ok(!self.stale.contains(&user_id))
	}
}

pub fn auth(user_id: i64) -> AuthCtx {
	AuthCtx {
		user_id: UserId(user_id),
		login: format!("user{}", user_id).into(),
		roles: Box::from([Box::from("admin")]),
	}
}

// vim: ts=4
