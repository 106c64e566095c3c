//! Type-erased extension map for AppState.
//!
//! Feature crates attach their state here at bootstrap so the core
//! AppState struct never names feature-specific types. The map is frozen
//! once the app is built; lookups are read-only afterwards.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;

use crate::prelude::*;

#[derive(Default)]
pub struct Extensions {
	map: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Extensions {
	pub fn new() -> Self {
		Self::default()
	}

	/// Attach a value, replacing any previous value of the same type.
	pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) {
		self.map.insert(TypeId::of::<T>(), Box::new(value));
	}

	/// Builder-style variant of [`Extensions::insert`].
	pub fn with<T: Send + Sync + 'static>(mut self, value: T) -> Self {
		self.insert(value);
		self
	}

	pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
		self.map.get(&TypeId::of::<T>())?.downcast_ref::<T>()
	}

	/// Like [`Extensions::get`], but a missing registration is a bootstrap
	/// bug and surfaces as an internal error.
	pub fn require<T: Send + Sync + 'static>(&self) -> MkResult<&T> {
		self.get::<T>()
			.ok_or_else(|| Error::Internal(format!("Extension {} not registered", type_name::<T>()).into()))
	}
}

impl std::fmt::Debug for Extensions {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Extensions").field("len", &self.map.len()).finish()
	}
}


// vim: ts=4
