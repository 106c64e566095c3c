//! Immutable module descriptors and their capability flags.
//!
//! Descriptors are constructed once at bootstrap from the catalog and never
//! mutated. Optional behaviors (settings, ownership, service entity,
//! sharing) are declared as capability flags here; nothing in the platform
//! inspects concrete module types.

use serde::Serialize;

/// Static description of one module in the catalog.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDescriptor {
	/// Unique identifier, also the settings-store key
	pub slug: Box<str>,
	/// Human-readable display name
	pub name: Box<str>,
	pub description: Box<str>,
	pub homepage: Box<str>,
	/// Internal modules have no UI of their own
	pub internal: bool,
	/// Display and tie-break priority for listings
	pub order: i32,
	/// Force-active modules always report active and refuse deactivation
	pub force_active: bool,
	/// Slugs of modules this module depends on, declared order
	pub dependencies: Box<[Box<str>]>,
	/// Supports per-user access sharing
	pub shareable: bool,
	/// Supports an owning-user concept (`ownerID` in its settings blob)
	pub has_owner: bool,
	/// Exposes a settings sub-resource
	pub has_settings: bool,
	/// Backed by an external service principal
	pub has_service_entity: bool,
}

impl ModuleDescriptor {
	pub fn builder(slug: impl Into<Box<str>>, name: impl Into<Box<str>>) -> DescriptorBuilder {
		DescriptorBuilder {
			slug: slug.into(),
			name: name.into(),
			description: "".into(),
			homepage: "".into(),
			internal: false,
			order: 0,
			force_active: false,
			dependencies: Vec::new(),
			shareable: false,
			has_owner: false,
			has_settings: false,
			has_service_entity: false,
		}
	}
}

#[derive(Debug)]
pub struct DescriptorBuilder {
	slug: Box<str>,
	name: Box<str>,
	description: Box<str>,
	homepage: Box<str>,
	internal: bool,
	order: i32,
	force_active: bool,
	dependencies: Vec<Box<str>>,
	shareable: bool,
	has_owner: bool,
	has_settings: bool,
	has_service_entity: bool,
}

impl DescriptorBuilder {
	pub fn description(mut self, description: impl Into<Box<str>>) -> Self {
		self.description = description.into();
		self
	}

	pub fn homepage(mut self, homepage: impl Into<Box<str>>) -> Self {
		self.homepage = homepage.into();
		self
	}

	pub fn internal(mut self) -> Self {
		self.internal = true;
		self
	}

	pub fn order(mut self, order: i32) -> Self {
		self.order = order;
		self
	}

	pub fn force_active(mut self) -> Self {
		self.force_active = true;
		self
	}

	pub fn dependency(mut self, slug: impl Into<Box<str>>) -> Self {
		self.dependencies.push(slug.into());
		self
	}

	pub fn shareable(mut self) -> Self {
		self.shareable = true;
		self
	}

	pub fn with_owner(mut self) -> Self {
		self.has_owner = true;
		self
	}

	pub fn with_settings(mut self) -> Self {
		self.has_settings = true;
		self
	}

	pub fn with_service_entity(mut self) -> Self {
		self.has_service_entity = true;
		self
	}

	pub fn build(self) -> ModuleDescriptor {
		ModuleDescriptor {
			slug: self.slug,
			name: self.name,
			description: self.description,
			homepage: self.homepage,
			internal: self.internal,
			order: self.order,
			force_active: self.force_active,
			dependencies: self.dependencies.into_boxed_slice(),
			shareable: self.shareable,
			has_owner: self.has_owner,
			has_settings: self.has_settings,
			has_service_entity: self.has_service_entity,
		}
	}
}


// vim: ts=4
