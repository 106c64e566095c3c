//! Module registry: catalog plus the activation state machine.
//!
//! Built once at bootstrap through [`RegistryBuilder`], which validates the
//! catalog (duplicate slugs, unknown dependencies, cycles) so integrity
//! faults surface as configuration errors, never at request time. The
//! activation list lives in the settings store under a reserved key and is
//! cached behind a read lock; every mutation serializes on a single
//! registry-wide mutex, held across a whole cascade.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde_json::{json, Map, Value};
use tokio::sync::{Mutex, RwLock};

use modkit_types::settings_adapter::SettingsAdapter;

use crate::descriptor::ModuleDescriptor;
use crate::module::Module;
use crate::prelude::*;
use crate::resolver::DependencyGraph;

/// Reserved settings-store key holding `{"active": [...]}`.
pub const ACTIVE_MODULES_KEY: &str = "core.modules";

/// Settings-blob key recording the owning user of a module.
pub const OWNER_ID_KEY: &str = "ownerID";

pub struct ModuleRegistry {
	/// Sorted by (order, slug)
	modules: Box<[Arc<dyn Module>]>,
	index: HashMap<Box<str>, usize>,
	graph: DependencyGraph,
	settings: Arc<dyn SettingsAdapter>,
	active: RwLock<BTreeSet<Box<str>>>,
	/// Serializes activate/deactivate/cascade; reads only take `active`
	mutation: Mutex<()>,
}

impl ModuleRegistry {
	/// All known modules, sorted by (order, slug), regardless of state.
	pub fn list_available(&self) -> &[Arc<dyn Module>] {
		&self.modules
	}

	pub fn get(&self, slug: &str) -> MkResult<&Arc<dyn Module>> {
		self.index
			.get(slug)
			.map(|idx| &self.modules[*idx])
			.ok_or_else(|| Error::NotFound(slug.into()))
	}

	pub fn descriptor(&self, slug: &str) -> MkResult<&ModuleDescriptor> {
		Ok(self.get(slug)?.descriptor())
	}

	pub fn graph(&self) -> &DependencyGraph {
		&self.graph
	}

	/// Whether the module reports active. Force-active modules always do;
	/// unknown slugs never do.
	pub async fn is_active(&self, slug: &str) -> bool {
		match self.get(slug) {
			Ok(module) if module.descriptor().force_active => true,
			Ok(_) => self.active.read().await.contains(slug),
			Err(_) => false,
		}
	}

	/// Whether the module's own setup check reports complete. The module
	/// call must not take the registry down: failures read as `false`.
	pub async fn is_connected(&self, slug: &str) -> bool {
		match self.get(slug) {
			Ok(module) => module.is_connected().await.unwrap_or(false),
			Err(_) => false,
		}
	}

	/// Activate one module. No-op when already active or force-active.
	/// Every direct dependency must already be active; this registry never
	/// activates dependencies implicitly.
	pub async fn activate(&self, slug: &str) -> MkResult<()> {
		let module = self.get(slug)?;
		let _guard = self.mutation.lock().await;

		if module.descriptor().force_active || self.active.read().await.contains(slug) {
			return Ok(());
		}
		for dependency in self.graph.dependencies_of(slug) {
			if !self.is_active(dependency).await {
				return Err(Error::UnmetDependency {
					slug: slug.into(),
					dependency: dependency.clone(),
				});
			}
		}

		self.persist_insert(slug).await?;
		info!(module = slug, "Module activated");

		if let Err(err) = module.on_activate().await {
			warn!(module = slug, error = %err, "Activation hook failed");
			return Err(Error::ActivationHookFailed {
				slug: slug.into(),
				message: err.to_string().into(),
			});
		}
		Ok(())
	}

	/// Deactivate one module without cascading. Callers that need cascade
	/// semantics consult [`ModuleRegistry::active_dependants`] or use
	/// [`ModuleRegistry::deactivate_cascade`].
	pub async fn deactivate(&self, slug: &str) -> MkResult<()> {
		let descriptor = self.descriptor(slug)?;
		if descriptor.force_active {
			return Err(Error::ForceActive(slug.into()));
		}
		let _guard = self.mutation.lock().await;
		self.deactivate_step(slug).await
	}

	/// Transitive dependants of `slug` that are currently active, in
	/// breadth-first order.
	pub async fn active_dependants(&self, slug: &str) -> MkResult<Vec<Box<str>>> {
		self.get(slug)?;
		let order = self.graph.transitive_dependants(slug)?;
		let active = self.active.read().await;
		Ok(order.into_iter().filter(|dep| active.contains(dep)).collect())
	}

	/// Deactivate `slug` and, first, every currently active transitive
	/// dependant — farthest dependants first, so the dependency invariant
	/// holds after every step. One mutation-lock acquisition covers the
	/// whole cascade. A failing step aborts the operation; dependants
	/// already deactivated stay deactivated.
	pub async fn deactivate_cascade(&self, slug: &str) -> MkResult<Vec<Box<str>>> {
		let descriptor = self.descriptor(slug)?;
		if descriptor.force_active {
			return Err(Error::ForceActive(slug.into()));
		}
		let _guard = self.mutation.lock().await;

		let order = self.graph.transitive_dependants(slug)?;
		let mut deactivated: Vec<Box<str>> = Vec::new();
		for dependant in order.iter().rev() {
			if !self.active.read().await.contains(dependant.as_ref()) {
				continue;
			}
			if let Err(err) = self.deactivate_step(dependant).await {
				warn!(module = slug, dependant = %dependant, error = %err, "Cascade step failed");
				return Err(Error::CannotDeactivateDependant {
					slug: slug.into(),
					dependant: dependant.clone(),
					deactivated: deactivated.into_boxed_slice(),
				});
			}
			deactivated.push(dependant.clone());
		}

		self.deactivate_step(slug).await?;
		Ok(deactivated)
	}

	/// Owning user recorded in the module's settings blob, when the module
	/// supports ownership.
	pub async fn owner_id(&self, slug: &str) -> MkResult<Option<UserId>> {
		let descriptor = self.descriptor(slug)?;
		if !descriptor.has_owner {
			return Ok(None);
		}
		let blob = self.settings.read(slug).await?;
		Ok(blob
			.as_ref()
			.and_then(|blob| blob.get(OWNER_ID_KEY))
			.and_then(Value::as_i64)
			.map(UserId))
	}

	/// Current settings blob of a settings-bearing module. The registry
	/// never inspects the contents.
	pub async fn read_settings(&self, slug: &str) -> MkResult<Value> {
		let descriptor = self.descriptor(slug)?;
		if !descriptor.has_settings {
			return Err(Error::UnsupportedSettings(slug.into()));
		}
		Ok(self.settings.read(slug).await?.unwrap_or_else(|| json!({})))
	}

	/// Shallow-merge a partial update into a settings-bearing module's
	/// blob and return the blob after the merge.
	pub async fn merge_settings(&self, slug: &str, patch: &Map<String, Value>) -> MkResult<Value> {
		let descriptor = self.descriptor(slug)?;
		if !descriptor.has_settings {
			return Err(Error::UnsupportedSettings(slug.into()));
		}
		self.settings.merge(slug, patch).await
	}

	/// One deactivation: persist the removal, then run the module's hook
	/// best-effort. Idempotent for already-inactive modules. Caller holds
	/// the mutation lock.
	async fn deactivate_step(&self, slug: &str) -> MkResult<()> {
		if !self.active.read().await.contains(slug) {
			return Ok(());
		}
		self.persist_remove(slug).await?;
		info!(module = slug, "Module deactivated");

		if let Ok(module) = self.get(slug) {
			if let Err(err) = module.on_deactivate().await {
				warn!(module = slug, error = %err, "Deactivation hook failed");
			}
		}
		Ok(())
	}

	async fn persist_insert(&self, slug: &str) -> MkResult<()> {
		let mut next = self.active.read().await.clone();
		next.insert(slug.into());
		self.persist_active(next).await
	}

	async fn persist_remove(&self, slug: &str) -> MkResult<()> {
		let mut next = self.active.read().await.clone();
		next.remove(slug);
		self.persist_active(next).await
	}

	/// Write the activation list to the store first; the in-memory cache
	/// only follows a successful write.
	async fn persist_active(&self, next: BTreeSet<Box<str>>) -> MkResult<()> {
		let mut patch = Map::new();
		patch.insert("active".into(), json!(next));
		self.settings.merge(ACTIVE_MODULES_KEY, &patch).await?;
		*self.active.write().await = next;
		Ok(())
	}
}

impl std::fmt::Debug for ModuleRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ModuleRegistry").field("modules", &self.index.len()).finish()
	}
}

/// Explicit one-shot catalog registration, called at bootstrap.
#[derive(Default)]
pub struct RegistryBuilder {
	modules: Vec<Arc<dyn Module>>,
}

impl RegistryBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(mut self, module: Arc<dyn Module>) -> Self {
		self.modules.push(module);
		self
	}

	/// Validate the catalog, load the persisted activation list, and
	/// produce the registry. All integrity faults are configuration
	/// errors.
	pub async fn build(self, settings: Arc<dyn SettingsAdapter>) -> MkResult<ModuleRegistry> {
		let mut modules = self.modules;
		modules.sort_by(|a, b| {
			let (a, b) = (a.descriptor(), b.descriptor());
			a.order.cmp(&b.order).then_with(|| a.slug.cmp(&b.slug))
		});

		let mut index: HashMap<Box<str>, usize> = HashMap::new();
		for (idx, module) in modules.iter().enumerate() {
			let descriptor = module.descriptor();
			if descriptor.slug.as_ref() == ACTIVE_MODULES_KEY {
				return Err(Error::Config(
					format!("module slug {} collides with a reserved key", descriptor.slug).into(),
				));
			}
			if index.insert(descriptor.slug.clone(), idx).is_some() {
				return Err(Error::Config(
					format!("duplicate module slug {}", descriptor.slug).into(),
				));
			}
			if descriptor.has_owner && !descriptor.has_settings {
				return Err(Error::Config(
					format!("module {} declares an owner but no settings", descriptor.slug).into(),
				));
			}
		}

		let graph = DependencyGraph::build(modules.iter().map(|module| module.descriptor()))?;
		graph.verify_acyclic()?;
		for module in &modules {
			let descriptor = module.descriptor();
			if !descriptor.force_active {
				continue;
			}
			for dependency in descriptor.dependencies.iter() {
				let dep_idx = index[dependency.as_ref()];
				if !modules[dep_idx].descriptor().force_active {
					return Err(Error::Config(
						format!(
							"force-active module {} depends on deactivatable module {}",
							descriptor.slug, dependency
						)
						.into(),
					));
				}
			}
		}

		let active = load_active(&*settings, &modules, &index, &graph).await?;
		info!(modules = modules.len(), active = active.len(), "Module registry built");

		Ok(ModuleRegistry {
			modules: modules.into_boxed_slice(),
			index,
			graph,
			settings,
			active: RwLock::new(active),
			mutation: Mutex::new(()),
		})
	}
}

/// Read the persisted activation list, dropping unknown slugs and healing
/// entries whose dependencies are not in the set.
async fn load_active(
	settings: &dyn SettingsAdapter,
	modules: &[Arc<dyn Module>],
	index: &HashMap<Box<str>, usize>,
	graph: &DependencyGraph,
) -> MkResult<BTreeSet<Box<str>>> {
	let is_force_active =
		|slug: &str| index.get(slug).is_some_and(|idx| modules[*idx].descriptor().force_active);

	let blob = settings.read(ACTIVE_MODULES_KEY).await?;
	let stored = blob
		.as_ref()
		.and_then(|blob| blob.get("active"))
		.and_then(Value::as_array)
		.map(Vec::as_slice)
		.unwrap_or(&[]);

	let mut active: BTreeSet<Box<str>> = BTreeSet::new();
	for value in stored {
		match value.as_str() {
			Some(slug) if index.contains_key(slug) => {
				active.insert(slug.into());
			}
			Some(slug) => warn!(module = slug, "Dropping unknown module from activation list"),
			None => warn!("Dropping malformed activation list entry"),
		}
	}

	// Heal a store that violates the dependency invariant
	loop {
		let broken: Vec<Box<str>> = active
			.iter()
			.filter(|slug| {
				graph
					.dependencies_of(slug)
					.iter()
					.any(|dep| !active.contains(dep) && !is_force_active(dep))
			})
			.cloned()
			.collect();
		if broken.is_empty() {
			break;
		}
		for slug in broken {
			warn!(module = %slug, "Dropping active module with inactive dependency");
			active.remove(&slug);
		}
	}
	Ok(active)
}

// vim: ts=4
