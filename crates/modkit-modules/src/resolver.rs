//! Pure dependency queries over the immutable catalog.
//!
//! The dependants relation is the computed inverse of the declared
//! dependencies; it is derived once at build time and never stored in the
//! catalog itself. All traversals are visited-set guarded so a
//! misconfigured (cyclic) catalog fails fast instead of looping.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::descriptor::ModuleDescriptor;
use crate::prelude::*;

#[derive(Debug, Default)]
pub struct DependencyGraph {
	/// slug -> declared direct dependencies, declaration order
	dependencies: BTreeMap<Box<str>, Box<[Box<str>]>>,
	/// slug -> direct dependants, sorted
	dependants: BTreeMap<Box<str>, Box<[Box<str>]>>,
}

impl DependencyGraph {
	/// Build the graph and its inverse relation. Dependencies on slugs not
	/// present in the catalog are configuration errors.
	pub fn build<'a>(
		descriptors: impl IntoIterator<Item = &'a ModuleDescriptor>,
	) -> MkResult<Self> {
		let mut dependencies = BTreeMap::new();
		let mut dependants: BTreeMap<Box<str>, BTreeSet<Box<str>>> = BTreeMap::new();

		for descriptor in descriptors {
			dependencies.insert(descriptor.slug.clone(), descriptor.dependencies.clone());
			dependants.entry(descriptor.slug.clone()).or_default();
		}
		for (slug, deps) in &dependencies {
			for dep in deps.iter() {
				if !dependencies.contains_key(dep) {
					return Err(Error::Config(
						format!("module {} depends on unknown module {}", slug, dep).into(),
					));
				}
				if let Some(entry) = dependants.get_mut(dep) {
					entry.insert(slug.clone());
				}
			}
		}

		let dependants = dependants
			.into_iter()
			.map(|(slug, set)| (slug, set.into_iter().collect()))
			.collect();
		Ok(Self { dependencies, dependants })
	}

	pub fn contains(&self, slug: &str) -> bool {
		self.dependencies.contains_key(slug)
	}

	/// Direct dependencies in declaration order. Empty for unknown slugs.
	pub fn dependencies_of(&self, slug: &str) -> &[Box<str>] {
		self.dependencies.get(slug).map_or(&[], |deps| deps.as_ref())
	}

	/// Direct dependants (modules listing `slug` among their
	/// dependencies). Empty for unknown slugs.
	pub fn dependants_of(&self, slug: &str) -> &[Box<str>] {
		self.dependants.get(slug).map_or(&[], |deps| deps.as_ref())
	}

	/// Transitive dependants in breadth-first order from `slug`. Fails
	/// with the cyclic-dependency error when `slug` is reachable from
	/// itself through the dependants relation.
	pub fn transitive_dependants(&self, slug: &str) -> MkResult<Vec<Box<str>>> {
		let mut visited: BTreeSet<&str> = BTreeSet::new();
		let mut order: Vec<Box<str>> = Vec::new();
		let mut queue: VecDeque<&str> = VecDeque::new();
		queue.push_back(slug);

		while let Some(current) = queue.pop_front() {
			for dependant in self.dependants_of(current) {
				if dependant.as_ref() == slug {
					return Err(Error::CyclicDependency(slug.into()));
				}
				if visited.insert(dependant.as_ref()) {
					order.push(dependant.clone());
					queue.push_back(dependant.as_ref());
				}
			}
		}
		Ok(order)
	}

	/// Catalog-wide integrity check: every module must be free of
	/// dependency cycles.
	pub fn verify_acyclic(&self) -> MkResult<()> {
		for slug in self.dependencies.keys() {
			self.transitive_dependants(slug)?;
		}
		Ok(())
	}
}


// vim: ts=4
