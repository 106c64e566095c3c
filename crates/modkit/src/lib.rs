//! Modkit is a platform for orchestrating pluggable feature modules.
//!
//! # Features
//!
//! - Catalog of module descriptors with capability flags
//!     - settings-bearing, owner-bearing, shareable, service-entity-backed
//! - Dependency-aware activation
//!     - strict refusal on inactive dependencies
//!     - cascading deactivation of transitive dependants
//! - Service access gateway with ownership recovery
//! - Permission-gated module API with structured error envelopes
//!
//! Persistence and permission evaluation are pluggable: implement the
//! adapter traits from [`modkit_types`] and hand them to the [`AppBuilder`].

// Re-export shared types and adapter traits from modkit-types
pub use modkit_types::access;
pub use modkit_types::error;
pub use modkit_types::extract;
pub use modkit_types::settings_adapter;
pub use modkit_types::types;

// Feature crate re-exports
pub use modkit_core::extensions;
pub use modkit_core::middleware;
pub use modkit_modules as modules;
pub use modkit_modules::{AccessGateway, Module, ModuleDescriptor, ModuleRegistry, RegistryBuilder};

// Local modules
pub mod app;
pub mod prelude;
pub mod routes;

pub use app::AppBuilder;

// vim: ts=4
