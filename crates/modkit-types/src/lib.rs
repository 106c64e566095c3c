//! Shared types, collaborator traits, and error types for the Modkit platform.
//!
//! This crate contains the foundational types shared between the core
//! crates and all adapter implementations. Extracting these into a
//! separate crate allows adapter crates to compile in parallel with the
//! platform's feature modules.

pub mod access;
pub mod error;
pub mod extract;
pub mod prelude;
pub mod settings_adapter;
pub mod types;

// vim: ts=4
