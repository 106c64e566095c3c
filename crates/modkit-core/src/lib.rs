//! Core infrastructure for the Modkit platform.
//!
//! Holds the shared application state, the auth middleware, and the request
//! extractors used by feature crates. Feature-specific state (such as the
//! module registry) is attached through the type-erased extension map so
//! this crate stays decoupled from feature crates.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod extensions;
pub mod extract;
pub mod middleware;
pub mod prelude;

pub use app::{App, AppBuilderOpts, AppState, Collaborators};
pub use extract::{Auth, OptionalAuth};

// vim: ts=4
