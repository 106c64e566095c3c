//! Custom extractors for Modkit-specific data

// Re-export the extension-based extractors from modkit-types
pub use modkit_types::extract::{Auth, OptionalAuth};

// vim: ts=4
