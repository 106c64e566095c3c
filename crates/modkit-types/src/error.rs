//! Platform error type and the structured error envelope.
//!
//! Every request surface response is either a success payload or the JSON
//! envelope `{"error": {"code", "message", "status", "data"?}}`. Codes are
//! stable machine-readable identifiers; statuses follow HTTP conventions but
//! the mapping to a concrete transport is the caller's concern.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub type MkResult<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
	/// Unknown module slug
	NotFound(Box<str>),
	/// Malformed request payload
	Validation(Box<str>),
	/// Capability check failed
	PermissionDenied,
	/// Registry-level refusal: a direct dependency is not active
	UnmetDependency { slug: Box<str>, dependency: Box<str> },
	/// Controller-level refusal naming the dependency's display name
	InactiveDependency { slug: Box<str>, dependency: Box<str>, dependency_name: Box<str> },
	/// Cascade deactivation failed partway; `deactivated` lists the
	/// dependants that were already deactivated and stay that way
	CannotDeactivateDependant {
		slug: Box<str>,
		dependant: Box<str>,
		deactivated: Box<[Box<str>]>,
	},
	/// Module is force-active and cannot be deactivated
	ForceActive(Box<str>),
	/// Module does not support settings
	UnsupportedSettings(Box<str>),
	/// Module does not support access sharing
	NotShareable(Box<str>),
	/// Module ownership is not in a recoverable state
	NotRecoverable(Box<str>),
	/// Module is not accessible by the current caller
	NotAccessible(Box<str>),
	/// Module setup has not been completed
	NotConnected(Box<str>),
	/// Module access cannot be checked
	NotCheckable(Box<str>),
	/// Activation hook failed after the state change was committed
	ActivationHookFailed { slug: Box<str>, message: Box<str> },
	/// A module transitively depends on itself (catalog integrity fault)
	CyclicDependency(Box<str>),
	/// Module does not implement the requested datapoint
	UnknownDatapoint { slug: Box<str>, datapoint: Box<str> },
	/// Invalid catalog or bootstrap configuration
	Config(Box<str>),
	/// Settings store failure
	Storage(Box<str>),
	/// Opaque passthrough of a module's own business error
	Module {
		code: Box<str>,
		message: Box<str>,
		status: u16,
		data: Option<serde_json::Value>,
	},
	Internal(Box<str>),
}

impl Error {
	/// Stable machine-readable error code.
	pub fn code(&self) -> &str {
		match self {
			Error::NotFound(_) => "E-MOD-NOT-FOUND",
			Error::Validation(_) => "E-MOD-VALIDATION",
			Error::PermissionDenied => "E-MOD-FORBIDDEN",
			Error::UnmetDependency { .. } => "E-MOD-UNMET-DEPENDENCY",
			Error::InactiveDependency { .. } => "E-MOD-INACTIVE-DEPENDENCY",
			Error::CannotDeactivateDependant { .. } => "E-MOD-CANNOT-DEACTIVATE-DEPENDANT",
			Error::ForceActive(_) => "E-MOD-FORCE-ACTIVE",
			Error::UnsupportedSettings(_) => "E-MOD-NO-SETTINGS",
			Error::NotShareable(_) => "E-MOD-NOT-SHAREABLE",
			Error::NotRecoverable(_) => "E-MOD-NOT-RECOVERABLE",
			Error::NotAccessible(_) => "E-MOD-NOT-ACCESSIBLE",
			Error::NotConnected(_) => "E-MOD-NOT-CONNECTED",
			Error::NotCheckable(_) => "E-MOD-NOT-CHECKABLE",
			Error::ActivationHookFailed { .. } => "E-MOD-ACTIVATION-HOOK",
			Error::CyclicDependency(_) => "E-MOD-CYCLIC-DEPENDENCY",
			Error::UnknownDatapoint { .. } => "E-MOD-UNKNOWN-DATAPOINT",
			Error::Config(_) => "E-MOD-CONFIG",
			Error::Storage(_) => "E-MOD-STORAGE",
			Error::Module { code, .. } => code,
			Error::Internal(_) => "E-MOD-INTERNAL",
		}
	}

	/// HTTP-style status associated with the error.
	pub fn status(&self) -> u16 {
		match self {
			Error::NotFound(_) | Error::NotShareable(_) => 404,
			Error::Validation(_)
			| Error::ForceActive(_)
			| Error::UnsupportedSettings(_)
			| Error::NotConnected(_)
			| Error::NotCheckable(_)
			| Error::UnknownDatapoint { .. } => 400,
			Error::PermissionDenied | Error::NotRecoverable(_) | Error::NotAccessible(_) => 403,
			Error::UnmetDependency { .. }
			| Error::InactiveDependency { .. }
			| Error::CannotDeactivateDependant { .. }
			| Error::ActivationHookFailed { .. }
			| Error::CyclicDependency(_)
			| Error::Config(_)
			| Error::Storage(_)
			| Error::Internal(_) => 500,
			Error::Module { status, .. } => *status,
		}
	}

	/// Structured detail payload, when the variant carries one.
	pub fn data(&self) -> Option<serde_json::Value> {
		match self {
			Error::UnmetDependency { slug, dependency }
			| Error::InactiveDependency { slug, dependency, .. } => {
				Some(json!({ "slug": slug, "dependency": dependency }))
			}
			Error::CannotDeactivateDependant { slug, dependant, deactivated } => {
				Some(json!({ "slug": slug, "dependant": dependant, "deactivated": deactivated }))
			}
			Error::ActivationHookFailed { slug, .. } => Some(json!({ "slug": slug })),
			Error::UnknownDatapoint { slug, datapoint } => {
				Some(json!({ "slug": slug, "datapoint": datapoint }))
			}
			Error::Module { data, .. } => data.clone(),
			_ => None,
		}
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::NotFound(slug) => write!(f, "Invalid module slug: {}", slug),
			Error::Validation(msg) => write!(f, "Invalid request: {}", msg),
			Error::PermissionDenied => write!(f, "Permission denied"),
			Error::UnmetDependency { slug, dependency } => {
				write!(f, "Module {} requires inactive dependency {}", slug, dependency)
			}
			Error::InactiveDependency { dependency_name, .. } => {
				write!(
					f,
					"Module cannot be activated because of inactive dependency {}",
					dependency_name
				)
			}
			Error::CannotDeactivateDependant { dependant, .. } => {
				write!(
					f,
					"Module cannot be deactivated because deactivation of dependant {} failed",
					dependant
				)
			}
			Error::ForceActive(slug) => {
				write!(f, "Module {} is always active and cannot be deactivated", slug)
			}
			Error::UnsupportedSettings(slug) => {
				write!(f, "Module {} does not support settings", slug)
			}
			Error::NotShareable(slug) => write!(f, "Module {} is not shareable", slug),
			Error::NotRecoverable(slug) => write!(f, "Module {} is not recoverable", slug),
			Error::NotAccessible(slug) => {
				write!(f, "Module {} is not accessible by current user", slug)
			}
			Error::NotConnected(slug) => write!(f, "Module {} is not connected", slug),
			Error::NotCheckable(slug) => write!(f, "Module {} access cannot be checked", slug),
			Error::ActivationHookFailed { slug, message } => {
				write!(f, "Activation hook of module {} failed: {}", slug, message)
			}
			Error::CyclicDependency(slug) => {
				write!(f, "Module {} transitively depends on itself", slug)
			}
			Error::UnknownDatapoint { slug, datapoint } => {
				write!(f, "Module {} has no datapoint {}", slug, datapoint)
			}
			Error::Config(msg) => write!(f, "Configuration error: {}", msg),
			Error::Storage(msg) => write!(f, "Settings store error: {}", msg),
			Error::Module { message, .. } => write!(f, "{}", message),
			Error::Internal(msg) => write!(f, "Internal error: {}", msg),
		}
	}
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Error::Internal(err.to_string().into())
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		let status = StatusCode::from_u16(self.status())
			.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		let mut body = json!({
			"error": {
				"code": self.code(),
				"message": self.to_string(),
				"status": self.status(),
			}
		});
		if let (Some(data), Some(error)) = (self.data(), body["error"].as_object_mut()) {
			error.insert("data".into(), data);
		}
		(status, Json(body)).into_response()
	}
}


// vim: ts=4
