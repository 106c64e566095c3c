//! Common identifier and response envelope types.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Numeric user identifier, as issued by the embedding system's user store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Deserialize, Serialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Owner sub-object returned for owner-bearing modules.
#[skip_serializing_none]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerInfo {
	pub id: UserId,
	pub login: Option<Box<str>>,
}

/// Standard success envelope for API responses.
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
	pub data: T,
	pub req_id: Option<Box<str>>,
}

impl<T> ApiResponse<T> {
	pub fn new(data: T) -> Self {
		Self { data, req_id: None }
	}

	pub fn with_req_id(mut self, req_id: impl Into<Box<str>>) -> Self {
		self.req_id = Some(req_id.into());
		self
	}
}


// vim: ts=4
