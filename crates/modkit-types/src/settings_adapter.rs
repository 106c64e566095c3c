//! Adapter that persists per-module settings blobs.
//!
//! The platform never inspects blob contents; it only forwards get/merge/
//! delete calls. Keys are module slugs plus reserved platform keys. Each
//! call is atomic on its own; there are no multi-key transactions.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::MkResult;

#[async_trait]
pub trait SettingsAdapter: Send + Sync {
	/// Read the blob stored under `key`, `None` when nothing is stored.
	async fn read(&self, key: &str) -> MkResult<Option<Value>>;

	/// Shallow-merge `patch` into the blob under `key`, creating it when
	/// absent, and return the blob after the merge. Top-level keys in
	/// `patch` replace existing ones; other keys are left untouched.
	async fn merge(&self, key: &str, patch: &Map<String, Value>) -> MkResult<Value>;

	/// Remove the blob stored under `key`. Removing an absent key is a
	/// no-op.
	async fn delete(&self, key: &str) -> MkResult<()>;
}

/// Shallow merge used by adapter implementations: `patch` wins per top-level
/// key, everything else in `base` survives.
pub fn merge_blob(base: Option<Value>, patch: &Map<String, Value>) -> Value {
	let mut merged = match base {
		Some(Value::Object(map)) => map,
		_ => Map::new(),
	};
	for (key, value) in patch {
		merged.insert(key.clone(), value.clone());
	}
	Value::Object(merged)
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn patch(value: Value) -> Map<String, Value> {
		match value {
			Value::Object(map) => map,
			_ => unreachable!(),
		}
	}

	#[test]
	fn merge_is_not_replace() {
		let merged = merge_blob(None, &patch(json!({ "a": 1 })));
		let merged = merge_blob(Some(merged), &patch(json!({ "b": 2 })));
		assert_eq!(merged, json!({ "a": 1, "b": 2 }));
	}

	#[test]
	fn merge_overwrites_per_top_level_key() {
		let merged = merge_blob(
			Some(json!({ "a": { "x": 1 }, "b": 2 })),
			&patch(json!({ "a": { "y": 3 } })),
		);
		assert_eq!(merged, json!({ "a": { "y": 3 }, "b": 2 }));
	}

	#[test]
	fn merge_discards_non_object_base() {
		let merged = merge_blob(Some(json!("scalar")), &patch(json!({ "a": 1 })));
		assert_eq!(merged, json!({ "a": 1 }));
	}
}

// vim: ts=4
