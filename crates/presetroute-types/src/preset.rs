//! Preset values a scope hands down to the routes declared in it
//!
//! A preset is merged shallowly: when a newer preset is merged over an older
//! one, every top-level key present in the newer one replaces the older value
//! entirely. Nested objects are never merged key by key.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::prelude::*;
use crate::route::PreHandler;

pub type JsonMap = serde_json::Map<String, Value>;

/// Converts a JSON value into an object map. Non-object values yield an empty map.
pub fn into_object(value: Value) -> JsonMap {
	match value {
		Value::Object(map) => map,
		_ => JsonMap::new(),
	}
}

/// Shape of the configuration a scope accumulates for its routes.
///
/// The field accessors let generic transforms reach the well-known entries
/// without knowing the concrete preset type.
pub trait Preset: Clone + Send + Sync + 'static {
	/// Shallow merge: top-level entries of `newer` replace those of `self`
	fn merge(&mut self, newer: &Self);

	fn is_empty(&self) -> bool;

	fn schema(&self) -> Option<&JsonMap> {
		None
	}

	fn constraints(&self) -> Option<&JsonMap> {
		None
	}

	fn pre_handlers(&self) -> &[PreHandler] {
		&[]
	}
}

// PresetConfig //
//**************//
/// Untyped preset: an open JSON object with no fixed schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresetConfig(JsonMap);

impl PresetConfig {
	pub fn new() -> Self {
		Self(JsonMap::new())
	}

	/// Builds a preset from a JSON value, which must be an object
	pub fn from_value(value: Value) -> PrResult<Self> {
		match value {
			Value::Object(map) => Ok(Self(map)),
			other => Err(Error::Config(format!("preset must be an object, got {}", other))),
		}
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
		self.0.insert(key.into(), value)
	}

	pub fn into_value(self) -> Value {
		Value::Object(self.0)
	}
}

impl Preset for PresetConfig {
	fn merge(&mut self, newer: &Self) {
		for (key, value) in &newer.0 {
			self.0.insert(key.clone(), value.clone());
		}
	}

	fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	fn schema(&self) -> Option<&JsonMap> {
		self.0.get("schema").and_then(Value::as_object)
	}

	fn constraints(&self) -> Option<&JsonMap> {
		self.0.get("constraints").and_then(Value::as_object)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn preset(value: Value) -> PresetConfig {
		PresetConfig::from_value(value).unwrap()
	}

	#[test]
	fn test_merge_newer_key_wins() {
		let mut acc = preset(json!({ "schema": { "tags": ["parent"] } }));
		acc.merge(&preset(json!({ "schema": { "tags": ["child"] } })));
		assert_eq!(acc.into_value(), json!({ "schema": { "tags": ["child"] } }));
	}

	#[test]
	fn test_merge_keeps_absent_keys() {
		let mut acc = preset(json!({
			"schema": { "tags": ["parent"] },
			"constraints": { "version": "1.0.0" }
		}));
		acc.merge(&preset(json!({ "schema": { "tags": ["child"] } })));
		assert_eq!(acc.constraints().unwrap()["version"], "1.0.0");
		assert_eq!(acc.schema().unwrap()["tags"], json!(["child"]));
	}

	#[test]
	fn test_merge_is_shallow() {
		let mut acc = preset(json!({ "schema": { "tags": ["a"], "summary": "parent" } }));
		acc.merge(&preset(json!({ "schema": { "tags": ["b"] } })));
		// The nested "summary" does not survive: the whole "schema" key is replaced
		assert_eq!(acc.schema().unwrap(), &into_object(json!({ "tags": ["b"] })));
	}

	#[test]
	fn test_from_value_rejects_non_object() {
		assert!(PresetConfig::from_value(json!([1, 2])).is_err());
		assert!(PresetConfig::from_value(json!("schema")).is_err());
	}

	#[test]
	fn test_insert_then_merge() {
		let mut acc = PresetConfig::new();
		assert!(acc.insert("schema", json!({ "tags": ["a"] })).is_none());
		acc.merge(&preset(json!({ "constraints": { "version": "2.0.0" } })));
		assert_eq!(acc.get("schema"), Some(&json!({ "tags": ["a"] })));
		assert_eq!(acc.get("constraints"), Some(&json!({ "version": "2.0.0" })));
		assert!(acc.get("preHandler").is_none());
	}

	#[test]
	fn test_empty() {
		assert!(PresetConfig::new().is_empty());
		assert!(!preset(json!({ "x": 1 })).is_empty());
	}

	#[test]
	fn test_non_object_schema_is_ignored() {
		let acc = preset(json!({ "schema": "not-an-object" }));
		assert!(acc.schema().is_none());
	}
}

// vim: ts=4
