//! Ready-made transforms for the well-known preset entries
//!
//! Each one fills in what the route did not declare itself: route-level values
//! win over preset values at the top level of the merged object.

use crate::prelude::*;
use presetroute_types::{JsonMap, Preset, RouteDeclaration};

/// Copies entries of `defaults` missing from `target`. Existing entries are kept as-is.
pub fn merge_under(target: &mut JsonMap, defaults: &JsonMap) {
	for (key, value) in defaults {
		if !target.contains_key(key) {
			target.insert(key.clone(), value.clone());
		}
	}
}

/// `route.schema = { ...preset.schema, ...route.schema }`
pub fn merge_schema<S, P: Preset>(route: &mut RouteDeclaration<S>, preset: &P) -> PrResult<()> {
	if let Some(schema) = preset.schema() {
		merge_under(&mut route.schema, schema);
	}
	Ok(())
}

/// `route.constraints = { ...preset.constraints, ...route.constraints }`
pub fn merge_constraints<S, P: Preset>(
	route: &mut RouteDeclaration<S>,
	preset: &P,
) -> PrResult<()> {
	if let Some(constraints) = preset.constraints() {
		merge_under(&mut route.constraints, constraints);
	}
	Ok(())
}

/// Runs the preset's pre-handlers after the ones the route declared
pub fn append_pre_handlers<S, P: Preset>(
	route: &mut RouteDeclaration<S>,
	preset: &P,
) -> PrResult<()> {
	route.pre_handlers.extend(preset.pre_handlers().iter().cloned());
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use presetroute_types::PresetConfig;
	use serde_json::json;

	fn preset(value: serde_json::Value) -> PresetConfig {
		PresetConfig::from_value(value).unwrap()
	}

	#[test]
	fn test_route_value_wins() {
		let mut route = RouteDeclaration::<()>::get("/", || async { "ok" })
			.schema(json!({ "tags": ["b"] }));
		merge_schema(&mut route, &preset(json!({ "schema": { "tags": ["a"] } }))).unwrap();
		assert_eq!(serde_json::Value::Object(route.schema), json!({ "tags": ["b"] }));
	}

	#[test]
	fn test_preset_fills_missing_keys() {
		let mut route = RouteDeclaration::<()>::get("/", || async { "ok" })
			.schema(json!({ "summary": "list" }));
		merge_schema(&mut route, &preset(json!({ "schema": { "tags": ["a"] } }))).unwrap();
		assert_eq!(
			serde_json::Value::Object(route.schema),
			json!({ "tags": ["a"], "summary": "list" })
		);
	}

	#[test]
	fn test_missing_preset_entry_is_noop() {
		let mut route = RouteDeclaration::<()>::get("/", || async { "ok" });
		merge_constraints(&mut route, &preset(json!({ "schema": { "tags": ["a"] } }))).unwrap();
		assert!(route.constraints.is_empty());
	}
}

// vim: ts=4
