//! Typed preset for API route groups
//!
//! Unlike `PresetConfig`, it can carry pre-handlers, which are functions and
//! have no JSON representation.

use std::sync::Arc;

use axum::http::request::Parts;
use serde_json::Value;

use crate::prelude::*;
use presetroute_types::preset::into_object;
use presetroute_types::{JsonMap, PreHandler, Preset};

#[derive(Clone, Default)]
pub struct ApiPreset {
	pub schema: Option<JsonMap>,
	pub constraints: Option<JsonMap>,
	pub pre_handler: Option<Vec<PreHandler>>,
}

impl ApiPreset {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn schema(mut self, schema: Value) -> Self {
		self.schema = Some(into_object(schema));
		self
	}

	pub fn constraints(mut self, constraints: Value) -> Self {
		self.constraints = Some(into_object(constraints));
		self
	}

	pub fn pre_handler<F>(mut self, f: F) -> Self
	where
		F: Fn(&Parts) -> PrResult<()> + Send + Sync + 'static,
	{
		self.pre_handler.get_or_insert_with(Vec::new).push(Arc::new(f));
		self
	}
}

impl Preset for ApiPreset {
	fn merge(&mut self, newer: &Self) {
		if newer.schema.is_some() {
			self.schema.clone_from(&newer.schema);
		}
		if newer.constraints.is_some() {
			self.constraints.clone_from(&newer.constraints);
		}
		if newer.pre_handler.is_some() {
			self.pre_handler.clone_from(&newer.pre_handler);
		}
	}

	fn is_empty(&self) -> bool {
		self.schema.is_none() && self.constraints.is_none() && self.pre_handler.is_none()
	}

	fn schema(&self) -> Option<&JsonMap> {
		self.schema.as_ref()
	}

	fn constraints(&self) -> Option<&JsonMap> {
		self.constraints.as_ref()
	}

	fn pre_handlers(&self) -> &[PreHandler] {
		self.pre_handler.as_deref().unwrap_or_default()
	}
}

impl std::fmt::Debug for ApiPreset {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ApiPreset")
			.field("schema", &self.schema)
			.field("constraints", &self.constraints)
			.field("pre_handler", &self.pre_handler.as_ref().map(Vec::len))
			.finish()
	}
}


// vim: ts=4
