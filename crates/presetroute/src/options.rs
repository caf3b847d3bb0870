//! Plugin options, transform lists and configuration-driven setup

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::prelude::*;
use crate::transforms;
use presetroute_host::ScopeCtx;
use presetroute_types::{Preset, RouteDeclaration};

/// Exact message reported for an invalid or missing transform list
pub const ON_PRESET_ROUTE_ERROR: &str = "\"onPresetRoute\" must be a function or array of functions";

/// Mutates a route declaration using the accumulated scope preset
pub type PresetTransform<S, P> =
	Arc<dyn Fn(&mut RouteDeclaration<S>, &P) -> PrResult<()> + Send + Sync>;

/// Called after a scope registration merged a preset, with the accumulated preset
pub type OnRegisterCallback<P> = Arc<dyn Fn(&ScopeCtx, &P) + Send + Sync>;

pub fn transform<S, P, F>(f: F) -> PresetTransform<S, P>
where
	F: Fn(&mut RouteDeclaration<S>, &P) -> PrResult<()> + Send + Sync + 'static,
{
	Arc::new(f)
}

pub(crate) fn invalid_transforms() -> Error {
	Error::Config(ON_PRESET_ROUTE_ERROR.into())
}

enum TransformSource<S, P> {
	Transforms(Vec<PresetTransform<S, P>>),
	/// Names from configuration data, resolved at plugin registration,
	/// followed by the transforms appended in code
	Value { value: Value, registry: TransformRegistry<S, P>, appended: Vec<PresetTransform<S, P>> },
}

// RoutePresetOpts //
//*****************//
pub struct RoutePresetOpts<S, P> {
	on_preset_route: Option<TransformSource<S, P>>,
	pub(crate) on_register: Option<OnRegisterCallback<P>>,
	pub(crate) skip_head_routes: bool,
}

impl<S, P> Default for RoutePresetOpts<S, P> {
	fn default() -> Self {
		Self { on_preset_route: None, on_register: None, skip_head_routes: false }
	}
}

impl<S, P> RoutePresetOpts<S, P>
where
	S: Clone + Send + Sync + 'static,
	P: Preset,
{
	pub fn new() -> Self {
		Self::default()
	}

	/// Options described by configuration data, with transform names looked up in `registry`
	pub fn from_config(config: RoutePresetConfig, registry: TransformRegistry<S, P>) -> Self {
		Self {
			on_preset_route: config
				.on_preset_route
				.map(|value| TransformSource::Value { value, registry, appended: Vec::new() }),
			on_register: None,
			skip_head_routes: config.skip_head_routes,
		}
	}

	/// Appends one transform to the list. With options from configuration data,
	/// it runs after the configured transforms.
	pub fn on_preset_route<F>(mut self, f: F) -> Self
	where
		F: Fn(&mut RouteDeclaration<S>, &P) -> PrResult<()> + Send + Sync + 'static,
	{
		match &mut self.on_preset_route {
			Some(TransformSource::Transforms(list)) => list.push(Arc::new(f)),
			Some(TransformSource::Value { appended, .. }) => appended.push(Arc::new(f)),
			None => self.on_preset_route = Some(TransformSource::Transforms(vec![Arc::new(f)])),
		}
		self
	}

	/// Sets the whole transform list, replacing configured ones. An empty list is valid.
	pub fn on_preset_routes(mut self, list: impl IntoIterator<Item = PresetTransform<S, P>>) -> Self {
		self.on_preset_route = Some(TransformSource::Transforms(list.into_iter().collect()));
		self
	}

	pub fn on_register<F>(mut self, f: F) -> Self
	where
		F: Fn(&ScopeCtx, &P) + Send + Sync + 'static,
	{
		self.on_register = Some(Arc::new(f));
		self
	}

	/// Leave HEAD routes (exposed or declared) untouched
	pub fn skip_head_routes(mut self, skip: bool) -> Self {
		self.skip_head_routes = skip;
		self
	}

	/// Validates and returns the ordered transform list
	pub(crate) fn take_transforms(&mut self) -> PrResult<Vec<PresetTransform<S, P>>> {
		match self.on_preset_route.take() {
			None => Err(invalid_transforms()),
			Some(TransformSource::Transforms(list)) => Ok(list),
			Some(TransformSource::Value { value, registry, appended }) => {
				let mut list = registry.resolve(&value)?;
				list.extend(appended);
				Ok(list)
			}
		}
	}
}

// RoutePresetConfig //
//*******************//
/// Plugin options as configuration data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoutePresetConfig {
	/// A transform name or an array of transform names
	pub on_preset_route: Option<Value>,
	pub skip_head_routes: bool,
}

impl RoutePresetConfig {
	pub fn from_json(json: &str) -> PrResult<Self> {
		Ok(serde_json::from_str(json)?)
	}
}

// TransformRegistry //
//*******************//
/// Named transforms that configuration data can refer to
pub struct TransformRegistry<S, P> {
	transforms: HashMap<Box<str>, PresetTransform<S, P>>,
}

impl<S, P> Clone for TransformRegistry<S, P> {
	fn clone(&self) -> Self {
		Self { transforms: self.transforms.clone() }
	}
}

impl<S, P> Default for TransformRegistry<S, P> {
	fn default() -> Self {
		Self { transforms: HashMap::new() }
	}
}

impl<S, P> TransformRegistry<S, P>
where
	S: Clone + Send + Sync + 'static,
	P: Preset,
{
	pub fn new() -> Self {
		Self::default()
	}

	/// Registry with `schema`, `constraints` and `preHandler` merges registered
	pub fn with_builtins() -> Self {
		let mut registry = Self::new();
		registry.insert("schema", transforms::merge_schema::<S, P>);
		registry.insert("constraints", transforms::merge_constraints::<S, P>);
		registry.insert("preHandler", transforms::append_pre_handlers::<S, P>);
		registry
	}

	pub fn insert<F>(&mut self, name: impl Into<Box<str>>, f: F) -> &mut Self
	where
		F: Fn(&mut RouteDeclaration<S>, &P) -> PrResult<()> + Send + Sync + 'static,
	{
		self.transforms.insert(name.into(), Arc::new(f));
		self
	}

	pub fn contains(&self, name: &str) -> bool {
		self.transforms.contains_key(name)
	}

	fn lookup(&self, name: &str) -> PrResult<PresetTransform<S, P>> {
		self.transforms.get(name).cloned().ok_or_else(|| {
			warn!("unknown preset transform {:?}", name);
			invalid_transforms()
		})
	}

	/// Resolves a transform name or an array of names
	pub fn resolve(&self, value: &Value) -> PrResult<Vec<PresetTransform<S, P>>> {
		match value {
			Value::String(name) => Ok(vec![self.lookup(name)?]),
			Value::Array(items) => items
				.iter()
				.map(|item| match item {
					Value::String(name) => self.lookup(name),
					_ => Err(invalid_transforms()),
				})
				.collect(),
			_ => Err(invalid_transforms()),
		}
	}
}


// vim: ts=4
