//! Route presets inherited from the scope a route is declared in.
//!
//! A scope registered with a preset (schema metadata, version constraints,
//! pre-handlers, ...) hands it down to every route declared in it and in its
//! child scopes. Child presets are merged shallowly over the inherited one:
//! a top-level key set by the child replaces the parent's value for that key,
//! keys it does not set are kept.
//!
//! What a preset does to a route is up to the transforms the plugin is set up
//! with. They run in order for each route, each one seeing what the previous
//! ones changed. A route opts out with `skip_preset`.
//!
//! ```ignore
//! let mut host = Host::new();
//! let mut root = host.scope();
//! root.plugin(RoutePreset::new(
//!     RoutePresetOpts::new().on_preset_route(transforms::merge_constraints),
//! ))?;
//! root.register(
//!     RegisterOptions::new().preset(PresetConfig::from_value(json!({
//!         "constraints": { "version": "1.0.0" }
//!     }))?),
//!     |scope| scope.get("/users", list_users),
//! )?;
//! let router = host.ready().into_router();
//! ```

#![forbid(unsafe_code)]

pub mod api_preset;
pub mod options;
pub mod plugin;
pub mod prelude;
pub mod transforms;

pub use presetroute_host as host;
pub use presetroute_types as types;

pub use api_preset::ApiPreset;
pub use options::{
	ON_PRESET_ROUTE_ERROR, OnRegisterCallback, PresetTransform, RoutePresetConfig, RoutePresetOpts,
	TransformRegistry, transform,
};
pub use plugin::{PresetRegisterExt, RoutePreset, ScopePreset, scope_preset};

/// Name the plugin registers under
pub const PLUGIN_NAME: &str = "presetroute";

// vim: ts=4
