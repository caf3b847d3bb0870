//! The preset propagator plugin

use std::sync::Arc;

use axum::http::Method;

use crate::PLUGIN_NAME;
use crate::options::{PresetTransform, RoutePresetOpts};
use crate::prelude::*;
use presetroute_host::{Plugin, RegisterOptions, Scope, ScopeCtx};
use presetroute_types::{Preset, PresetConfig};

/// Preset a scope is registered with, as a registration option
#[derive(Debug, Clone)]
pub struct ScopePreset<P>(pub P);

/// Accumulated preset of a scope, stored as a scope decoration
#[derive(Debug, Clone)]
struct PresetSlot<P>(Option<P>);

pub trait PresetRegisterExt {
	/// Registers the scope with `preset`, merged over the inherited one
	fn preset<P: Preset>(self, preset: P) -> Self;
}

impl PresetRegisterExt for RegisterOptions {
	fn preset<P: Preset>(self, preset: P) -> Self {
		self.with(ScopePreset(preset))
	}
}

/// Accumulated preset visible in a scope, if any
pub fn scope_preset<P: Preset>(ctx: &ScopeCtx) -> Option<&P> {
	ctx.decoration::<PresetSlot<P>>()?.0.as_ref()
}

fn merge_scope_preset<P: Preset>(ctx: &mut ScopeCtx, preset: &P) -> PrResult<P> {
	let slot = ctx
		.decoration_mut::<PresetSlot<P>>()
		.ok_or_else(|| Error::Internal("scope has no preset slot".into()))?;
	let merged = match slot.0.take() {
		Some(mut acc) => {
			acc.merge(preset);
			acc
		}
		None => preset.clone(),
	};
	slot.0 = Some(merged.clone());
	Ok(merged)
}

// RoutePreset //
//*************//
/// Propagates scope presets to the routes declared in those scopes.
///
/// On every scope registration carrying a `ScopePreset<P>`, the preset is
/// merged over the one the scope inherited. On every route declaration the
/// transforms run in order with the route and the accumulated preset, unless
/// the scope has no preset, the route opted out with `skip_preset`, or HEAD
/// routes are skipped.
pub struct RoutePreset<S, P = PresetConfig> {
	opts: RoutePresetOpts<S, P>,
}

impl<S, P> RoutePreset<S, P>
where
	S: Clone + Send + Sync + 'static,
	P: Preset,
{
	pub fn new(opts: RoutePresetOpts<S, P>) -> Self {
		Self { opts }
	}
}

impl<S, P> Plugin<S> for RoutePreset<S, P>
where
	S: Clone + Send + Sync + 'static,
	P: Preset,
{
	fn name(&self) -> &str {
		PLUGIN_NAME
	}

	fn register(mut self, scope: &mut Scope<'_, S>) -> PrResult<()> {
		let transforms: Arc<[PresetTransform<S, P>]> = self.opts.take_transforms()?.into();
		let on_register = self.opts.on_register.take();
		let skip_head_routes = self.opts.skip_head_routes;

		scope.ctx_mut().decorate(PresetSlot::<P>(None))?;
		debug!("{} preset transforms installed", transforms.len());

		scope.add_on_register(move |ctx, opts| {
			let Some(ScopePreset(preset)) = opts.get::<ScopePreset<P>>() else {
				return Ok(());
			};
			let merged = merge_scope_preset(ctx, preset)?;
			debug!("preset merged for scope {:?}", ctx.prefix());
			if let Some(on_register) = &on_register {
				on_register(ctx, &merged);
			}
			Ok(())
		});

		scope.add_on_route(move |ctx, route| {
			let Some(preset) = scope_preset::<P>(ctx).filter(|p| !p.is_empty()) else {
				return Ok(());
			};
			if route.config.skip_preset {
				debug!("route {} {} skips preset", route.method, route.url);
				return Ok(());
			}
			if skip_head_routes && route.method == Method::HEAD {
				return Ok(());
			}
			for transform in transforms.iter() {
				transform(route, preset)?;
			}
			Ok(())
		});

		Ok(())
	}
}

// vim: ts=4
