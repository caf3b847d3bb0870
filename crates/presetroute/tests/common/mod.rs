//! Shared fixtures for preset plugin tests

#![allow(dead_code, clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use presetroute::host::{Host, Scope};
use presetroute::types::{PrResult, PresetConfig, RouteDeclaration};
use presetroute::{RoutePreset, RoutePresetOpts};
use serde_json::Value;

pub async fn ok() -> &'static str {
	"hello world"
}

pub fn preset(value: Value) -> PresetConfig {
	PresetConfig::from_value(value).unwrap()
}

/// POST /example/post and PUT /example/put
pub fn example_routes(scope: &mut Scope<'_, ()>) -> PrResult<()> {
	scope.post("/example/post", ok)?;
	scope.put("/example/put", ok)
}

/// GET / and POST /
pub fn index_routes(scope: &mut Scope<'_, ()>) -> PrResult<()> {
	scope.get("/", ok)?;
	scope.post("/", ok)
}

/// Host with the preset plugin installed on the root scope
pub fn host_with(opts: RoutePresetOpts<(), PresetConfig>) -> Host<()> {
	let mut host = Host::new();
	host.scope().plugin(RoutePreset::new(opts)).unwrap();
	host
}

/// Transform counting its invocations
pub fn counting_transform(
	counter: &Arc<AtomicUsize>,
) -> impl Fn(&mut RouteDeclaration<()>, &PresetConfig) -> PrResult<()> + Send + Sync + 'static {
	let counter = counter.clone();
	move |_, _| {
		counter.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}
}

pub fn count(counter: &Arc<AtomicUsize>) -> usize {
	counter.load(Ordering::SeqCst)
}

// vim: ts=4
