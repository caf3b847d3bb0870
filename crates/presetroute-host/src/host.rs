//! Root of a route registration tree and the finished route table

use axum::{Router, http::Method};

use crate::prelude::*;
use crate::scope::{Scope, ScopeState, route_shape};
use presetroute_types::{RouteDeclaration, RouteInfo};

#[derive(Debug, Clone)]
pub struct HostOpts {
	/// Declare a HEAD twin for every GET route (unless a HEAD route already exists)
	pub expose_head_routes: bool,
}

impl Default for HostOpts {
	fn default() -> Self {
		Self { expose_head_routes: true }
	}
}

impl HostOpts {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn expose_head_routes(mut self, expose: bool) -> Self {
		self.expose_head_routes = expose;
		self
	}
}

// RouteTable //
//************//
pub(crate) struct RouteTable<S> {
	routes: Vec<RouteDeclaration<S>>,
}

impl<S> RouteTable<S> {
	fn new() -> Self {
		Self { routes: Vec::new() }
	}

	pub(crate) fn contains(&self, method: &Method, url: &str) -> bool {
		self.routes.iter().any(|r| &r.method == method && r.url == url)
	}

	/// Like `contains`, ignoring exposed HEAD twins
	pub(crate) fn contains_declared(&self, method: &Method, url: &str) -> bool {
		self.routes.iter().any(|r| !r.exposed_head && &r.method == method && r.url == url)
	}

	/// A stored url that differs from `url` only in parameter names
	pub(crate) fn conflicting(&self, url: &str) -> Option<&str> {
		let shape = route_shape(url);
		self.routes
			.iter()
			.find(|r| r.url != url && route_shape(&r.url) == shape)
			.map(|r| r.url.as_str())
	}

	pub(crate) fn remove_exposed_head(&mut self, url: &str) {
		self.routes.retain(|r| !(r.exposed_head && r.url == url));
	}

	pub(crate) fn push(&mut self, decl: RouteDeclaration<S>) {
		self.routes.push(decl);
	}
}

// Host //
//******//
pub struct Host<S = ()> {
	opts: HostOpts,
	root: ScopeState<S>,
	table: RouteTable<S>,
}

impl<S> Host<S>
where
	S: Clone + Send + Sync + 'static,
{
	pub fn new() -> Self {
		Self::with_opts(HostOpts::default())
	}

	pub fn with_opts(opts: HostOpts) -> Self {
		Self { opts, root: ScopeState::root(), table: RouteTable::new() }
	}

	pub fn opts(&self) -> &HostOpts {
		&self.opts
	}

	/// Handle to the root scope
	pub fn scope(&mut self) -> Scope<'_, S> {
		Scope { state: &mut self.root, table: &mut self.table, opts: &self.opts }
	}

	pub fn has_plugin(&self, name: &str) -> bool {
		self.root.has_plugin(name)
	}

	/// Finishes registration and hands out the route table
	pub fn ready(self) -> Routes<S> {
		info!("{} routes ready", self.table.routes.len());
		Routes { routes: self.table.routes }
	}
}

impl<S> Default for Host<S>
where
	S: Clone + Send + Sync + 'static,
{
	fn default() -> Self {
		Self::new()
	}
}

// Routes //
//********//
/// Declared routes in declaration order, with all hooks applied
pub struct Routes<S = ()> {
	routes: Vec<RouteDeclaration<S>>,
}

impl<S> Routes<S>
where
	S: Clone + Send + Sync + 'static,
{
	pub fn len(&self) -> usize {
		self.routes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, RouteDeclaration<S>> {
		self.routes.iter()
	}

	pub fn find(&self, method: &Method, url: &str) -> Option<&RouteDeclaration<S>> {
		self.routes.iter().find(|r| &r.method == method && r.url == url)
	}

	pub fn info(&self) -> Vec<RouteInfo> {
		self.routes.iter().map(RouteDeclaration::info).collect()
	}

	/// Mounts every route onto an axum router.
	///
	/// HEAD twins are not mounted: axum answers HEAD requests for GET routes itself.
	pub fn into_router(self) -> Router<S> {
		self.routes.into_iter().filter(|r| !r.exposed_head).fold(Router::new(), |router, decl| {
			let url = decl.url.clone();
			router.route(&url, decl.into_method_router())
		})
	}
}

impl<'a, S> IntoIterator for &'a Routes<S> {
	type Item = &'a RouteDeclaration<S>;
	type IntoIter = std::slice::Iter<'a, RouteDeclaration<S>>;

	fn into_iter(self) -> Self::IntoIter {
		self.routes.iter()
	}
}

// vim: ts=4
