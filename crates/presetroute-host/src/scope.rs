//! Scopes: nested route groups with their own prefix, decorations and hooks
//!
//! A scope is created by `Scope::register`. It starts as a copy of its parent
//! (prefix, decorations, hooks, plugin names), then the registration hooks run
//! with the scope's options, and only then the scope body declares its routes.
//! Nothing a child does is visible to its parent except the routes it adds.

use std::sync::Arc;

use axum::http::Method;

use crate::extensions::Extensions;
use crate::host::{HostOpts, RouteTable};
use crate::plugin::Plugin;
use crate::prelude::*;
use presetroute_types::RouteDeclaration;

/// Hook run when a child scope is registered, before its body runs
pub type OnRegisterHook = Arc<dyn Fn(&mut ScopeCtx, &RegisterOptions) -> PrResult<()> + Send + Sync>;

/// Hook run for every route declared in a scope, before it is stored
pub type OnRouteHook<S> =
	Arc<dyn Fn(&ScopeCtx, &mut RouteDeclaration<S>) -> PrResult<()> + Send + Sync>;

// ScopeCtx //
//**********//
/// Scope-local state visible to hooks
#[derive(Debug, Clone, Default)]
pub struct ScopeCtx {
	prefix: Box<str>,
	depth: usize,
	decorations: Extensions,
}

impl ScopeCtx {
	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	/// Nesting level, the root scope is 0
	pub fn depth(&self) -> usize {
		self.depth
	}

	/// Adds a decoration to this scope. Children registered afterwards inherit a copy.
	pub fn decorate<T: Clone + Send + Sync + 'static>(&mut self, value: T) -> PrResult<()> {
		if self.decorations.contains::<T>() {
			return Err(Error::Config(format!(
				"decoration {} is already present",
				std::any::type_name::<T>()
			)));
		}
		self.decorations.insert(value);
		Ok(())
	}

	pub fn decoration<T: Send + Sync + 'static>(&self) -> Option<&T> {
		self.decorations.get::<T>()
	}

	pub fn decoration_mut<T: Send + Sync + 'static>(&mut self) -> Option<&mut T> {
		self.decorations.get_mut::<T>()
	}

	pub fn has_decoration<T: Send + Sync + 'static>(&self) -> bool {
		self.decorations.contains::<T>()
	}

	fn child(&self, prefix: Option<&str>) -> Self {
		Self {
			prefix: join_path(&self.prefix, prefix.unwrap_or_default()).into(),
			depth: self.depth + 1,
			decorations: self.decorations.clone(),
		}
	}
}

// RegisterOptions //
//*****************//
/// Options a scope is registered with. Plugins read their own entries by type.
#[derive(Debug, Clone, Default)]
pub struct RegisterOptions {
	prefix: Option<Box<str>>,
	extra: Extensions,
}

impl RegisterOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn prefix(mut self, prefix: impl Into<Box<str>>) -> Self {
		self.prefix = Some(prefix.into());
		self
	}

	/// Attaches a plugin-specific option value
	pub fn with<T: Clone + Send + Sync + 'static>(mut self, value: T) -> Self {
		self.extra.insert(value);
		self
	}

	pub fn get_prefix(&self) -> Option<&str> {
		self.prefix.as_deref()
	}

	pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
		self.extra.get::<T>()
	}
}

// ScopeState //
//************//
pub(crate) struct ScopeState<S> {
	pub(crate) ctx: ScopeCtx,
	on_register: Vec<OnRegisterHook>,
	on_route: Vec<OnRouteHook<S>>,
	plugins: Vec<Box<str>>,
}

impl<S> ScopeState<S> {
	pub(crate) fn root() -> Self {
		Self {
			ctx: ScopeCtx::default(),
			on_register: Vec::new(),
			on_route: Vec::new(),
			plugins: Vec::new(),
		}
	}

	pub(crate) fn has_plugin(&self, name: &str) -> bool {
		self.plugins.iter().any(|p| &**p == name)
	}

	fn child(&self, prefix: Option<&str>) -> Self {
		Self {
			ctx: self.ctx.child(prefix),
			on_register: self.on_register.clone(),
			on_route: self.on_route.clone(),
			plugins: self.plugins.clone(),
		}
	}
}

// Scope //
//*******//
/// Handle to a scope during registration
pub struct Scope<'a, S> {
	pub(crate) state: &'a mut ScopeState<S>,
	pub(crate) table: &'a mut RouteTable<S>,
	pub(crate) opts: &'a HostOpts,
}

impl<S> Scope<'_, S>
where
	S: Clone + Send + Sync + 'static,
{
	pub fn ctx(&self) -> &ScopeCtx {
		&self.state.ctx
	}

	pub fn ctx_mut(&mut self) -> &mut ScopeCtx {
		&mut self.state.ctx
	}

	pub fn prefix(&self) -> &str {
		self.state.ctx.prefix()
	}

	pub fn add_on_register<F>(&mut self, hook: F) -> &mut Self
	where
		F: Fn(&mut ScopeCtx, &RegisterOptions) -> PrResult<()> + Send + Sync + 'static,
	{
		self.state.on_register.push(Arc::new(hook));
		self
	}

	pub fn add_on_route<F>(&mut self, hook: F) -> &mut Self
	where
		F: Fn(&ScopeCtx, &mut RouteDeclaration<S>) -> PrResult<()> + Send + Sync + 'static,
	{
		self.state.on_route.push(Arc::new(hook));
		self
	}

	/// Registers a plugin on this scope. Plugins are not encapsulated: the hooks
	/// and decorations they install apply to this scope and its later children.
	pub fn plugin<P: Plugin<S>>(&mut self, plugin: P) -> PrResult<&mut Self> {
		let name: Box<str> = plugin.name().into();
		if self.has_plugin(&name) {
			return Err(Error::Config(format!("plugin {} is already registered", name)));
		}
		if let Err(err) = plugin.register(self) {
			warn!("plugin {} failed to register: {}", name, err);
			return Err(err);
		}
		info!("plugin {} registered at {:?}", name, self.prefix());
		self.state.plugins.push(name);
		Ok(self)
	}

	pub fn has_plugin(&self, name: &str) -> bool {
		self.state.has_plugin(name)
	}

	/// Registers a child scope and runs `body` in it
	pub fn register<F>(&mut self, opts: RegisterOptions, body: F) -> PrResult<()>
	where
		F: FnOnce(&mut Scope<'_, S>) -> PrResult<()>,
	{
		let mut state = self.state.child(opts.get_prefix());
		let _span = debug_span!("scope", prefix = %state.ctx.prefix()).entered();
		debug!("registering scope at depth {}", state.ctx.depth());

		for hook in state.on_register.clone() {
			hook(&mut state.ctx, &opts)?;
		}

		let mut child = Scope { state: &mut state, table: &mut *self.table, opts: self.opts };
		body(&mut child)
	}

	/// Declares a route in this scope.
	///
	/// The scope prefix is applied to the declared path, every route hook runs in
	/// registration order, and only then is the route stored. A hook error aborts
	/// the declaration. GET routes get a HEAD twin when the host exposes HEAD routes.
	pub fn route(&mut self, mut decl: RouteDeclaration<S>) -> PrResult<()> {
		decl.url = join_path(self.prefix(), &decl.path);
		if !is_mountable(&decl.url) {
			return Err(Error::InvalidPath(decl.url.into()));
		}
		if let Some(other) = self.table.conflicting(&decl.url) {
			return Err(Error::Config(format!(
				"route {} conflicts with {}",
				decl.url, other
			)));
		}

		// A user HEAD route takes the place of an exposed twin
		let replaces_twin = decl.method == Method::HEAD && !decl.exposed_head;
		if self.table.contains_declared(&decl.method, &decl.url) {
			return Err(Error::DuplicateRoute {
				method: decl.method.as_str().into(),
				url: decl.url.into(),
			});
		}

		let head_twin = (self.opts.expose_head_routes
			&& decl.method == Method::GET
			&& !self.table.contains(&Method::HEAD, &decl.url))
		.then(|| decl.head_twin());

		// Hooks run for the route and its twin before anything is stored,
		// so a failing hook leaves the table untouched.
		self.run_hooks(&mut decl)?;
		let head_twin = match head_twin {
			Some(mut twin) => {
				self.run_hooks(&mut twin)?;
				Some(twin)
			}
			None => None,
		};

		if replaces_twin {
			self.table.remove_exposed_head(&decl.url);
		}
		for decl in std::iter::once(decl).chain(head_twin) {
			debug!("route {} {}", decl.method, decl.url);
			self.table.push(decl);
		}
		Ok(())
	}

	fn run_hooks(&self, decl: &mut RouteDeclaration<S>) -> PrResult<()> {
		for hook in &self.state.on_route {
			hook(&self.state.ctx, decl)?;
		}
		Ok(())
	}

	pub fn get<H, T>(&mut self, path: &str, handler: H) -> PrResult<()>
	where
		H: axum::handler::Handler<T, S>,
		T: 'static,
	{
		self.route(RouteDeclaration::get(path, handler))
	}

	pub fn post<H, T>(&mut self, path: &str, handler: H) -> PrResult<()>
	where
		H: axum::handler::Handler<T, S>,
		T: 'static,
	{
		self.route(RouteDeclaration::post(path, handler))
	}

	pub fn put<H, T>(&mut self, path: &str, handler: H) -> PrResult<()>
	where
		H: axum::handler::Handler<T, S>,
		T: 'static,
	{
		self.route(RouteDeclaration::put(path, handler))
	}

	pub fn patch<H, T>(&mut self, path: &str, handler: H) -> PrResult<()>
	where
		H: axum::handler::Handler<T, S>,
		T: 'static,
	{
		self.route(RouteDeclaration::patch(path, handler))
	}

	pub fn delete<H, T>(&mut self, path: &str, handler: H) -> PrResult<()>
	where
		H: axum::handler::Handler<T, S>,
		T: 'static,
	{
		self.route(RouteDeclaration::delete(path, handler))
	}

	pub fn head<H, T>(&mut self, path: &str, handler: H) -> PrResult<()>
	where
		H: axum::handler::Handler<T, S>,
		T: 'static,
	{
		self.route(RouteDeclaration::head(path, handler))
	}

	pub fn options<H, T>(&mut self, path: &str, handler: H) -> PrResult<()>
	where
		H: axum::handler::Handler<T, S>,
		T: 'static,
	{
		self.route(RouteDeclaration::options(path, handler))
	}
}

/// Joins a scope prefix and a path. A bare "/" under a prefix maps to the prefix itself.
pub fn join_path(prefix: &str, path: &str) -> String {
	let prefix = prefix.trim_end_matches('/');
	match (prefix.is_empty(), path) {
		(true, "") => "/".into(),
		(true, path) => path.into(),
		(false, "" | "/") => prefix.into(),
		(false, path) if path.starts_with('/') => format!("{}{}", prefix, path),
		(false, path) => format!("{}/{}", prefix, path),
	}
}

/// Whether axum can mount `url`: absolute, no `:param` or `*rest` segments,
/// parameters only as whole `{name}` segments, `{*rest}` only as the last one.
pub fn is_mountable(url: &str) -> bool {
	let Some(rest) = url.strip_prefix('/') else {
		return false;
	};
	let mut segments = rest.split('/').peekable();
	while let Some(segment) = segments.next() {
		if !is_mountable_segment(segment, segments.peek().is_none()) {
			return false;
		}
	}
	true
}

fn is_mountable_segment(segment: &str, last: bool) -> bool {
	if let Some(name) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
		return match name.strip_prefix('*') {
			Some(name) => last && is_param_name(name),
			None => is_param_name(name),
		};
	}
	!(segment.starts_with(':') || segment.starts_with('*') || segment.contains(['{', '}']))
}

fn is_param_name(name: &str) -> bool {
	!name.is_empty() && !name.contains(['{', '}', '*'])
}

/// `url` with every parameter name erased, so `/users/{id}` and `/users/{name}` compare equal
pub(crate) fn route_shape(url: &str) -> String {
	let mut shape = String::with_capacity(url.len());
	let mut in_param = false;
	for c in url.chars() {
		match c {
			'{' => {
				in_param = true;
				shape.push('{');
			}
			'}' => {
				in_param = false;
				shape.push('}');
			}
			'*' if in_param => shape.push('*'),
			_ if in_param => {}
			_ => shape.push(c),
		}
	}
	shape
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_join_path() {
		assert_eq!(join_path("", "/users"), "/users");
		assert_eq!(join_path("", ""), "/");
		assert_eq!(join_path("/api", "/users"), "/api/users");
		assert_eq!(join_path("/api/", "/users"), "/api/users");
		assert_eq!(join_path("/api", "/"), "/api");
		assert_eq!(join_path("/api", "users"), "/api/users");
	}

	#[test]
	fn test_is_mountable() {
		assert!(is_mountable("/"));
		assert!(is_mountable("/users/{id}"));
		assert!(is_mountable("/files/{*path}"));
		assert!(!is_mountable("users"));
		assert!(!is_mountable("/users/:id"));
		assert!(!is_mountable("/files/*path"));
		assert!(!is_mountable("/users/{id"));
		assert!(!is_mountable("/users/id}"));
		assert!(!is_mountable("/users/{}"));
		assert!(!is_mountable("/users/{a}{b}"));
		assert!(!is_mountable("/files/{*path}/tail"));
		assert!(!is_mountable("/users/{{id}}"));
		assert!(!is_mountable("/a/{id}.json"));
	}

	#[test]
	fn test_route_shape() {
		assert_eq!(route_shape("/users/{id}"), route_shape("/users/{name}"));
		assert_eq!(route_shape("/files/{*path}"), "/files/{*}");
		assert_ne!(route_shape("/users/{id}"), route_shape("/users/id"));
	}

	#[test]
	fn test_ctx_child_copies_decorations() {
		let mut root = ScopeCtx::default();
		root.decorate(7_u32).unwrap();

		let mut child = root.child(Some("/v1"));
		*child.decoration_mut::<u32>().unwrap() = 8;

		assert_eq!(root.decoration::<u32>(), Some(&7));
		assert_eq!(child.decoration::<u32>(), Some(&8));
		assert_eq!(child.prefix(), "/v1");
		assert_eq!(child.depth(), 1);
	}

	#[test]
	fn test_decorate_twice_fails() {
		let mut ctx = ScopeCtx::default();
		ctx.decorate(1_u8).unwrap();
		assert!(matches!(ctx.decorate(2_u8), Err(Error::Config(_))));
	}

	#[test]
	fn test_register_options() {
		let opts = RegisterOptions::new().prefix("/users").with(42_u16);
		assert_eq!(opts.get_prefix(), Some("/users"));
		assert_eq!(opts.get::<u16>(), Some(&42));
		assert!(opts.get::<u32>().is_none());
	}
}

// vim: ts=4
