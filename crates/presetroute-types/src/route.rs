//! Route declarations as seen by registration hooks

use std::sync::Arc;

use axum::{
	extract::Request,
	handler::Handler,
	http::{Method, request::Parts},
	middleware::{self, Next},
	response::IntoResponse,
	routing::{self, MethodRouter},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::prelude::*;
use crate::preset::{JsonMap, into_object};

/// Check run before a route handler. Returning an error short-circuits the
/// request with that error as the response.
pub type PreHandler = Arc<dyn Fn(&Parts) -> PrResult<()> + Send + Sync>;

/// Per-route configuration namespace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteConfig {
	/// Opt out of scope presets for this route
	#[serde(default)]
	pub skip_preset: bool,
	#[serde(flatten)]
	pub extra: JsonMap,
}

/// In-flight configuration of one route while it is being registered.
///
/// `path` is the path as declared in its scope, `url` is the full path with
/// all scope prefixes applied (filled in by the host).
pub struct RouteDeclaration<S = ()> {
	pub method: Method,
	pub url: String,
	pub path: String,
	pub handler: MethodRouter<S>,
	pub schema: JsonMap,
	pub constraints: JsonMap,
	pub config: RouteConfig,
	pub pre_handlers: Vec<PreHandler>,
	/// HEAD twin generated by the host for a GET route
	pub exposed_head: bool,
}

impl<S> Clone for RouteDeclaration<S> {
	fn clone(&self) -> Self {
		Self {
			method: self.method.clone(),
			url: self.url.clone(),
			path: self.path.clone(),
			handler: self.handler.clone(),
			schema: self.schema.clone(),
			constraints: self.constraints.clone(),
			config: self.config.clone(),
			pre_handlers: self.pre_handlers.clone(),
			exposed_head: self.exposed_head,
		}
	}
}

impl<S> std::fmt::Debug for RouteDeclaration<S> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteDeclaration")
			.field("method", &self.method)
			.field("url", &self.url)
			.field("path", &self.path)
			.field("schema", &self.schema)
			.field("constraints", &self.constraints)
			.field("config", &self.config)
			.field("pre_handlers", &self.pre_handlers.len())
			.field("exposed_head", &self.exposed_head)
			.finish_non_exhaustive()
	}
}

macro_rules! method_constructor {
	($name:ident, $method:ident) => {
		pub fn $name<H, T>(path: impl Into<String>, handler: H) -> Self
		where
			H: Handler<T, S>,
			T: 'static,
		{
			Self::new(Method::$method, path, routing::$name(handler))
		}
	};
}

impl<S> RouteDeclaration<S>
where
	S: Clone + Send + Sync + 'static,
{
	pub fn new(method: Method, path: impl Into<String>, handler: MethodRouter<S>) -> Self {
		let path = path.into();
		Self {
			method,
			url: path.clone(),
			path,
			handler,
			schema: JsonMap::new(),
			constraints: JsonMap::new(),
			config: RouteConfig::default(),
			pre_handlers: Vec::new(),
			exposed_head: false,
		}
	}

	method_constructor!(get, GET);
	method_constructor!(post, POST);
	method_constructor!(put, PUT);
	method_constructor!(patch, PATCH);
	method_constructor!(delete, DELETE);
	method_constructor!(head, HEAD);
	method_constructor!(options, OPTIONS);

	/// Sets the route schema. Non-object values leave an empty schema.
	pub fn schema(mut self, schema: Value) -> Self {
		self.schema = into_object(schema);
		self
	}

	pub fn constraints(mut self, constraints: Value) -> Self {
		self.constraints = into_object(constraints);
		self
	}

	pub fn config(mut self, config: RouteConfig) -> Self {
		self.config = config;
		self
	}

	pub fn skip_preset(mut self, skip: bool) -> Self {
		self.config.skip_preset = skip;
		self
	}

	pub fn pre_handler<F>(mut self, f: F) -> Self
	where
		F: Fn(&Parts) -> PrResult<()> + Send + Sync + 'static,
	{
		self.pre_handlers.push(Arc::new(f));
		self
	}

	/// HEAD counterpart of a GET declaration, as declared (before any hook ran)
	pub fn head_twin(&self) -> Self {
		let mut twin = self.clone();
		twin.method = Method::HEAD;
		twin.exposed_head = true;
		twin
	}

	/// Snapshot of the declarative part of the route
	pub fn info(&self) -> RouteInfo {
		RouteInfo {
			method: self.method.as_str().into(),
			url: self.url.clone(),
			path: self.path.clone(),
			schema: self.schema.clone(),
			constraints: self.constraints.clone(),
			config: self.config.clone(),
			pre_handlers: self.pre_handlers.len(),
			exposed_head: self.exposed_head,
		}
	}

	/// Handler ready to mount, with pre-handlers layered in front of it
	pub fn into_method_router(self) -> MethodRouter<S> {
		if self.pre_handlers.is_empty() {
			return self.handler;
		}
		let pre_handlers: Arc<[PreHandler]> = self.pre_handlers.into();
		let url = self.url;
		self.handler.layer(middleware::from_fn(move |req: Request, next: Next| {
			let pre_handlers = pre_handlers.clone();
			let url = url.clone();
			async move {
				let (parts, body) = req.into_parts();
				for pre_handler in pre_handlers.iter() {
					if let Err(err) = pre_handler(&parts) {
						debug!("pre-handler rejected {} {}: {}", parts.method, url, err);
						return err.into_response();
					}
				}
				next.run(Request::from_parts(parts, body)).await
			}
		}))
	}
}

/// Serializable view of a declared route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteInfo {
	pub method: Box<str>,
	pub url: String,
	pub path: String,
	pub schema: JsonMap,
	pub constraints: JsonMap,
	pub config: RouteConfig,
	pub pre_handlers: usize,
	pub exposed_head: bool,
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::{Router, body::Body, http::StatusCode};
	use axum::http::Request as HttpRequest;
	use serde_json::json;
	use tower::ServiceExt;

	#[test]
	fn test_builder() {
		let decl = RouteDeclaration::<()>::get("/users", || async { "ok" })
			.schema(json!({ "tags": ["users"] }))
			.constraints(json!({ "version": "1.0.0" }))
			.config(RouteConfig { skip_preset: false, extra: into_object(json!({ "rateLimit": 10 })) })
			.skip_preset(true);

		assert_eq!(decl.method, Method::GET);
		assert_eq!(decl.config.extra["rateLimit"], 10);
		assert_eq!(decl.url, "/users");
		assert_eq!(decl.schema["tags"], json!(["users"]));
		assert_eq!(decl.constraints["version"], "1.0.0");
		assert!(decl.config.skip_preset);
	}

	#[test]
	fn test_head_twin() {
		let decl = RouteDeclaration::<()>::get("/users", || async { "ok" });
		let twin = decl.head_twin();
		assert_eq!(twin.method, Method::HEAD);
		assert!(twin.exposed_head);
		assert!(!decl.exposed_head);
		assert_eq!(twin.path, decl.path);
	}

	#[test]
	fn test_route_config_serde() {
		let config: RouteConfig =
			serde_json::from_value(json!({ "skipPreset": true, "rateLimit": 10 })).unwrap();
		assert!(config.skip_preset);
		assert_eq!(config.extra["rateLimit"], 10);
	}

	#[tokio::test]
	async fn test_pre_handler_rejects() {
		let decl = RouteDeclaration::<()>::get("/admin", || async { "ok" }).pre_handler(|parts| {
			if parts.headers.contains_key("x-admin") {
				Ok(())
			} else {
				Err(Error::rejected(StatusCode::FORBIDDEN, "admin required"))
			}
		});
		let router = Router::new().route("/admin", decl.into_method_router());

		let res = router
			.clone()
			.oneshot(HttpRequest::builder().uri("/admin").body(Body::empty()).unwrap())
			.await
			.unwrap();
		assert_eq!(res.status(), StatusCode::FORBIDDEN);

		let res = router
			.oneshot(
				HttpRequest::builder().uri("/admin").header("x-admin", "1").body(Body::empty()).unwrap(),
			)
			.await
			.unwrap();
		assert_eq!(res.status(), StatusCode::OK);
	}
}

// vim: ts=4
