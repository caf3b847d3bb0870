//! Presets carried through to a mounted axum router

#![allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]

mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use presetroute::host::{Host, RegisterOptions};
use presetroute::types::{Error, RouteDeclaration};
use presetroute::{ApiPreset, PresetRegisterExt, RoutePreset, RoutePresetOpts, transforms};
use serde_json::{Value, json};
use tower::ServiceExt;

use common::ok;

fn admin_preset() -> ApiPreset {
	ApiPreset::new()
		.schema(json!({ "tags": ["admin"], "security": [{ "adminAuth": [] }] }))
		.constraints(json!({ "version": "2.0.0" }))
		.pre_handler(|parts| {
			if parts.headers.get("x-admin").is_some_and(|v| v == "true") {
				Ok(())
			} else {
				Err(Error::rejected(StatusCode::FORBIDDEN, "Admin required"))
			}
		})
}

fn admin_host() -> Host<()> {
	let mut host = Host::new();
	let mut root = host.scope();
	root.plugin(RoutePreset::new(
		RoutePresetOpts::<(), ApiPreset>::new()
			.on_preset_route(transforms::merge_schema)
			.on_preset_route(transforms::merge_constraints)
			.on_preset_route(transforms::append_pre_handlers),
	))
	.unwrap();
	root.get("/health", ok).unwrap();
	root.register(RegisterOptions::new().prefix("/admin").preset(admin_preset()), |admin| {
		admin.get("/users", ok)?;
		admin.route(RouteDeclaration::delete("/users/{id}", ok).schema(json!({ "tags": ["users"] })))?;
		admin.route(RouteDeclaration::get("/public", ok).skip_preset(true))
	})
	.unwrap();
	host
}

async fn call(router: axum::Router, method: Method, uri: &str, admin: bool) -> (StatusCode, Value) {
	let mut req = Request::builder().method(method).uri(uri);
	if admin {
		req = req.header("x-admin", "true");
	}
	let res = router.oneshot(req.body(Body::empty()).unwrap()).await.unwrap();
	let status = res.status();
	let body = to_bytes(res.into_body(), 64 * 1024).await.unwrap();
	let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
	(status, value)
}

#[test]
fn test_route_table() {
	let routes = admin_host().ready();
	let info = routes.info();
	// /health, /admin/users, /admin/public with HEAD twins, plus DELETE
	assert_eq!(info.len(), 7);

	let users = routes.find(&Method::GET, "/admin/users").unwrap();
	assert_eq!(users.schema["tags"], json!(["admin"]));
	assert_eq!(users.constraints["version"], "2.0.0");
	assert_eq!(users.pre_handlers.len(), 1);

	let delete = routes.find(&Method::DELETE, "/admin/users/{id}").unwrap();
	assert_eq!(delete.schema["tags"], json!(["users"]));
	assert_eq!(delete.schema["security"], json!([{ "adminAuth": [] }]));

	let health = routes.find(&Method::GET, "/health").unwrap();
	assert!(health.schema.is_empty());
	assert!(health.pre_handlers.is_empty());
}

#[tokio::test]
async fn test_pre_handler_guards_preset_routes() {
	let router = admin_host().ready().into_router();

	let (status, body) = call(router.clone(), Method::GET, "/admin/users", false).await;
	assert_eq!(status, StatusCode::FORBIDDEN);
	assert_eq!(body["error"]["code"], "E-REJECTED");
	assert_eq!(body["error"]["message"], "Admin required");

	let (status, _) = call(router.clone(), Method::GET, "/admin/users", true).await;
	assert_eq!(status, StatusCode::OK);

	let (status, _) = call(router.clone(), Method::DELETE, "/admin/users/42", false).await;
	assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unguarded_routes() {
	let router = admin_host().ready().into_router();

	let (status, _) = call(router.clone(), Method::GET, "/health", false).await;
	assert_eq!(status, StatusCode::OK);

	// Opted out of the preset, so no pre-handler either
	let (status, _) = call(router.clone(), Method::GET, "/admin/public", false).await;
	assert_eq!(status, StatusCode::OK);

	let (status, _) = call(router, Method::HEAD, "/health", false).await;
	assert_eq!(status, StatusCode::OK);
}

// vim: ts=4
