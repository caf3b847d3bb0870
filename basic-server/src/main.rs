use std::env;

use axum::{Json, http::StatusCode, routing::get};
use presetroute::host::{Host, RegisterOptions, RoutePrinter, Scope};
use presetroute::types::{Error, PrResult, RouteDeclaration};
use presetroute::{
	ApiPreset, PresetRegisterExt, RoutePreset, RoutePresetConfig, RoutePresetOpts, TransformRegistry,
};
use serde_json::{Value, json};
use tracing::info;

const DEFAULT_PRESET_CONFIG: &str = r#"{"onPresetRoute":["schema","constraints","preHandler"]}"#;

pub struct Config {
	pub listen: Box<str>,
	pub preset: RoutePresetConfig,
}

impl Config {
	fn from_env() -> PrResult<Self> {
		let listen = env::var("LISTEN").unwrap_or_else(|_| "127.0.0.1:8080".into());
		let preset = env::var("PRESET_CONFIG").unwrap_or_else(|_| DEFAULT_PRESET_CONFIG.into());
		Ok(Config { listen: listen.into(), preset: RoutePresetConfig::from_json(&preset)? })
	}
}

async fn hello() -> &'static str {
	"hello world"
}

async fn list_users() -> Json<Value> {
	Json(json!({ "users": [] }))
}

async fn create_user() -> (StatusCode, Json<Value>) {
	(StatusCode::CREATED, Json(json!({ "created": true })))
}

async fn list_admin_users() -> Json<Value> {
	Json(json!({ "adminUsers": [] }))
}

async fn delete_admin_user() -> Json<Value> {
	Json(json!({ "deleted": true }))
}

fn require_admin(parts: &axum::http::request::Parts) -> PrResult<()> {
	match parts.headers.get("x-admin") {
		Some(value) if value == "true" => Ok(()),
		_ => Err(Error::rejected(StatusCode::FORBIDDEN, "Admin required")),
	}
}

fn users(scope: &mut Scope<'_, ()>) -> PrResult<()> {
	scope.get("/users", list_users)?;
	scope.post("/users", create_user)
}

fn admin(scope: &mut Scope<'_, ()>) -> PrResult<()> {
	scope.get("/admin/users", list_admin_users)?;
	scope.route(RouteDeclaration::delete("/admin/users/{id}", delete_admin_user))
}

fn catalog(scope: &mut Scope<'_, ()>) -> PrResult<()> {
	scope.get("/", hello)?;
	scope.post("/", hello)
}

fn catalog_preset(tag: &str) -> ApiPreset {
	ApiPreset::new().schema(json!({ "tags": [tag] })).constraints(json!({ "version": "1.0.0" }))
}

fn build(config: Config) -> PrResult<Host> {
	let mut host = Host::new();
	let mut root = host.scope();
	root.plugin(RoutePrinter)?;
	root.plugin(RoutePreset::new(
		RoutePresetOpts::<(), ApiPreset>::from_config(config.preset, TransformRegistry::with_builtins())
			.on_register(|ctx, preset| info!("scope {:?} preset: {:?}", ctx.prefix(), preset)),
	))?;

	root.register(
		RegisterOptions::new().preset(
			ApiPreset::new().schema(json!({ "tags": ["users"], "security": [{ "bearerAuth": [] }] })),
		),
		users,
	)?;
	root.register(
		RegisterOptions::new().preset(
			ApiPreset::new()
				.schema(json!({ "tags": ["admin"], "security": [{ "adminAuth": [] }] }))
				.constraints(json!({ "version": "2.0.0" }))
				.pre_handler(require_admin),
		),
		admin,
	)?;
	root.register(RegisterOptions::new().prefix("/product").preset(catalog_preset("product")), catalog)?;
	root.register(RegisterOptions::new().prefix("/user").preset(catalog_preset("user")), catalog)?;
	root.get("/", hello)?;

	Ok(host)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> PrResult<()> {
	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_target(false)
		.init();

	let config = Config::from_env()?;
	let listen = config.listen.clone();
	let routes = build(config)?.ready();

	let table = routes.info();
	let router = routes.into_router().route("/routes", get(move || async move { Json(table) }));

	let listener = tokio::net::TcpListener::bind(&*listen).await?;
	info!("listening on {}", listen);
	axum::serve(listener, router).await?;
	Ok(())
}

// vim: ts=4
