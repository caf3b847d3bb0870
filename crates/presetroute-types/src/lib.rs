//! Shared types for presetroute.
//!
//! The host crate and the preset plugin both speak in terms of the types
//! defined here: the error type, the `Preset` trait with its untyped
//! `PresetConfig` implementation, and the route declaration handed to
//! registration hooks.

#![forbid(unsafe_code)]

pub mod error;
pub mod prelude;
pub mod preset;
pub mod route;

pub use error::{Error, PrResult};
pub use preset::{JsonMap, Preset, PresetConfig};
pub use route::{PreHandler, RouteConfig, RouteDeclaration, RouteInfo};

// vim: ts=4
