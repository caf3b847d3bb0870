//! Scoped route registration host.
//!
//! Routes are declared inside nested scopes. Each scope has a path prefix,
//! typed decorations copied from its parent, and two kinds of hooks:
//!
//! - register hooks, run when a child scope is registered (before its body),
//! - route hooks, run for every route before it is stored.
//!
//! Plugins install hooks and decorations on the scope they are registered on.
//! Once registration is done, `Host::ready` returns the route table, which can
//! be inspected or mounted onto an axum `Router`.

#![forbid(unsafe_code)]

pub mod extensions;
pub mod host;
pub mod plugin;
pub mod prelude;
pub mod scope;

pub use host::{Host, HostOpts, Routes};
pub use plugin::{Plugin, RoutePrinter};
pub use scope::{OnRegisterHook, OnRouteHook, RegisterOptions, Scope, ScopeCtx};

// vim: ts=4
