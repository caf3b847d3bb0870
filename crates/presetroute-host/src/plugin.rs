//! Plugin interface

use crate::prelude::*;
use crate::scope::Scope;

/// Something that installs hooks or decorations on a scope
pub trait Plugin<S> {
	/// Stable name, queryable through `has_plugin`
	fn name(&self) -> &str;

	fn register(self, scope: &mut Scope<'_, S>) -> PrResult<()>
	where
		Self: Sized;
}

/// Logs every route as it is declared
#[derive(Debug, Clone, Copy, Default)]
pub struct RoutePrinter;

impl RoutePrinter {
	pub const NAME: &'static str = "print-routes";
}

impl<S> Plugin<S> for RoutePrinter
where
	S: Clone + Send + Sync + 'static,
{
	fn name(&self) -> &str {
		Self::NAME
	}

	fn register(self, scope: &mut Scope<'_, S>) -> PrResult<()> {
		scope.add_on_route(|ctx, route| {
			info!(
				"{:<7} {} (scope {:?}{})",
				route.method.as_str(),
				route.url,
				ctx.prefix(),
				if route.exposed_head { ", exposed HEAD" } else { "" }
			);
			Ok(())
		});
		Ok(())
	}
}

// vim: ts=4
