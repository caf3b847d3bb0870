//! Type-keyed value map with copy-on-inherit semantics
//!
//! Used for scope decorations and for plugin-specific registration options.
//! Cloning the map clones every stored value, so a child scope gets its own
//! copy of the parent's decorations instead of a reference to them.

use std::any::{Any, TypeId};
use std::collections::HashMap;

trait ExtensionValue: Any + Send + Sync {
	fn clone_box(&self) -> Box<dyn ExtensionValue>;
	fn as_any(&self) -> &dyn Any;
	fn as_any_mut(&mut self) -> &mut dyn Any;
	fn into_any(self: Box<Self>) -> Box<dyn Any>;
	fn type_name(&self) -> &'static str;
}

impl<T: Any + Clone + Send + Sync> ExtensionValue for T {
	fn clone_box(&self) -> Box<dyn ExtensionValue> {
		Box::new(self.clone())
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}

	fn into_any(self: Box<Self>) -> Box<dyn Any> {
		self
	}

	fn type_name(&self) -> &'static str {
		std::any::type_name::<T>()
	}
}

#[derive(Default)]
pub struct Extensions {
	map: HashMap<TypeId, Box<dyn ExtensionValue>>,
}

impl Extensions {
	pub fn new() -> Self {
		Self { map: HashMap::new() }
	}

	/// Stores `val`, returning the previous value of the same type
	pub fn insert<T: Clone + Send + Sync + 'static>(&mut self, val: T) -> Option<T> {
		let prev = self.map.insert(TypeId::of::<T>(), Box::new(val))?;
		prev.into_any().downcast::<T>().ok().map(|b| *b)
	}

	pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
		let value: &dyn ExtensionValue = self.map.get(&TypeId::of::<T>())?.as_ref();
		value.as_any().downcast_ref::<T>()
	}

	pub fn get_mut<T: Send + Sync + 'static>(&mut self) -> Option<&mut T> {
		let value: &mut dyn ExtensionValue = self.map.get_mut(&TypeId::of::<T>())?.as_mut();
		value.as_any_mut().downcast_mut::<T>()
	}

	pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
		self.map.contains_key(&TypeId::of::<T>())
	}
}

impl Clone for Extensions {
	fn clone(&self) -> Self {
		Self { map: self.map.iter().map(|(k, v)| (*k, (**v).clone_box())).collect() }
	}
}

impl std::fmt::Debug for Extensions {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_set().entries(self.map.values().map(|v| (**v).type_name())).finish()
	}
}


// vim: ts=4
