use std::collections::HashMap;

use crate::decode::{DecodeError, Record, Result};

/// Constructor from a discriminator value to a fresh record instance.
///
/// Returns [`DecodeError::UnknownKind`] for values with no registered shape.
pub type Factory = fn(kind: &str) -> Result<Box<dyn Record>>;

/// Strategy interface for resolving polymorphic fields.
///
/// The object decoder consults it with `Container.field` paths and stays
/// agnostic of which policy is behind the trait.
pub trait Resolver {
	/// Discriminator property name for the path, `None` when the field is
	/// not polymorphic.
	fn discriminator(&self, path: &str) -> Option<&str>;

	/// Construct an instance for the discriminator value found at the path.
	fn make(&self, path: &str, kind: &str) -> Result<Box<dyn Record>>;
}

/// Whole-payload policy: one discriminator property and one factory apply to
/// every object, the root included.
pub struct GlobalKind {
	property: String,
	factory: Factory,
}

impl GlobalKind {
	/// Build the policy from the property name and the global factory.
	pub fn new(property: impl Into<String>, factory: Factory) -> Self {
		Self {
			property: property.into(),
			factory,
		}
	}
}

impl Resolver for GlobalKind {
	fn discriminator(&self, _path: &str) -> Option<&str> {
		Some(&self.property)
	}

	fn make(&self, _path: &str, kind: &str) -> Result<Box<dyn Record>> {
		(self.factory)(kind)
	}
}

/// Path-scoped policy: each `Container.field` path may carry its own
/// discriminator property and factory; unbound paths are not polymorphic.
#[derive(Default)]
pub struct PathScoped {
	bindings: HashMap<String, Binding>,
}

struct Binding {
	property: String,
	factory: Factory,
}

impl PathScoped {
	/// Empty binding set; decodes without any polymorphic fields.
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a discriminator binding for a `Container.field` path.
	pub fn bind(mut self, path: impl Into<String>, property: impl Into<String>, factory: Factory) -> Self {
		self.bindings.insert(
			path.into(),
			Binding {
				property: property.into(),
				factory,
			},
		);
		self
	}
}

impl Resolver for PathScoped {
	fn discriminator(&self, path: &str) -> Option<&str> {
		self.bindings.get(path).map(|binding| binding.property.as_str())
	}

	fn make(&self, path: &str, kind: &str) -> Result<Box<dyn Record>> {
		let binding = self.bindings.get(path).ok_or_else(|| DecodeError::Discriminator {
			path: path.to_owned(),
			property: String::new(),
			reason: "no discriminator binding for path".to_owned(),
		})?;
		(binding.factory)(kind)
	}
}
