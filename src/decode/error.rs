use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Errors produced while decoding generic JSON values into record shapes.
#[derive(Debug, Error)]
pub enum DecodeError {
	/// Malformed JSON input text.
	#[error("parse: {0}")]
	Parse(#[from] serde_json::Error),
	/// Decode target or payload root is not an object-shaped record.
	#[error("invalid decode target: {reason}")]
	InvalidTarget {
		/// What was found instead of a record-shaped target.
		reason: String,
	},
	/// Discriminator property is missing, malformed, or has no binding.
	#[error("discriminator property {property:?} at {path}: {reason}")]
	Discriminator {
		/// Dotted field path of the polymorphic object.
		path: String,
		/// Discriminator property name that was consulted.
		property: String,
		/// Why resolution failed.
		reason: String,
	},
	/// Discriminator value has no registered factory.
	#[error("unknown kind: {kind}")]
	UnknownKind {
		/// The unresolvable discriminator value.
		kind: String,
	},
	/// Explicit null arrived in a non-optional field.
	#[error("required field {path} is null")]
	RequiredFieldNull {
		/// Dotted field path of the rejected null.
		path: String,
	},
	/// Value cannot be converted or narrowed to the destination kind.
	#[error("conversion at {path}: expected {expected}, got {got}")]
	Conversion {
		/// Dotted field path where conversion failed.
		path: String,
		/// Destination kind that was required.
		expected: &'static str,
		/// Description of the offending value.
		got: String,
	},
	/// Default literal declared on a kind that cannot carry one.
	#[error("unsupported default on {path}: {kind} fields cannot carry defaults")]
	UnsupportedDefaultType {
		/// Dotted field path of the offending declaration.
		path: String,
		/// Declared field kind.
		kind: &'static str,
	},
}

impl DecodeError {
	/// Prepend a parent path to the error's field-path context.
	pub(crate) fn prefixed(self, parent: &str) -> Self {
		if parent.is_empty() {
			return self;
		}
		let join = |path: String| {
			if path.is_empty() {
				parent.to_owned()
			} else {
				format!("{parent}.{path}")
			}
		};
		match self {
			Self::Discriminator { path, property, reason } => Self::Discriminator {
				path: join(path),
				property,
				reason,
			},
			Self::RequiredFieldNull { path } => Self::RequiredFieldNull { path: join(path) },
			Self::Conversion { path, expected, got } => Self::Conversion {
				path: join(path),
				expected,
				got,
			},
			Self::UnsupportedDefaultType { path, kind } => Self::UnsupportedDefaultType { path: join(path), kind },
			other => other,
		}
	}
}
