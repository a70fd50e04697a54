use std::any::Any;
use std::fmt;

use serde_json::Value;

use crate::decode::{DecodeError, Result};

/// Constructor for a registered record shape.
pub type MakeRecord = fn() -> Box<dyn Record>;

/// Caller-supplied parser for text-backed custom field types.
///
/// Receives the field's text (payload scalar re-encoded, or a declared
/// default literal) and returns the parsed value boxed for downcast by the
/// destination's [`Record::assign`].
pub type ParseText = fn(text: &str) -> std::result::Result<Box<dyn Any>, String>;

/// Field table for one registered destination shape, built once per type.
#[derive(Debug)]
pub struct RecordDescriptor {
	/// Shape name; the container segment of `Container.field` resolver paths.
	pub name: &'static str,
	/// Field declarations in source order.
	pub fields: &'static [FieldDescriptor],
}

impl RecordDescriptor {
	/// Look up a field declaration by its declared PascalCase identifier.
	pub fn field(&self, name: &str) -> Option<(usize, &FieldDescriptor)> {
		self.fields.iter().enumerate().find(|(_, field)| field.name == name)
	}
}

/// One declared field of a destination shape.
#[derive(Debug)]
pub struct FieldDescriptor {
	/// Declared PascalCase field identifier.
	pub name: &'static str,
	/// Declared field kind.
	pub kind: FieldKind,
	/// Whether the destination storage is `Option<…>`.
	pub optional: bool,
	/// Textual default literal, applied only to fields the payload omits.
	pub default: Option<&'static str>,
}

/// Declared kind of a destination field.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
	/// Plain scalar of the given kind.
	Scalar(ScalarKind),
	/// Statically known nested record shape with its constructor.
	Record(MakeRecord),
	/// Ordered sequence of the declared element kind.
	Sequence(ElementKind),
	/// Polymorphic placeholder resolved per instance via the resolver.
	OneOf,
	/// Opaque destination storing the raw generic value.
	Any,
	/// Text-backed custom type parsed by a caller-supplied function.
	Text(ParseText),
}

impl FieldKind {
	/// Short kind name for diagnostics.
	pub fn name(&self) -> &'static str {
		match self {
			Self::Scalar(kind) => kind.name(),
			Self::Record(_) => "record",
			Self::Sequence(_) => "sequence",
			Self::OneOf => "one-of",
			Self::Any => "any",
			Self::Text(_) => "text",
		}
	}
}

/// Declared element kind of a sequence field.
#[derive(Debug, Clone, Copy)]
pub enum ElementKind {
	/// Scalar elements of the given kind.
	Scalar(ScalarKind),
	/// Record elements with the shape's constructor.
	Record(MakeRecord),
	/// Polymorphic elements resolved per instance via the resolver.
	OneOf,
}

/// Closed set of scalar destination kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
	/// `bool`.
	Bool,
	/// `i8`.
	I8,
	/// `i16`.
	I16,
	/// `i32`.
	I32,
	/// `i64`.
	I64,
	/// `u8`.
	U8,
	/// `u16`.
	U16,
	/// `u32`.
	U32,
	/// `u64`.
	U64,
	/// `f32`.
	F32,
	/// `f64`.
	F64,
	/// Owned string.
	Str,
}

impl ScalarKind {
	/// Short kind name for diagnostics.
	pub fn name(&self) -> &'static str {
		match self {
			Self::Bool => "bool",
			Self::I8 => "i8",
			Self::I16 => "i16",
			Self::I32 => "i32",
			Self::I64 => "i64",
			Self::U8 => "u8",
			Self::U16 => "u16",
			Self::U32 => "u32",
			Self::U64 => "u64",
			Self::F32 => "f32",
			Self::F64 => "f64",
			Self::Str => "string",
		}
	}
}

/// A scalar already narrowed to the destination's exact width.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
	/// Boolean value.
	Bool(bool),
	/// 8-bit signed integer.
	I8(i8),
	/// 16-bit signed integer.
	I16(i16),
	/// 32-bit signed integer.
	I32(i32),
	/// 64-bit signed integer.
	I64(i64),
	/// 8-bit unsigned integer.
	U8(u8),
	/// 16-bit unsigned integer.
	U16(u16),
	/// 32-bit unsigned integer.
	U32(u32),
	/// 64-bit unsigned integer.
	U64(u64),
	/// 32-bit float.
	F32(f32),
	/// 64-bit float.
	F64(f64),
	/// Owned string.
	Str(String),
}

/// Registration trait for destination record shapes.
///
/// Implementors pair a static [`RecordDescriptor`] with an `assign` method
/// that installs decoded [`Slot`] values into concrete storage. This pair is
/// the per-type registration step that replaces runtime field reflection.
pub trait Record: Any + fmt::Debug {
	/// Field table for this shape.
	fn descriptor(&self) -> &'static RecordDescriptor;

	/// Install a decoded value into the named declared field.
	fn assign(&mut self, field: &str, slot: Slot) -> Result<()>;
}

/// Typed package handed from the engine to [`Record::assign`].
pub enum Slot {
	/// Converted scalar value.
	Scalar(ScalarValue),
	/// Fully decoded nested record.
	Record(Box<dyn Record>),
	/// Ordered decoded sequence elements. The destination's `assign` picks
	/// the storage wrapping: plain `Vec<T>`, `Vec<Box<T>>`, or
	/// `Option<Vec<T>>` when absent must stay distinguishable from empty.
	Sequence(Vec<Slot>),
	/// Raw generic value for opaque fields.
	Any(Value),
	/// Caller-parsed custom value from a text-backed field.
	Custom(Box<dyn Any>),
}

impl fmt::Debug for Slot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Scalar(value) => f.debug_tuple("Scalar").field(value).finish(),
			Self::Record(record) => f.debug_tuple("Record").field(record).finish(),
			Self::Sequence(slots) => f.debug_tuple("Sequence").field(slots).finish(),
			Self::Any(value) => f.debug_tuple("Any").field(value).finish(),
			Self::Custom(_) => f.write_str("Custom(..)"),
		}
	}
}

macro_rules! scalar_accessor {
	($fn_name:ident, $variant:ident, $ty:ty, $expected:literal) => {
		/// Unwrap the slot as this exact scalar width.
		pub fn $fn_name(self, field: &str) -> Result<$ty> {
			match self {
				Self::Scalar(ScalarValue::$variant(value)) => Ok(value),
				other => Err(other.mismatch(field, $expected)),
			}
		}
	};
}

impl Slot {
	/// Short description of the slot contents for diagnostics.
	pub fn kind_name(&self) -> &'static str {
		match self {
			Self::Scalar(_) => "scalar",
			Self::Record(_) => "record",
			Self::Sequence(_) => "sequence",
			Self::Any(_) => "any",
			Self::Custom(_) => "custom",
		}
	}

	fn mismatch(&self, field: &str, expected: &'static str) -> DecodeError {
		DecodeError::Conversion {
			path: field.to_owned(),
			expected,
			got: self.kind_name().to_owned(),
		}
	}

	scalar_accessor!(into_bool, Bool, bool, "bool");
	scalar_accessor!(into_i8, I8, i8, "i8");
	scalar_accessor!(into_i16, I16, i16, "i16");
	scalar_accessor!(into_i32, I32, i32, "i32");
	scalar_accessor!(into_i64, I64, i64, "i64");
	scalar_accessor!(into_u8, U8, u8, "u8");
	scalar_accessor!(into_u16, U16, u16, "u16");
	scalar_accessor!(into_u32, U32, u32, "u32");
	scalar_accessor!(into_u64, U64, u64, "u64");
	scalar_accessor!(into_f32, F32, f32, "f32");
	scalar_accessor!(into_f64, F64, f64, "f64");
	scalar_accessor!(into_string, Str, String, "string");

	/// Unwrap a decoded record without fixing its concrete type.
	pub fn into_dyn_record(self, field: &str) -> Result<Box<dyn Record>> {
		match self {
			Self::Record(record) => Ok(record),
			other => Err(other.mismatch(field, "record")),
		}
	}

	/// Unwrap and downcast a decoded record to its concrete type.
	pub fn into_record<T: Record>(self, field: &str) -> Result<T> {
		let record = self.into_dyn_record(field)?;
		downcast_record(record, field)
	}

	/// Unwrap the decoded sequence elements.
	pub fn into_seq(self, field: &str) -> Result<Vec<Slot>> {
		match self {
			Self::Sequence(slots) => Ok(slots),
			other => Err(other.mismatch(field, "sequence")),
		}
	}

	/// Unwrap a sequence of records, downcasting each element.
	pub fn into_records<T: Record>(self, field: &str) -> Result<Vec<T>> {
		self.into_seq(field)?
			.into_iter()
			.map(|slot| slot.into_record::<T>(field))
			.collect()
	}

	/// Unwrap a sequence of records without fixing their concrete types.
	pub fn into_dyn_records(self, field: &str) -> Result<Vec<Box<dyn Record>>> {
		self.into_seq(field)?
			.into_iter()
			.map(|slot| slot.into_dyn_record(field))
			.collect()
	}

	/// Unwrap a sequence of strings.
	pub fn into_strings(self, field: &str) -> Result<Vec<String>> {
		self.into_seq(field)?
			.into_iter()
			.map(|slot| slot.into_string(field))
			.collect()
	}

	/// Unwrap the raw generic value of an opaque field.
	pub fn into_value(self, field: &str) -> Result<Value> {
		match self {
			Self::Any(value) => Ok(value),
			other => Err(other.mismatch(field, "any")),
		}
	}

	/// Unwrap and downcast a caller-parsed custom value.
	pub fn into_custom<T: Any>(self, field: &str) -> Result<T> {
		match self {
			Self::Custom(value) => match value.downcast::<T>() {
				Ok(boxed) => Ok(*boxed),
				Err(_) => Err(DecodeError::Conversion {
					path: field.to_owned(),
					expected: std::any::type_name::<T>(),
					got: "custom value of a different type".to_owned(),
				}),
			},
			other => Err(other.mismatch(field, "custom")),
		}
	}
}

fn downcast_record<T: Record>(record: Box<dyn Record>, field: &str) -> Result<T> {
	let shape = record.descriptor().name;
	let any: Box<dyn Any> = record;
	match any.downcast::<T>() {
		Ok(boxed) => Ok(*boxed),
		Err(_) => Err(DecodeError::Conversion {
			path: field.to_owned(),
			expected: std::any::type_name::<T>(),
			got: shape.to_owned(),
		}),
	}
}
