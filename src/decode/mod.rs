mod case;
mod convert;
mod decoder;
mod error;
mod resolve;
mod schema;

/// Decoding entry points for both discriminator strategies.
pub use decoder::{decode_bytes, decode_bytes_into, decode_map, decode_map_into};
/// Error and result aliases.
pub use error::{DecodeError, Result};
/// Strategy interface and the built-in resolver policies.
pub use resolve::{Factory, GlobalKind, PathScoped, Resolver};
/// Destination descriptor tables, registration trait, and decoded values.
pub use schema::{
	ElementKind, FieldDescriptor, FieldKind, MakeRecord, ParseText, Record, RecordDescriptor, ScalarKind, ScalarValue, Slot,
};
