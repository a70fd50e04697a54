use serde_json::{Map, Value};

use crate::decode::case::to_pascal;
use crate::decode::convert::{self, value_kind};
use crate::decode::{
	DecodeError, ElementKind, Factory, FieldDescriptor, FieldKind, GlobalKind, ParseText, Record, RecordDescriptor, Resolver, Result, Slot,
};

/// Decode a generic map with one global discriminator property and factory.
///
/// Every object in the payload, the root included, is resolved through the
/// factory; the root instance is constructed from the root map's
/// discriminator value and returned fully populated.
pub fn decode_map(map: &Map<String, Value>, discriminator: &str, factory: Factory) -> Result<Box<dyn Record>> {
	let resolver = GlobalKind::new(discriminator, factory);
	let kind = extract_kind(map, discriminator, "")?;
	let mut root = resolver.make("", kind)?;
	decode_object(map, root.as_mut(), &resolver, false, Some(discriminator), "")?;
	Ok(root)
}

/// Parse JSON text and decode it with one global discriminator and factory.
pub fn decode_bytes(bytes: &[u8], discriminator: &str, factory: Factory) -> Result<Box<dyn Record>> {
	let root = parse_object(bytes)?;
	decode_map(&root, discriminator, factory)
}

/// Decode a generic map into a caller-owned destination instance.
///
/// Polymorphic fields are resolved through the supplied strategy; when
/// `apply_defaults` is set, declared defaults are materialized for fields the
/// payload never mentioned.
pub fn decode_map_into<R: Record>(map: &Map<String, Value>, dest: &mut R, resolver: &dyn Resolver, apply_defaults: bool) -> Result<()> {
	decode_object(map, dest, resolver, apply_defaults, None, "")
}

/// Parse JSON text and decode it into a caller-owned destination instance.
pub fn decode_bytes_into<R: Record>(bytes: &[u8], dest: &mut R, resolver: &dyn Resolver, apply_defaults: bool) -> Result<()> {
	let root = parse_object(bytes)?;
	decode_map_into(&root, dest, resolver, apply_defaults)
}

fn parse_object(bytes: &[u8]) -> Result<Map<String, Value>> {
	let value: Value = serde_json::from_slice(bytes)?;
	match value {
		Value::Object(map) => Ok(map),
		other => Err(DecodeError::InvalidTarget {
			reason: format!("payload root is {}, expected an object", value_kind(&other)),
		}),
	}
}

fn decode_object(
	map: &Map<String, Value>,
	record: &mut dyn Record,
	resolver: &dyn Resolver,
	apply_defaults: bool,
	consumed: Option<&str>,
	path: &str,
) -> Result<()> {
	let desc = record.descriptor();
	let mut touched = vec![false; desc.fields.len()];

	for (key, value) in map {
		// The discriminator consumed to pick this shape never lands in it.
		if consumed == Some(key.as_str()) {
			continue;
		}
		let name = to_pascal(key);
		let Some((idx, field)) = desc.field(&name) else {
			continue;
		};
		touched[idx] = true;

		let field_path = join_path(path, key);
		// Binding paths use the declared identifier, so one registration
		// covers every input-key spelling of the field.
		let one_of_path = format!("{}.{}", desc.name, field.name);

		match value {
			Value::Object(child) => {
				if let Some(property) = resolver.discriminator(&one_of_path) {
					let kind = extract_kind(child, property, &field_path)?;
					let mut child_rec = resolver.make(&one_of_path, kind)?;
					decode_object(child, child_rec.as_mut(), resolver, apply_defaults, Some(property), &field_path)?;
					assign(record, field, Slot::Record(child_rec), path)?;
				} else {
					match field.kind {
						FieldKind::Record(make) => {
							let mut child_rec = make();
							decode_object(child, child_rec.as_mut(), resolver, apply_defaults, None, &field_path)?;
							assign(record, field, Slot::Record(child_rec), path)?;
						}
						FieldKind::Any => assign(record, field, Slot::Any(value.clone()), path)?,
						FieldKind::OneOf => {
							return Err(DecodeError::Discriminator {
								path: field_path,
								property: String::new(),
								reason: "no discriminator binding for one-of field".to_owned(),
							});
						}
						_ => return Err(conversion(&field_path, field.kind.name(), value)),
					}
				}
			}
			Value::Array(items) => match field.kind {
				FieldKind::Sequence(element) => {
					let slots = materialize_sequence(items, element, resolver, apply_defaults, &one_of_path, &field_path)?;
					assign(record, field, Slot::Sequence(slots), path)?;
				}
				FieldKind::Any => assign(record, field, Slot::Any(value.clone()), path)?,
				_ => return Err(conversion(&field_path, field.kind.name(), value)),
			},
			Value::Null => {
				if !field.optional {
					return Err(DecodeError::RequiredFieldNull { path: field_path });
				}
				// Optional null leaves the field unset; the field still
				// counts as touched so defaults never fire for it.
			}
			_ => match field.kind {
				FieldKind::Scalar(kind) => {
					let scalar = convert::convert_scalar(value, kind, &field_path)?;
					assign(record, field, Slot::Scalar(scalar), path)?;
				}
				FieldKind::Text(parse) => {
					let text = match value {
						Value::String(text) => text.clone(),
						other => other.to_string(),
					};
					let slot = parse_text(parse, &text, &field_path)?;
					assign(record, field, slot, path)?;
				}
				FieldKind::Any => assign(record, field, Slot::Any(value.clone()), path)?,
				_ => return Err(conversion(&field_path, field.kind.name(), value)),
			},
		}
	}

	if apply_defaults {
		fill_defaults(record, desc, &touched, path)?;
	}
	Ok(())
}

/// Build the ordered element slots for a sequence field.
fn materialize_sequence(
	items: &[Value],
	element: ElementKind,
	resolver: &dyn Resolver,
	apply_defaults: bool,
	one_of_path: &str,
	path: &str,
) -> Result<Vec<Slot>> {
	let mut slots = Vec::with_capacity(items.len());
	for (idx, item) in items.iter().enumerate() {
		let elem_path = format!("{path}[{idx}]");
		let slot = match item {
			Value::Object(child) => {
				if let Some(property) = resolver.discriminator(one_of_path) {
					let kind = extract_kind(child, property, &elem_path)?;
					let mut child_rec = resolver.make(one_of_path, kind)?;
					decode_object(child, child_rec.as_mut(), resolver, apply_defaults, Some(property), &elem_path)?;
					Slot::Record(child_rec)
				} else {
					match element {
						ElementKind::Record(make) => {
							let mut child_rec = make();
							decode_object(child, child_rec.as_mut(), resolver, apply_defaults, None, &elem_path)?;
							Slot::Record(child_rec)
						}
						ElementKind::Scalar(kind) => return Err(conversion(&elem_path, kind.name(), item)),
						ElementKind::OneOf => {
							return Err(DecodeError::Discriminator {
								path: elem_path,
								property: String::new(),
								reason: "no discriminator binding for one-of element".to_owned(),
							});
						}
					}
				}
			}
			Value::Null | Value::Array(_) => return Err(conversion(&elem_path, element_name(element), item)),
			scalar => match element {
				ElementKind::Scalar(kind) => Slot::Scalar(convert::convert_scalar(scalar, kind, &elem_path)?),
				ElementKind::Record(_) | ElementKind::OneOf => return Err(conversion(&elem_path, "record", item)),
			},
		};
		slots.push(slot);
	}
	Ok(slots)
}

fn fill_defaults(record: &mut dyn Record, desc: &RecordDescriptor, touched: &[bool], path: &str) -> Result<()> {
	for (idx, field) in desc.fields.iter().enumerate() {
		if touched[idx] {
			continue;
		}
		let Some(text) = field.default else {
			continue;
		};
		let field_path = join_path(path, field.name);
		let slot = match field.kind {
			FieldKind::Scalar(kind) => Slot::Scalar(convert::default_scalar(text, kind, &field_path)?),
			FieldKind::Text(parse) => parse_text(parse, text, &field_path)?,
			_ => {
				return Err(DecodeError::UnsupportedDefaultType {
					path: field_path,
					kind: field.kind.name(),
				});
			}
		};
		assign(record, field, slot, path)?;
	}
	Ok(())
}

fn parse_text(parse: ParseText, text: &str, path: &str) -> Result<Slot> {
	match parse(text) {
		Ok(parsed) => Ok(Slot::Custom(parsed)),
		Err(reason) => Err(DecodeError::Conversion {
			path: path.to_owned(),
			expected: "parseable text",
			got: reason,
		}),
	}
}

fn assign(record: &mut dyn Record, field: &FieldDescriptor, slot: Slot, parent: &str) -> Result<()> {
	record.assign(field.name, slot).map_err(|err| err.prefixed(parent))
}

fn extract_kind<'a>(map: &'a Map<String, Value>, property: &str, path: &str) -> Result<&'a str> {
	let value = map.get(property).ok_or_else(|| DecodeError::Discriminator {
		path: path.to_owned(),
		property: property.to_owned(),
		reason: "property is missing".to_owned(),
	})?;
	value.as_str().ok_or_else(|| DecodeError::Discriminator {
		path: path.to_owned(),
		property: property.to_owned(),
		reason: format!("property is {}, not a string", value_kind(value)),
	})
}

fn element_name(element: ElementKind) -> &'static str {
	match element {
		ElementKind::Scalar(kind) => kind.name(),
		ElementKind::Record(_) => "record",
		ElementKind::OneOf => "one-of record",
	}
}

fn conversion(path: &str, expected: &'static str, value: &Value) -> DecodeError {
	DecodeError::Conversion {
		path: path.to_owned(),
		expected,
		got: value_kind(value).to_owned(),
	}
}

fn join_path(parent: &str, key: &str) -> String {
	if parent.is_empty() {
		key.to_owned()
	} else {
		format!("{parent}.{key}")
	}
}
