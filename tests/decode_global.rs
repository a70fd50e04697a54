#![allow(missing_docs)]

use polydec::decode::{self, DecodeError, FieldDescriptor, FieldKind, ScalarKind, Slot, decode_bytes, decode_map};
use serde_json::{Map, Value, json};

#[derive(Debug, Default)]
struct Record {
	name: String,
	optional: Option<String>,
	num: Option<i64>,
	slice: Vec<String>,
	sub: Option<Box<dyn decode::Record>>,
}

static RECORD: decode::RecordDescriptor = decode::RecordDescriptor {
	name: "Record",
	fields: &[
		FieldDescriptor {
			name: "Name",
			kind: FieldKind::Scalar(ScalarKind::Str),
			optional: false,
			default: None,
		},
		FieldDescriptor {
			name: "Optional",
			kind: FieldKind::Scalar(ScalarKind::Str),
			optional: true,
			default: None,
		},
		FieldDescriptor {
			name: "Num",
			kind: FieldKind::Scalar(ScalarKind::I64),
			optional: true,
			default: None,
		},
		FieldDescriptor {
			name: "Slice",
			kind: FieldKind::Sequence(decode::ElementKind::Scalar(ScalarKind::Str)),
			optional: false,
			default: None,
		},
		FieldDescriptor {
			name: "Sub",
			kind: FieldKind::OneOf,
			optional: true,
			default: None,
		},
	],
};

impl decode::Record for Record {
	fn descriptor(&self) -> &'static decode::RecordDescriptor {
		&RECORD
	}

	fn assign(&mut self, field: &str, slot: Slot) -> decode::Result<()> {
		match field {
			"Name" => self.name = slot.into_string(field)?,
			"Optional" => self.optional = Some(slot.into_string(field)?),
			"Num" => self.num = Some(slot.into_i64(field)?),
			"Slice" => self.slice = slot.into_strings(field)?,
			"Sub" => self.sub = Some(slot.into_dyn_record(field)?),
			_ => {}
		}
		Ok(())
	}
}

#[derive(Debug, Default, PartialEq)]
struct SubRecord {
	name: Option<String>,
}

static SUB_RECORD: decode::RecordDescriptor = decode::RecordDescriptor {
	name: "SubRecord",
	fields: &[FieldDescriptor {
		name: "Name",
		kind: FieldKind::Scalar(ScalarKind::Str),
		optional: true,
		default: None,
	}],
};

impl decode::Record for SubRecord {
	fn descriptor(&self) -> &'static decode::RecordDescriptor {
		&SUB_RECORD
	}

	fn assign(&mut self, field: &str, slot: Slot) -> decode::Result<()> {
		if field == "Name" {
			self.name = Some(slot.into_string(field)?);
		}
		Ok(())
	}
}

#[derive(Debug, Default)]
struct SubRecord2 {
	name: String,
	ptr_name: Option<String>,
	subs: Vec<SubRecord>,
}

static SUB_RECORD2: decode::RecordDescriptor = decode::RecordDescriptor {
	name: "SubRecord2",
	fields: &[
		FieldDescriptor {
			name: "Name",
			kind: FieldKind::Scalar(ScalarKind::Str),
			optional: false,
			default: None,
		},
		FieldDescriptor {
			name: "PtrName",
			kind: FieldKind::Scalar(ScalarKind::Str),
			optional: true,
			default: None,
		},
		FieldDescriptor {
			name: "Subs",
			kind: FieldKind::Sequence(decode::ElementKind::OneOf),
			optional: false,
			default: None,
		},
	],
};

impl decode::Record for SubRecord2 {
	fn descriptor(&self) -> &'static decode::RecordDescriptor {
		&SUB_RECORD2
	}

	fn assign(&mut self, field: &str, slot: Slot) -> decode::Result<()> {
		match field {
			"Name" => self.name = slot.into_string(field)?,
			"PtrName" => self.ptr_name = Some(slot.into_string(field)?),
			"Subs" => self.subs = slot.into_records::<SubRecord>(field)?,
			_ => {}
		}
		Ok(())
	}
}

fn factory(kind: &str) -> decode::Result<Box<dyn decode::Record>> {
	match kind {
		"record" => Ok(Box::new(Record::default())),
		"sub_record" => Ok(Box::new(SubRecord::default())),
		"sub_record2" => Ok(Box::new(SubRecord2::default())),
		_ => Err(DecodeError::UnknownKind { kind: kind.to_owned() }),
	}
}

fn nested_payload() -> Map<String, Value> {
	object(json!({
		"name": "foo",
		"kind": "record",
		"slice": ["foo", "bar"],
		"sub": {
			"name": "bar",
			"kind": "sub_record",
		},
	}))
}

#[test]
fn nested_object_decodes_through_the_factory() {
	let rec = decode_map(&nested_payload(), "kind", factory).expect("decode succeeds");
	let rec = downcast::<Record>(rec);

	assert_eq!(rec.name, "foo");
	assert_eq!(rec.slice, vec!["foo".to_owned(), "bar".to_owned()]);
	assert_eq!(rec.optional, None);
	assert_eq!(rec.num, None);

	let sub = downcast::<SubRecord>(rec.sub.expect("sub is set"));
	assert_eq!(*sub, SubRecord { name: Some("bar".to_owned()) });
}

#[test]
fn discriminator_property_is_not_written_into_the_destination() {
	let rec = decode_map(&nested_payload(), "kind", factory).expect("decode succeeds");
	let rec = downcast::<Record>(rec);
	// "kind" translates to no declared field, and even a field named Kind
	// would stay empty: the consumed property is skipped outright.
	assert_eq!(rec.name, "foo");
}

#[test]
fn decoding_twice_yields_structurally_equal_results() {
	let first = downcast::<Record>(decode_map(&nested_payload(), "kind", factory).expect("first decode"));
	let second = downcast::<Record>(decode_map(&nested_payload(), "kind", factory).expect("second decode"));

	assert_eq!(first.name, second.name);
	assert_eq!(first.slice, second.slice);
	let first_sub = downcast::<SubRecord>(first.sub.expect("first sub"));
	let second_sub = downcast::<SubRecord>(second.sub.expect("second sub"));
	assert_eq!(first_sub, second_sub);
}

#[test]
fn missing_discriminator_property_is_a_discriminator_error() {
	let err = decode_map(&nested_payload(), "kib", factory).unwrap_err();
	assert!(matches!(err, DecodeError::Discriminator { .. }));
}

#[test]
fn discriminator_value_without_factory_entry_is_unknown_kind() {
	let err = decode_map(&nested_payload(), "name", factory).unwrap_err();
	assert!(matches!(err, DecodeError::UnknownKind { .. }));
}

#[test]
fn unknown_child_kind_aborts_the_whole_decode() {
	let map = object(json!({
		"name": "foo",
		"kind": "record",
		"sub": { "name": "bar", "kind": "unknown" },
	}));
	let err = decode_map(&map, "kind", factory).unwrap_err();
	assert!(matches!(err, DecodeError::UnknownKind { .. }));
}

#[test]
fn unknown_kind_inside_a_sequence_aborts_the_whole_decode() {
	let map = object(json!({
		"name": "foo",
		"kind": "record",
		"sub": {
			"kind": "sub_record2",
			"name": "s2",
			"subs": [ { "kind": "unknown", "name": "1" } ],
		},
	}));
	let err = decode_map(&map, "kind", factory).unwrap_err();
	assert!(matches!(err, DecodeError::UnknownKind { .. }));
}

#[test]
fn different_subtype_with_pointer_and_sequence_fields_decodes() {
	let map = object(json!({
		"name": "foo",
		"kind": "record",
		"slice": ["foo", "bar"],
		"sub": {
			"kind": "sub_record2",
			"name": "sub_record2",
			"ptr_name": "sub_record2",
			"subs": [ { "kind": "sub_record", "name": "1" } ],
		},
	}));
	let rec = downcast::<Record>(decode_map(&map, "kind", factory).expect("decode succeeds"));
	let sub = downcast::<SubRecord2>(rec.sub.expect("sub is set"));

	assert_eq!(sub.name, "sub_record2");
	assert_eq!(sub.ptr_name, Some("sub_record2".to_owned()));
	assert_eq!(sub.subs, vec![SubRecord { name: Some("1".to_owned()) }]);
}

#[test]
fn misspelled_input_keys_are_silently_ignored() {
	let map = object(json!({
		"name": "foo",
		"kind": "record",
		"sub": {
			"kind": "sub_record2",
			"name": "sub_record2",
			"ptrname": "sub_record2",
			"namer": "sub_record2",
			"subs": [],
		},
	}));
	let rec = downcast::<Record>(decode_map(&map, "kind", factory).expect("decode succeeds"));
	let sub = downcast::<SubRecord2>(rec.sub.expect("sub is set"));

	// "ptrname" has no word boundary, so it does not reach PtrName.
	assert_eq!(sub.ptr_name, None);
	assert!(sub.subs.is_empty(), "explicit empty sequence stays empty, not unset");
}

#[test]
fn scalar_where_an_object_is_required_is_a_conversion_error() {
	let map = object(json!({
		"name": "foo",
		"kind": "record",
		"sub": "12",
	}));
	let err = decode_map(&map, "kind", factory).unwrap_err();
	assert!(matches!(err, DecodeError::Conversion { .. }));
}

#[test]
fn byte_input_round_trips_through_the_parser() {
	let bytes = serde_json::to_vec(&Value::Object(nested_payload())).expect("fixture serializes");
	let rec = downcast::<Record>(decode_bytes(&bytes, "kind", factory).expect("decode succeeds"));
	assert_eq!(rec.name, "foo");
}

#[test]
fn truncated_json_is_a_parse_error() {
	let bytes = serde_json::to_vec(&Value::Object(nested_payload())).expect("fixture serializes");
	let err = decode_bytes(&bytes[1..], "kind", factory).unwrap_err();
	assert!(matches!(err, DecodeError::Parse(_)));
}

#[test]
fn non_object_payload_root_is_an_invalid_target() {
	let err = decode_bytes(b"42", "kind", factory).unwrap_err();
	assert!(matches!(err, DecodeError::InvalidTarget { .. }));
}

fn object(value: Value) -> Map<String, Value> {
	match value {
		Value::Object(map) => map,
		_ => panic!("test payload must be an object"),
	}
}

fn downcast<T: decode::Record>(record: Box<dyn decode::Record>) -> Box<T> {
	let any: Box<dyn std::any::Any> = record;
	any.downcast::<T>().expect("concrete type matches")
}
