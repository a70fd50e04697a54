use serde_json::Value;

use crate::decode::{DecodeError, Result, ScalarKind, ScalarValue};

/// Short name of a generic value's payload kind for diagnostics.
pub(crate) fn value_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "bool",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

/// Convert a payload scalar into the exact destination width.
///
/// Same-kind values pass through; cross-width numerics narrow or widen with
/// `as`-cast semantics, so out-of-range payload values truncate silently.
pub(crate) fn convert_scalar(value: &Value, kind: ScalarKind, path: &str) -> Result<ScalarValue> {
	let mismatch = || DecodeError::Conversion {
		path: path.to_owned(),
		expected: kind.name(),
		got: value_kind(value).to_owned(),
	};

	match kind {
		ScalarKind::Bool => value.as_bool().map(ScalarValue::Bool).ok_or_else(mismatch),
		ScalarKind::Str => value.as_str().map(|text| ScalarValue::Str(text.to_owned())).ok_or_else(mismatch),
		ScalarKind::F32 => value.as_f64().map(|num| ScalarValue::F32(num as f32)).ok_or_else(mismatch),
		ScalarKind::F64 => value.as_f64().map(ScalarValue::F64).ok_or_else(mismatch),
		_ => {
			let wide = numeric_wide(value).ok_or_else(mismatch)?;
			narrow(wide, kind).ok_or_else(mismatch)
		}
	}
}

/// Materialize a declared textual default into the destination kind.
///
/// Integers parse base-agnostically (`0x`, `0o`, `0b` prefixes accepted),
/// floats use standard decimal parsing, booleans accept exactly `true` and
/// `false`. Surrounding whitespace is ignored for every kind except strings,
/// which stay byte-for-byte. Unlike payload conversion, a default that does
/// not fit the declared width is rejected.
pub(crate) fn default_scalar(text: &str, kind: ScalarKind, path: &str) -> Result<ScalarValue> {
	let bad = |expected: &'static str| DecodeError::Conversion {
		path: path.to_owned(),
		expected,
		got: format!("default literal {text:?}"),
	};
	let lexeme = text.trim();

	match kind {
		ScalarKind::Bool => match lexeme {
			"true" => Ok(ScalarValue::Bool(true)),
			"false" => Ok(ScalarValue::Bool(false)),
			_ => Err(bad("bool")),
		},
		ScalarKind::Str => Ok(ScalarValue::Str(text.to_owned())),
		ScalarKind::F32 => lexeme.parse::<f32>().map(ScalarValue::F32).map_err(|_| bad("f32")),
		ScalarKind::F64 => lexeme.parse::<f64>().map(ScalarValue::F64).map_err(|_| bad("f64")),
		_ => {
			let wide = parse_int_text(lexeme).ok_or_else(|| bad(kind.name()))?;
			checked_narrow(wide, kind).ok_or_else(|| bad(kind.name()))
		}
	}
}

/// Widen any JSON number to `i128` so one narrowing path serves all widths.
fn numeric_wide(value: &Value) -> Option<i128> {
	let number = value.as_number()?;
	if let Some(signed) = number.as_i64() {
		return Some(i128::from(signed));
	}
	if let Some(unsigned) = number.as_u64() {
		return Some(i128::from(unsigned));
	}
	number.as_f64().map(|float| float as i128)
}

/// Truncating narrow to an integer width; `None` for non-integer kinds.
fn narrow(wide: i128, kind: ScalarKind) -> Option<ScalarValue> {
	match kind {
		ScalarKind::I8 => Some(ScalarValue::I8(wide as i8)),
		ScalarKind::I16 => Some(ScalarValue::I16(wide as i16)),
		ScalarKind::I32 => Some(ScalarValue::I32(wide as i32)),
		ScalarKind::I64 => Some(ScalarValue::I64(wide as i64)),
		ScalarKind::U8 => Some(ScalarValue::U8(wide as u8)),
		ScalarKind::U16 => Some(ScalarValue::U16(wide as u16)),
		ScalarKind::U32 => Some(ScalarValue::U32(wide as u32)),
		ScalarKind::U64 => Some(ScalarValue::U64(wide as u64)),
		_ => None,
	}
}

fn checked_narrow(wide: i128, kind: ScalarKind) -> Option<ScalarValue> {
	match kind {
		ScalarKind::I8 => i8::try_from(wide).ok().map(ScalarValue::I8),
		ScalarKind::I16 => i16::try_from(wide).ok().map(ScalarValue::I16),
		ScalarKind::I32 => i32::try_from(wide).ok().map(ScalarValue::I32),
		ScalarKind::I64 => i64::try_from(wide).ok().map(ScalarValue::I64),
		ScalarKind::U8 => u8::try_from(wide).ok().map(ScalarValue::U8),
		ScalarKind::U16 => u16::try_from(wide).ok().map(ScalarValue::U16),
		ScalarKind::U32 => u32::try_from(wide).ok().map(ScalarValue::U32),
		ScalarKind::U64 => u64::try_from(wide).ok().map(ScalarValue::U64),
		_ => None,
	}
}

/// Base-agnostic signed integer parsing with `0x`/`0o`/`0b` prefixes.
fn parse_int_text(text: &str) -> Option<i128> {
	let (negative, digits) = match text.strip_prefix('-') {
		Some(rest) => (true, rest),
		None => (false, text.strip_prefix('+').unwrap_or(text)),
	};

	let (radix, digits) = if let Some(rest) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
		(16, rest)
	} else if let Some(rest) = digits.strip_prefix("0o").or_else(|| digits.strip_prefix("0O")) {
		(8, rest)
	} else if let Some(rest) = digits.strip_prefix("0b").or_else(|| digits.strip_prefix("0B")) {
		(2, rest)
	} else {
		(10, digits)
	};

	let magnitude = i128::from_str_radix(digits, radix).ok()?;
	Some(if negative { -magnitude } else { magnitude })
}
