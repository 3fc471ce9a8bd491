use serde_json::{json, Map, Value as JsonValue};

use crate::layout::Value;

/// Render a decoded value as JSON for inspection output.
///
/// Records become objects in field order, byte sequences become arrays
/// of numbers, and non-finite doubles become strings.
pub fn value_to_json(value: &Value) -> JsonValue {
	match value {
		Value::Bool(v) => json!(v),
		Value::U64(v) => json!(v),
		Value::I64(v) => json!(v),
		Value::F64(v) if v.is_finite() => json!(v),
		Value::F64(v) => JsonValue::String(v.to_string()),
		Value::Bytes(bytes) => {
			let out: Vec<JsonValue> = bytes.iter().map(|byte| json!(byte)).collect();
			JsonValue::Array(out)
		}
		Value::Str(text) => JsonValue::String(text.to_string()),
		Value::List(items) => JsonValue::Array(items.iter().map(value_to_json).collect()),
		Value::Record(record) => {
			let mut out = Map::new();
			for (name, field) in record.iter() {
				out.insert(name.to_owned(), value_to_json(field));
			}
			JsonValue::Object(out)
		}
	}
}
