use bitfield_decoder::{DecodeError, DecodedValue, PackedValue};
use serde::Serialize;
use serde_json::{Number, Value};
use wasm_bindgen::JsValue;

/// Decoded value as handed to JavaScript. Values outside the `i64` range can
/// only come from 64-bit unsigned fields.
#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum JsValueOut {
    I64(i64),
    U64(u64),
    Array(Vec<JsValueOut>),
}

pub fn error_to_js<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

pub fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let serializer =
        serde_wasm_bindgen::Serializer::new().serialize_large_number_types_as_bigints(true);
    value
        .serialize(&serializer)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn number_to_packed(number: &Number) -> Option<u64> {
    if let Some(value) = number.as_u64() {
        return Some(value);
    }
    if let Some(value) = number.as_i64() {
        return Some(value as u64);
    }

    // JavaScript numbers arrive as f64; accept the ones holding an integer.
    let value = number.as_f64()?;
    if value.fract() != 0.0 || value < i64::MIN as f64 || value >= u64::MAX as f64 {
        return None;
    }
    if value < 0.0 {
        Some(value as i64 as u64)
    } else {
        Some(value as u64)
    }
}

/// Converts a single integer. Anything else is a [DecodeError::TypeMismatch].
pub fn json_to_scalar(value: &Value) -> Result<u64, DecodeError> {
    match value {
        Value::Number(number) => {
            number_to_packed(number).ok_or_else(|| DecodeError::TypeMismatch(number.to_string()))
        }
        other => Err(DecodeError::TypeMismatch(kind(other).to_string())),
    }
}

/// Converts an integer or a (nested) array of integers into a [PackedValue].
pub fn json_to_packed(value: &Value) -> Result<PackedValue, DecodeError> {
    match value {
        Value::Number(_) => json_to_scalar(value).map(PackedValue::Scalar),
        Value::Array(items) if items.iter().all(Value::is_number) => items
            .iter()
            .map(json_to_scalar)
            .collect::<Result<Vec<_>, _>>()
            .map(PackedValue::Flat),
        Value::Array(items) => items
            .iter()
            .map(json_to_packed)
            .collect::<Result<Vec<_>, _>>()
            .map(PackedValue::Nested),
        other => Err(DecodeError::UnsupportedValueType(kind(other).to_string())),
    }
}

pub fn scalar_to_out(value: i128) -> JsValueOut {
    match i64::try_from(value) {
        Ok(value) => JsValueOut::I64(value),
        // Only a 64-bit unsigned field can exceed i64, and it always fits u64.
        Err(_) => JsValueOut::U64(value as u64),
    }
}

pub fn decoded_to_out(value: DecodedValue) -> JsValueOut {
    match value {
        DecodedValue::Scalar(value) => scalar_to_out(value),
        DecodedValue::Flat(values) => {
            JsValueOut::Array(values.into_iter().map(scalar_to_out).collect())
        }
        DecodedValue::Nested(values) => {
            JsValueOut::Array(values.into_iter().map(decoded_to_out).collect())
        }
    }
}
