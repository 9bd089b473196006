use serde_json::Value;

/// Decode a response body into a keyed or sequential structure.
///
/// Scalars (and empty bodies, read as `null`) are wrapped into a one-element
/// array so callers always get an object or an array back.
pub fn decode_json_body(body: &[u8]) -> Result<Value, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(wrap_scalar(Value::Null));
    }
    let value: Value = serde_json::from_slice(body)?;
    Ok(wrap_scalar(value))
}

pub fn wrap_scalar(value: Value) -> Value {
    match value {
        Value::Object(_) | Value::Array(_) => value,
        scalar => Value::Array(vec![scalar]),
    }
}
