use serde_json::Value;

/// Masks credential-bearing fields in JSON payloads before they are logged.
pub fn sanitize_json(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut sanitized = serde_json::Map::new();
            for (key, val) in map {
                let sanitized_val = if is_sensitive_field(key) {
                    mask_value(val)
                } else {
                    sanitize_json(val)
                };
                sanitized.insert(key.clone(), sanitized_val);
            }
            Value::Object(sanitized)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sanitize_json).collect()),
        _ => value.clone(),
    }
}

fn is_sensitive_field(key: &str) -> bool {
    matches!(
        key.to_lowercase().as_str(),
        "password"
            | "currentpassword"
            | "newpassword"
            | "current_password"
            | "new_password"
            | "password_hash"
            | "secret"
            | "token"
            | "api_key"
            | "authorization"
    )
}

// No part of a secret survives masking.
fn mask_value(_value: &Value) -> Value {
    Value::String("****".to_string())
}
