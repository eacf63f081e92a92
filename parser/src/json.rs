use serde_json::Value;

pub struct JsonValue<T>(pub T);

fn walk<'a>(value: &'a Value, fields: &[&str]) -> &'a Value {
    let mut ptr = value;
    for field in fields {
        ptr = &ptr[field];
    }
    ptr
}

impl JsonValue<String> {
    pub fn extract(value: &Value, fields: &[&str]) -> anyhow::Result<JsonValue<String>> {
        walk(value, fields)
            .as_str()
            .map(|s| JsonValue(s.to_string()))
            .ok_or(anyhow::anyhow!("invalid str field on {value} @ {fields:?}"))
    }
}

impl JsonValue<Option<String>> {
    pub fn extract(value: &Value, fields: &[&str]) -> anyhow::Result<JsonValue<Option<String>>> {
        match walk(value, fields) {
            Value::Null => Ok(JsonValue(None)),
            Value::String(s) => Ok(JsonValue(Some(s.clone()))),
            other => anyhow::bail!("invalid optional str field {other} @ {fields:?}"),
        }
    }
}

impl JsonValue<i64> {
    pub fn extract(value: &Value, fields: &[&str]) -> anyhow::Result<JsonValue<i64>> {
        walk(value, fields)
            .as_i64()
            .map(JsonValue)
            .ok_or(anyhow::anyhow!("invalid i64 field on {value} @ {fields:?}"))
    }

    /// Like `extract`, but a missing field yields `default`.
    pub fn extract_or(value: &Value, fields: &[&str], default: i64) -> anyhow::Result<i64> {
        let JsonValue(v) = JsonValue::<Option<i64>>::extract(value, fields)?;
        Ok(v.unwrap_or(default))
    }
}

impl JsonValue<Option<i64>> {
    pub fn extract(value: &Value, fields: &[&str]) -> anyhow::Result<JsonValue<Option<i64>>> {
        match walk(value, fields) {
            Value::Null => Ok(JsonValue(None)),
            v => v
                .as_i64()
                .map(|n| JsonValue(Some(n)))
                .ok_or(anyhow::anyhow!("invalid i64 field {v} @ {fields:?}")),
        }
    }
}

impl JsonValue<f64> {
    pub fn extract(value: &Value, fields: &[&str]) -> anyhow::Result<JsonValue<f64>> {
        walk(value, fields)
            .as_f64()
            .map(JsonValue)
            .ok_or(anyhow::anyhow!("invalid f64 field on {value} @ {fields:?}"))
    }
}

impl JsonValue<bool> {
    /// Missing flags are false.
    pub fn extract(value: &Value, fields: &[&str]) -> anyhow::Result<JsonValue<bool>> {
        match walk(value, fields) {
            Value::Null => Ok(JsonValue(false)),
            Value::Bool(b) => Ok(JsonValue(*b)),
            other => anyhow::bail!("invalid bool field {other} @ {fields:?}"),
        }
    }
}

impl JsonValue<Value> {
    pub fn extract(value: &Value, fields: &[&str]) -> anyhow::Result<JsonValue<Value>> {
        Ok(JsonValue(walk(value, fields).clone()))
    }
}

impl JsonValue<Vec<Value>> {
    /// Missing lists are empty.
    pub fn extract(value: &Value, fields: &[&str]) -> anyhow::Result<JsonValue<Vec<Value>>> {
        match walk(value, fields) {
            Value::Null => Ok(JsonValue(vec![])),
            Value::Array(items) => Ok(JsonValue(items.clone())),
            other => anyhow::bail!("invalid list field {other} @ {fields:?}"),
        }
    }
}

pub fn to_u32(value: i64, field: &str) -> anyhow::Result<u32> {
    u32::try_from(value).map_err(|_| anyhow::anyhow!("field {field} out of range: {value}"))
}
