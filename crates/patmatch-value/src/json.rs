//! Conversion from JSON documents.

use crate::{Map, Value};

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::None,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(arr) => Value::List(arr.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(obj) => {
                let mut map = Map::new();
                for (k, v) in obj {
                    map.insert(k, Value::from(v));
                }
                Value::Map(map)
            }
        }
    }
}

impl Value {
    /// Parse a JSON document into a value.
    pub fn from_json_str(text: &str) -> Result<Value, serde_json::Error> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        Ok(Value::from(json))
    }
}
