//! Tagged argument values and the conversion into native argument bundles.
//!
//! Values arriving from the script side are tagged once, at the transport boundary, so the
//! numeric slot a value occupies (32-bit, 64-bit or floating) is decided there and never
//! coerced afterwards.

use std::collections::BTreeMap;

use serde_json::{Map, Number, Value};

use crate::analytics::error::{unsupported_value_type, AnalyticsResult};

pub type ArgumentMap = BTreeMap<String, ArgValue>;

/// A single argument value supplied by the calling side.
#[derive(Clone, Debug, PartialEq)]
pub enum ArgValue {
    String(String),
    Int(i32),
    Long(i64),
    Double(f64),
    Bool(bool),
    Null,
    Map(ArgumentMap),
}

impl ArgValue {
    /// Short type label used in validation and conversion messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ArgValue::String(_) => "string",
            ArgValue::Int(_) => "int",
            ArgValue::Long(_) => "long",
            ArgValue::Double(_) => "double",
            ArgValue::Bool(_) => "boolean",
            ArgValue::Null => "null",
            ArgValue::Map(_) => "map",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ArgValue::Null)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, ArgValue::Int(_) | ArgValue::Long(_) | ArgValue::Double(_))
    }

    /// True for the values a logged event may carry: strings, numbers and booleans.
    pub fn is_primitive(&self) -> bool {
        matches!(self, ArgValue::String(_) | ArgValue::Bool(_)) || self.is_number()
    }

    /// Tags a JSON value. Integers that fit 32 bits become `Int`, other signed 64-bit integers
    /// become `Long` and everything else numeric becomes `Double`. Arrays and integers beyond
    /// the signed 64-bit range have no tag and are rejected.
    pub fn from_json(value: Value) -> AnalyticsResult<Self> {
        match value {
            Value::Null => Ok(ArgValue::Null),
            Value::Bool(flag) => Ok(ArgValue::Bool(flag)),
            Value::String(text) => Ok(ArgValue::String(text)),
            Value::Number(number) => tag_number(&number),
            Value::Object(map) => Ok(ArgValue::Map(map_from_json(map)?)),
            Value::Array(_) => Err(unsupported_value_type("Unsupported value type: array")),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ArgValue::String(text) => Value::String(text.clone()),
            ArgValue::Int(value) => Value::from(*value),
            ArgValue::Long(value) => Value::from(*value),
            ArgValue::Double(value) => Number::from_f64(*value)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ArgValue::Bool(flag) => Value::Bool(*flag),
            ArgValue::Null => Value::Null,
            ArgValue::Map(map) => Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

fn tag_number(number: &Number) -> AnalyticsResult<ArgValue> {
    if let Some(value) = number.as_i64() {
        return Ok(match i32::try_from(value) {
            Ok(small) => ArgValue::Int(small),
            Err(_) => ArgValue::Long(value),
        });
    }
    if number.is_u64() {
        return Err(unsupported_value_type(format!(
            "Unsupported value type: integer {number} exceeds the long range"
        )));
    }
    number
        .as_f64()
        .map(ArgValue::Double)
        .ok_or_else(|| unsupported_value_type(format!("Unsupported value type: number {number}")))
}

/// Tags every entry of a JSON object.
pub fn map_from_json(map: Map<String, Value>) -> AnalyticsResult<ArgumentMap> {
    map.into_iter()
        .map(|(key, value)| ArgValue::from_json(value).map(|value| (key, value)))
        .collect()
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::String(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::String(value)
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        ArgValue::Int(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        ArgValue::Long(value)
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        ArgValue::Double(value)
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Bool(value)
    }
}

impl From<ArgumentMap> for ArgValue {
    fn from(value: ArgumentMap) -> Self {
        ArgValue::Map(value)
    }
}

impl<T: Into<ArgValue>> From<Option<T>> for ArgValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ArgValue::Null)
    }
}

/// A value slot of a native argument bundle.
#[derive(Clone, Debug, PartialEq)]
pub enum BundleValue {
    String(String),
    Int(i32),
    Long(i64),
    Double(f64),
    Bool(bool),
    /// Typed-null placeholder, stored as a null string by the native side.
    Null,
}

impl BundleValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            BundleValue::String(value) => Some(value),
            _ => None,
        }
    }
}

/// Primitive-typed, string-keyed mapping handed to the native SDK.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NativeBundle {
    entries: BTreeMap<String, BundleValue>,
}

impl NativeBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts a validated argument mapping entry by entry. Nested maps have no native slot
    /// and fail the whole conversion rather than being dropped.
    pub fn from_arguments(arguments: &ArgumentMap) -> AnalyticsResult<Self> {
        let mut bundle = NativeBundle::new();
        for (key, value) in arguments {
            let slot = match value {
                ArgValue::Null => BundleValue::Null,
                ArgValue::String(text) => BundleValue::String(text.clone()),
                ArgValue::Int(value) => BundleValue::Int(*value),
                ArgValue::Long(value) => BundleValue::Long(*value),
                ArgValue::Double(value) => BundleValue::Double(*value),
                ArgValue::Bool(flag) => BundleValue::Bool(*flag),
                ArgValue::Map(_) => {
                    return Err(unsupported_value_type(format!(
                        "Unsupported value type: {} (key '{key}')",
                        value.type_name()
                    )))
                }
            };
            bundle.entries.insert(key.clone(), slot);
        }
        Ok(bundle)
    }

    /// Reverses the conversion, mapping every slot back onto its argument tag.
    pub fn to_arguments(&self) -> ArgumentMap {
        self.entries
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    BundleValue::String(text) => ArgValue::String(text.clone()),
                    BundleValue::Int(value) => ArgValue::Int(*value),
                    BundleValue::Long(value) => ArgValue::Long(*value),
                    BundleValue::Double(value) => ArgValue::Double(*value),
                    BundleValue::Bool(flag) => ArgValue::Bool(*flag),
                    BundleValue::Null => ArgValue::Null,
                };
                (key.clone(), value)
            })
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&BundleValue> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: BundleValue) {
        self.entries.insert(key.into(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BundleValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn arguments(value: Value) -> ArgumentMap {
        match value {
            Value::Object(map) => map_from_json(map).unwrap(),
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn json_numbers_keep_their_width() {
        let args = arguments(json!({
            "small": 7,
            "large": 8_589_934_592_i64,
            "fraction": 1.5,
        }));
        assert_eq!(args["small"], ArgValue::Int(7));
        assert_eq!(args["large"], ArgValue::Long(8_589_934_592));
        assert_eq!(args["fraction"], ArgValue::Double(1.5));
    }

    #[test]
    fn arrays_are_rejected_when_tagging() {
        let err = ArgValue::from_json(json!([1, 2])).unwrap_err();
        assert_eq!(err.code_str(), "analytics/unsupported-value-type");
        assert!(err.message().contains("array"));
    }

    #[test]
    fn integers_beyond_long_are_rejected() {
        let err = ArgValue::from_json(json!(u64::MAX)).unwrap_err();
        assert_eq!(err.code_str(), "analytics/unsupported-value-type");
    }

    #[test]
    fn bundle_round_trip_preserves_primitives() {
        let args = arguments(json!({
            "string": "value",
            "int": 1,
            "long": 4_294_967_296_i64,
            "double": 2.25,
            "flag": true,
            "cleared": null,
        }));
        let bundle = NativeBundle::from_arguments(&args).unwrap();
        assert_eq!(bundle.len(), 6);
        assert_eq!(bundle.get("cleared"), Some(&BundleValue::Null));
        assert_eq!(bundle.get("long"), Some(&BundleValue::Long(4_294_967_296)));
        assert_eq!(bundle.to_arguments(), args);
    }

    #[test]
    fn nested_map_fails_conversion_instead_of_dropping_key() {
        let args = arguments(json!({ "ok": 1, "nested": { "inner": 1 } }));
        let err = NativeBundle::from_arguments(&args).unwrap_err();
        assert_eq!(err.code_str(), "analytics/unsupported-value-type");
        assert!(err.message().contains("map"));
        assert!(err.message().contains("nested"));
    }

    #[test]
    fn to_json_mirrors_from_json() {
        let original = json!({ "a": "b", "n": 3, "f": 0.5, "t": false, "z": null });
        let tagged = ArgValue::from_json(original.clone()).unwrap();
        assert_eq!(tagged.to_json(), original);
    }
}
