use std::fmt;

use serde_json::Value;

use crate::analytics::error::{invalid_argument, AnalyticsResult};
use crate::analytics::events::SemanticEvent;
use crate::analytics::value::{map_from_json, ArgValue, ArgumentMap};

/// The fixed set of operations the bridge forwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    LogEvent,
    SetAnalyticsCollectionEnabled,
    SetCurrentScreen,
    SetMinimumSessionDuration,
    SetSessionTimeoutDuration,
    SetUserId,
    SetUserProperty,
    SetUserProperties,
    ResetAnalyticsData,
    Semantic(SemanticEvent),
}

impl Operation {
    const CORE: [Operation; 9] = [
        Operation::LogEvent,
        Operation::SetAnalyticsCollectionEnabled,
        Operation::SetCurrentScreen,
        Operation::SetMinimumSessionDuration,
        Operation::SetSessionTimeoutDuration,
        Operation::SetUserId,
        Operation::SetUserProperty,
        Operation::SetUserProperties,
        Operation::ResetAnalyticsData,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::CORE
            .iter()
            .copied()
            .find(|operation| operation.name() == name)
            .or_else(|| SemanticEvent::from_method_name(name).map(Operation::Semantic))
    }

    pub fn all() -> impl Iterator<Item = Operation> {
        Self::CORE
            .into_iter()
            .chain(SemanticEvent::ALL.iter().copied().map(Operation::Semantic))
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::LogEvent => "logEvent",
            Operation::SetAnalyticsCollectionEnabled => "setAnalyticsCollectionEnabled",
            Operation::SetCurrentScreen => "setCurrentScreen",
            Operation::SetMinimumSessionDuration => "setMinimumSessionDuration",
            Operation::SetSessionTimeoutDuration => "setSessionTimeoutDuration",
            Operation::SetUserId => "setUserId",
            Operation::SetUserProperty => "setUserProperty",
            Operation::SetUserProperties => "setUserProperties",
            Operation::ResetAnalyticsData => "resetAnalyticsData",
            Operation::Semantic(event) => event.method_name(),
        }
    }

    /// Argument keys in the order positional bindings pass them.
    pub fn parameter_names(self) -> &'static [&'static str] {
        match self {
            Operation::LogEvent => &["name", "params"],
            Operation::SetAnalyticsCollectionEnabled => &["enabled"],
            Operation::SetCurrentScreen => &["screenName", "screenClassOverride"],
            Operation::SetMinimumSessionDuration | Operation::SetSessionTimeoutDuration => {
                &["milliseconds"]
            }
            Operation::SetUserId => &["id"],
            Operation::SetUserProperty => &["name", "value"],
            Operation::SetUserProperties => &["properties"],
            Operation::ResetAnalyticsData => &[],
            Operation::Semantic(_) => &["params"],
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named operation plus its raw argument mapping, as received from a binding.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OperationRequest {
    pub operation: String,
    pub arguments: ArgumentMap,
}

impl OperationRequest {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            arguments: ArgumentMap::new(),
        }
    }

    /// Adds a named argument. `None` values are omitted so they read as absent.
    pub fn with_arg(mut self, key: impl Into<String>, value: Option<impl Into<ArgValue>>) -> Self {
        if let Some(value) = value {
            self.arguments.insert(key.into(), value.into());
        }
        self
    }

    /// Builds a request from a named-argument JSON envelope. `null` arguments mean none.
    pub fn from_named_json(operation: impl Into<String>, arguments: Option<Value>) -> AnalyticsResult<Self> {
        let operation = operation.into();
        let arguments = match arguments {
            None | Some(Value::Null) => ArgumentMap::new(),
            Some(Value::Object(map)) => map_from_json(map)?,
            Some(other) => {
                return Err(invalid_argument(format!(
                    "firebase.analytics().{operation}(*): arguments must be a map of named values, got {}",
                    json_type_name(&other)
                )))
            }
        };
        Ok(Self {
            operation,
            arguments,
        })
    }

    /// Builds a request from positional JSON arguments, naming them by the operation's
    /// parameter order. Missing trailing positions read as absent.
    pub fn from_positional_json(operation: Operation, arguments: Vec<Value>) -> AnalyticsResult<Self> {
        let names = operation.parameter_names();
        if arguments.len() > names.len() {
            return Err(invalid_argument(format!(
                "firebase.analytics().{operation}(): expected at most {} argument(s), got {}",
                names.len(),
                arguments.len()
            )));
        }
        let mut request = OperationRequest::new(operation.name());
        for (name, value) in names.iter().zip(arguments) {
            request
                .arguments
                .insert((*name).to_string(), ArgValue::from_json(value)?);
        }
        Ok(request)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
