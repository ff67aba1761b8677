//! Argument validation for every supported operation.
//!
//! Validation is pure and synchronous: a request either becomes a typed [`Command`] or fails
//! with an `invalid-argument` error before anything reaches the native SDK.

use crate::analytics::config::{AnalyticsSettings, DurationRounding};
use crate::analytics::constants::is_reserved_event_name;
use crate::analytics::error::{invalid_argument, AnalyticsResult};
use crate::analytics::events::SemanticEvent;
use crate::analytics::operation::Operation;
use crate::analytics::value::{ArgValue, ArgumentMap, NativeBundle};

/// A validated call, generic over how structured parameters are carried so the same shape
/// serves both the validated argument set and the converted native bundle.
#[derive(Clone, Debug, PartialEq)]
pub enum Command<P = ArgumentMap> {
    LogEvent {
        name: String,
        params: Option<P>,
    },
    SetAnalyticsCollectionEnabled {
        enabled: bool,
    },
    SetCurrentScreen {
        screen_name: String,
        screen_class_override: Option<String>,
    },
    SetMinimumSessionDuration {
        milliseconds: i64,
    },
    SetSessionTimeoutDuration {
        milliseconds: i64,
    },
    SetUserId {
        id: Option<String>,
    },
    SetUserProperty {
        name: String,
        value: Option<String>,
    },
    SetUserProperties {
        properties: P,
    },
    ResetAnalyticsData,
}

impl<P> Command<P> {
    /// Name of the native SDK method the command is forwarded to.
    pub fn native_method(&self) -> &'static str {
        match self {
            Command::LogEvent { .. } => "logEvent",
            Command::SetAnalyticsCollectionEnabled { .. } => "setAnalyticsCollectionEnabled",
            Command::SetCurrentScreen { .. } => "setCurrentScreen",
            Command::SetMinimumSessionDuration { .. } => "setMinimumSessionDuration",
            Command::SetSessionTimeoutDuration { .. } => "setSessionTimeoutDuration",
            Command::SetUserId { .. } => "setUserId",
            Command::SetUserProperty { .. } => "setUserProperty",
            Command::SetUserProperties { .. } => "setUserProperties",
            Command::ResetAnalyticsData => "resetAnalyticsData",
        }
    }
}

impl Command<ArgumentMap> {
    /// Converts structured parameters into native bundles.
    pub fn into_native(self) -> AnalyticsResult<Command<NativeBundle>> {
        Ok(match self {
            Command::LogEvent { name, params } => Command::LogEvent {
                name,
                params: params
                    .as_ref()
                    .map(NativeBundle::from_arguments)
                    .transpose()?,
            },
            Command::SetUserProperties { properties } => Command::SetUserProperties {
                properties: NativeBundle::from_arguments(&properties)?,
            },
            Command::SetAnalyticsCollectionEnabled { enabled } => {
                Command::SetAnalyticsCollectionEnabled { enabled }
            }
            Command::SetCurrentScreen {
                screen_name,
                screen_class_override,
            } => Command::SetCurrentScreen {
                screen_name,
                screen_class_override,
            },
            Command::SetMinimumSessionDuration { milliseconds } => {
                Command::SetMinimumSessionDuration { milliseconds }
            }
            Command::SetSessionTimeoutDuration { milliseconds } => {
                Command::SetSessionTimeoutDuration { milliseconds }
            }
            Command::SetUserId { id } => Command::SetUserId { id },
            Command::SetUserProperty { name, value } => Command::SetUserProperty { name, value },
            Command::ResetAnalyticsData => Command::ResetAnalyticsData,
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct ArgumentValidator {
    settings: AnalyticsSettings,
}

impl ArgumentValidator {
    pub fn new(settings: AnalyticsSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AnalyticsSettings {
        &self.settings
    }

    pub fn validate(&self, operation: Operation, args: &ArgumentMap) -> AnalyticsResult<Command> {
        match operation {
            Operation::LogEvent => self.log_event(args),
            Operation::SetAnalyticsCollectionEnabled => {
                match present(args, "enabled") {
                    Some(ArgValue::Bool(enabled)) => {
                        Ok(Command::SetAnalyticsCollectionEnabled { enabled: *enabled })
                    }
                    _ => Err(invalid_argument(
                        "firebase.analytics().setAnalyticsCollectionEnabled(*): enabled must be a boolean.",
                    )),
                }
            }
            Operation::SetCurrentScreen => {
                let screen_name = match present(args, "screenName") {
                    Some(ArgValue::String(name)) => name.clone(),
                    _ => {
                        return Err(invalid_argument(
                            "firebase.analytics().setCurrentScreen(*): 'screenName' must be a string.",
                        ))
                    }
                };
                let screen_class_override = match present(args, "screenClassOverride") {
                    None => None,
                    Some(ArgValue::String(class)) => Some(class.clone()),
                    Some(_) => {
                        return Err(invalid_argument(
                            "firebase.analytics().setCurrentScreen(_, *): 'screenClassOverride' must be undefined or a string.",
                        ))
                    }
                };
                Ok(Command::SetCurrentScreen {
                    screen_name,
                    screen_class_override,
                })
            }
            Operation::SetMinimumSessionDuration => Ok(Command::SetMinimumSessionDuration {
                milliseconds: self.duration(
                    operation,
                    args,
                    self.settings.default_minimum_session_duration_ms,
                )?,
            }),
            Operation::SetSessionTimeoutDuration => Ok(Command::SetSessionTimeoutDuration {
                milliseconds: self.duration(
                    operation,
                    args,
                    self.settings.default_session_timeout_duration_ms,
                )?,
            }),
            Operation::SetUserId => match args.get("id") {
                Some(ArgValue::String(id)) => Ok(Command::SetUserId {
                    id: Some(id.clone()),
                }),
                Some(ArgValue::Null) => Ok(Command::SetUserId { id: None }),
                _ => Err(invalid_argument(
                    "firebase.analytics().setUserId(*): 'id' must be a string or null.",
                )),
            },
            Operation::SetUserProperty => {
                let name = match present(args, "name") {
                    Some(ArgValue::String(name)) => name.clone(),
                    _ => {
                        return Err(invalid_argument(
                            "firebase.analytics().setUserProperty(*): 'name' must be a string.",
                        ))
                    }
                };
                let value = match args.get("value") {
                    Some(ArgValue::String(value)) => Some(value.clone()),
                    Some(ArgValue::Null) => None,
                    _ => {
                        return Err(invalid_argument(
                            "firebase.analytics().setUserProperty(_, *): 'value' must be a string or null.",
                        ))
                    }
                };
                Ok(Command::SetUserProperty { name, value })
            }
            Operation::SetUserProperties => {
                let properties = match present(args, "properties") {
                    Some(ArgValue::Map(properties)) => properties,
                    _ => {
                        return Err(invalid_argument(
                            "firebase.analytics().setUserProperties(*): 'properties' must be an object of key/values.",
                        ))
                    }
                };
                for (key, value) in properties {
                    if !matches!(value, ArgValue::String(_) | ArgValue::Null) {
                        return Err(invalid_argument(format!(
                            "firebase.analytics().setUserProperties(*): 'properties.{key}' must be a string or null."
                        )));
                    }
                }
                Ok(Command::SetUserProperties {
                    properties: properties.clone(),
                })
            }
            Operation::ResetAnalyticsData => Ok(Command::ResetAnalyticsData),
            Operation::Semantic(event) => self.semantic_event(event, args),
        }
    }

    fn log_event(&self, args: &ArgumentMap) -> AnalyticsResult<Command> {
        let name = match present(args, "name") {
            Some(ArgValue::String(name)) => name,
            _ => {
                return Err(invalid_argument(
                    "firebase.analytics().logEvent(*): First argument 'name' is required and must be a string value.",
                ))
            }
        };
        if is_reserved_event_name(name) {
            return Err(invalid_argument(format!(
                "firebase.analytics().logEvent(*): 'name' the event name '{name}' is a reserved event name and can not be used."
            )));
        }
        if !self.is_valid_event_name(name) {
            return Err(invalid_argument(format!(
                "firebase.analytics().logEvent(*): 'name' the event name '{name}' is invalid. Names should contain 1 to {} alphanumeric characters or underscores.",
                self.settings.max_event_name_length
            )));
        }

        let params = match present(args, "params") {
            None => None,
            Some(ArgValue::Map(params)) => {
                self.check_event_params("logEvent(_, *)", params)?;
                Some(params.clone())
            }
            Some(_) => {
                return Err(invalid_argument(
                    "firebase.analytics().logEvent(_, *): Second optional argument 'params' must be an object if provided.",
                ))
            }
        };

        Ok(Command::LogEvent {
            name: name.clone(),
            params,
        })
    }

    fn semantic_event(&self, event: SemanticEvent, args: &ArgumentMap) -> AnalyticsResult<Command> {
        let method = event.method_name();
        let params = match present(args, "params") {
            Some(ArgValue::Map(params)) => Some(params),
            None if !event.requires_params() => None,
            _ => {
                return Err(invalid_argument(format!(
                    "firebase.analytics().{method}(*): The supplied arg must be an object of key/values."
                )))
            }
        };

        if let Some(params) = params {
            for compound in event.compound_fields() {
                let has_field = params.get(compound.field).is_some_and(|v| !v.is_null());
                let has_dependent = params
                    .get(compound.dependent)
                    .is_some_and(|v| !v.is_null());
                if has_field && !has_dependent {
                    return Err(invalid_argument(format!(
                        "firebase.analytics().{method}(*): if you supply the '{}' parameter, you must also supply the '{}' parameter.",
                        compound.field, compound.dependent
                    )));
                }
            }
            self.check_event_params(&format!("{method}(*)"), params)?;
        }

        Ok(Command::LogEvent {
            name: event.event_name().to_string(),
            params: params.cloned(),
        })
    }

    fn check_event_params(&self, call: &str, params: &ArgumentMap) -> AnalyticsResult<()> {
        if params.len() > self.settings.max_event_parameters {
            return Err(invalid_argument(format!(
                "firebase.analytics().{call}: Maximum number of parameters exceeded ({}).",
                self.settings.max_event_parameters
            )));
        }
        for (key, value) in params {
            if !value.is_primitive() {
                return Err(invalid_argument(format!(
                    "firebase.analytics().{call}: 'params.{key}' must be a string, number or boolean, got {}.",
                    value.type_name()
                )));
            }
        }
        Ok(())
    }

    fn is_valid_event_name(&self, name: &str) -> bool {
        !name.is_empty()
            && name.len() <= self.settings.max_event_name_length
            && name
                .bytes()
                .all(|byte| byte.is_ascii_alphanumeric() || byte == b'_')
    }

    fn duration(&self, operation: Operation, args: &ArgumentMap, default: i64) -> AnalyticsResult<i64> {
        let invalid = |reason: &str| {
            invalid_argument(format!(
                "firebase.analytics().{operation}(*): 'milliseconds' {reason}."
            ))
        };
        let milliseconds = match present(args, "milliseconds") {
            None => return Ok(default),
            Some(ArgValue::Int(value)) => i64::from(*value),
            Some(ArgValue::Long(value)) => *value,
            Some(ArgValue::Double(value)) => {
                if !value.is_finite() {
                    return Err(invalid("must be a finite number"));
                }
                if *value < 0.0 {
                    return Err(invalid("must not be negative"));
                }
                let whole = match self.settings.duration_rounding {
                    DurationRounding::Truncate => value.trunc(),
                    DurationRounding::Round => value.round(),
                    DurationRounding::Reject if value.fract() != 0.0 => {
                        return Err(invalid("must be a whole number of milliseconds"))
                    }
                    DurationRounding::Reject => *value,
                };
                if whole >= i64::MAX as f64 {
                    return Err(invalid("is out of range"));
                }
                whole as i64
            }
            Some(_) => return Err(invalid("must be a number")),
        };
        if milliseconds < 0 {
            return Err(invalid("must not be negative"));
        }
        Ok(milliseconds)
    }
}

/// Looks up an argument, treating an explicit null like an absent key.
fn present<'a>(args: &'a ArgumentMap, key: &str) -> Option<&'a ArgValue> {
    args.get(key).filter(|value| !value.is_null())
}
