//! Platform binding adapters.
//!
//! Each adapter only translates its platform's call/response envelope into an
//! [`OperationRequest`] and maps the outcome back; all routing lives in the dispatcher.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::analytics::constants::{channel_name, SERVICE_NAME};
use crate::analytics::dispatcher::CommandDispatcher;
use crate::analytics::error::{invalid_argument, unsupported_operation};
use crate::analytics::operation::{Operation, OperationRequest};
use crate::analytics::task::{BridgeError, OperationOutcome};

/// A method channel invocation with named arguments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Option<Value>) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }
}

/// Reply sent back over a method channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MethodResponse {
    Success {
        result: Value,
    },
    Error {
        code: String,
        message: String,
        details: BridgeError,
    },
}

impl MethodResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, MethodResponse::Success { .. })
    }
}

impl From<OperationOutcome> for MethodResponse {
    fn from(outcome: OperationOutcome) -> Self {
        match outcome {
            Ok(()) => MethodResponse::Success {
                result: Value::Null,
            },
            Err(error) => {
                let details = BridgeError::from(&error);
                MethodResponse::Error {
                    code: details.code.clone(),
                    message: details.message.clone(),
                    details,
                }
            }
        }
    }
}

/// Named-argument binding, answering on `io.invertase.firebase/analytics`.
///
/// Unlike a bare `when` over method names, every call gets a reply: unknown methods are
/// answered with an `unsupported-operation` error.
#[derive(Clone, Debug)]
pub struct MethodChannel {
    name: String,
    dispatcher: CommandDispatcher,
}

impl MethodChannel {
    pub fn new(dispatcher: CommandDispatcher) -> Self {
        Self {
            name: channel_name(),
            dispatcher,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn handle(&self, call: MethodCall) -> MethodResponse {
        if Operation::from_name(&call.method).is_none() {
            log::warn!("rejecting unsupported analytics method '{}'", call.method);
            return MethodResponse::from(Err(unsupported_operation(&call.method)));
        }
        let outcome = match OperationRequest::from_named_json(call.method, call.arguments) {
            Ok(request) => self.dispatcher.call(&request).await,
            Err(error) => Err(error),
        };
        MethodResponse::from(outcome)
    }

    /// Handles a raw JSON envelope `{"method": ..., "arguments": ...}`.
    pub async fn handle_value(&self, envelope: Value) -> Value {
        let response = match serde_json::from_value::<MethodCall>(envelope) {
            Ok(call) => self.handle(call).await,
            Err(err) => MethodResponse::from(Err(invalid_argument(format!(
                "malformed method call envelope: {err}"
            )))),
        };
        serde_json::to_value(&response).unwrap_or_else(|err| {
            json!({
                "status": "error",
                "code": "unknown",
                "message": format!("failed to encode method response: {err}"),
            })
        })
    }
}

/// Positional-argument binding, exported as the `Analytics` native module.
#[derive(Clone, Debug)]
pub struct ReactNativeModule {
    dispatcher: CommandDispatcher,
}

impl ReactNativeModule {
    pub fn new(dispatcher: CommandDispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn name(&self) -> &'static str {
        SERVICE_NAME
    }

    /// Methods the module exports to the script side.
    pub fn method_names(&self) -> Vec<&'static str> {
        Operation::all().map(Operation::name).collect()
    }

    /// Invokes `method` with positional arguments; resolves to `null` or rejects with
    /// `{code, message}`.
    pub async fn invoke(&self, method: &str, arguments: Vec<Value>) -> Result<Value, BridgeError> {
        let Some(operation) = Operation::from_name(method) else {
            log::warn!("rejecting unsupported analytics method '{method}'");
            return Err(unsupported_operation(method).into());
        };
        let request = OperationRequest::from_positional_json(operation, arguments)?;
        self.dispatcher.call(&request).await?;
        Ok(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::native::{NativeError, NativeInvocation, RecordingAnalytics};
    use std::sync::Arc;

    fn dispatcher(native: &RecordingAnalytics) -> CommandDispatcher {
        CommandDispatcher::new(Arc::new(native.clone()))
    }

    #[tokio::test(flavor = "current_thread")]
    async fn method_channel_success_envelope() {
        let native = RecordingAnalytics::new();
        let channel = MethodChannel::new(dispatcher(&native));
        assert_eq!(channel.name(), "io.invertase.firebase/analytics");

        let response = channel
            .handle_value(json!({
                "method": "logEvent",
                "arguments": { "name": "invertase_event", "params": { "number": 1 } },
            }))
            .await;
        assert_eq!(response, json!({ "status": "success", "result": null }));
        assert_eq!(native.invocations().len(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn method_channel_answers_unknown_methods() {
        let native = RecordingAnalytics::new();
        let channel = MethodChannel::new(dispatcher(&native));
        for arguments in [None, Some(json!({ "x": [1] })), Some(json!("str"))] {
            let response = channel
                .handle(MethodCall::new("setDeviceColour", arguments))
                .await;
            match response {
                MethodResponse::Error { code, details, .. } => {
                    assert_eq!(code, "analytics/unsupported-operation");
                    assert_eq!(details.code, code);
                }
                other => panic!("expected error, got {other:?}"),
            }
        }
        assert!(native.invocations().is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn method_channel_reports_native_errors() {
        let native = RecordingAnalytics::new();
        native.fail_on("setAnalyticsCollectionEnabled", NativeError::opaque());
        let channel = MethodChannel::new(dispatcher(&native));
        let response = channel
            .handle(MethodCall::new(
                "setAnalyticsCollectionEnabled",
                Some(json!({ "enabled": false })),
            ))
            .await;
        assert_eq!(
            response,
            MethodResponse::Error {
                code: "unknown".into(),
                message: "An unknown error occurred".into(),
                details: BridgeError {
                    code: "unknown".into(),
                    message: "An unknown error occurred".into(),
                },
            }
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn malformed_envelope_is_rejected() {
        let native = RecordingAnalytics::new();
        let channel = MethodChannel::new(dispatcher(&native));
        let response = channel.handle_value(json!({ "arguments": {} })).await;
        assert_eq!(response["status"], "error");
        assert_eq!(response["code"], "analytics/invalid-argument");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn react_native_module_maps_positional_arguments() {
        let native = RecordingAnalytics::new();
        let module = ReactNativeModule::new(dispatcher(&native));
        assert_eq!(module.name(), "Analytics");
        assert!(module.method_names().contains(&"logViewSearchResults"));

        let result = module
            .invoke(
                "setCurrentScreen",
                vec![json!("invertase screen"), json!("invertase class override")],
            )
            .await
            .unwrap();
        assert_eq!(result, Value::Null);

        module
            .invoke("setSessionTimeoutDuration", vec![json!(13371337.0)])
            .await
            .unwrap();

        assert_eq!(
            native.invocations(),
            vec![
                NativeInvocation::SetCurrentScreen {
                    activity: "MainActivity".into(),
                    screen_name: "invertase screen".into(),
                    screen_class_override: Some("invertase class override".into()),
                },
                NativeInvocation::SetSessionTimeoutDuration(13_371_337),
            ]
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn react_native_module_rejects_with_code_and_message() {
        let native = RecordingAnalytics::new();
        let module = ReactNativeModule::new(dispatcher(&native));

        let err = module
            .invoke("setUserId", vec![json!(66.1337)])
            .await
            .unwrap_err();
        assert_eq!(err.code, "analytics/invalid-argument");
        assert!(err.message.contains("must be a string"));

        let err = module.invoke("logNothing", vec![]).await.unwrap_err();
        assert_eq!(err.code, "analytics/unsupported-operation");
    }
}
