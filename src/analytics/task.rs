//! Single-shot native calls and the normalization of their results.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use serde::{Deserialize, Serialize};

use crate::analytics::error::{native_call_failed, AnalyticsError, AnalyticsResult};
use crate::analytics::native::{NativeAnalytics, NativeError, NativeResult};
use crate::analytics::validate::Command;
use crate::analytics::value::NativeBundle;
use crate::platform::runtime::spawn_detached;

/// Result of one forwarded operation. Every native result is void.
pub type OperationOutcome = AnalyticsResult<()>;

/// Handle to an operation in flight. Resolves exactly once, with the native outcome or, if the
/// task was dropped before reporting, with the normalized unknown error.
#[derive(Debug)]
#[must_use = "the outcome of a forwarded operation should be awaited"]
pub struct PendingOutcome {
    operation: &'static str,
    receiver: oneshot::Receiver<OperationOutcome>,
}

impl PendingOutcome {
    pub(crate) fn new(operation: &'static str, receiver: oneshot::Receiver<OperationOutcome>) -> Self {
        Self {
            operation,
            receiver,
        }
    }

    /// Native method this handle is waiting on.
    pub fn operation(&self) -> &'static str {
        self.operation
    }
}

impl Future for PendingOutcome {
    type Output = OperationOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(oneshot::Canceled)) => {
                log::warn!("analytics {} task ended without reporting", self.operation);
                Poll::Ready(Err(native_call_failed(None, None)))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Runs one converted command against the native SDK as an independent background task.
pub(crate) fn spawn_native_call(
    native: Arc<dyn NativeAnalytics>,
    command: Command<NativeBundle>,
) -> PendingOutcome {
    let method = command.native_method();
    let (sender, receiver) = oneshot::channel();
    spawn_detached(async move {
        let result = invoke(native.as_ref(), &command).await;
        // The caller may have dropped its handle; nothing else observes the outcome.
        let _ = sender.send(adapt_result(method, result));
    });
    PendingOutcome::new(method, receiver)
}

async fn invoke(native: &dyn NativeAnalytics, command: &Command<NativeBundle>) -> NativeResult {
    match command {
        Command::LogEvent { name, params } => native.log_event(name, params.as_ref()).await,
        Command::SetAnalyticsCollectionEnabled { enabled } => {
            native.set_analytics_collection_enabled(*enabled).await
        }
        Command::SetCurrentScreen {
            screen_name,
            screen_class_override,
        } => match native.current_activity() {
            Some(activity) => {
                native
                    .set_current_screen(&activity, screen_name, screen_class_override.as_deref())
                    .await
            }
            None => {
                log::debug!("no foreground activity; skipping setCurrentScreen('{screen_name}')");
                Ok(())
            }
        },
        Command::SetMinimumSessionDuration { milliseconds } => {
            native.set_minimum_session_duration(*milliseconds).await
        }
        Command::SetSessionTimeoutDuration { milliseconds } => {
            native.set_session_timeout_duration(*milliseconds).await
        }
        Command::SetUserId { id } => native.set_user_id(id.as_deref()).await,
        Command::SetUserProperty { name, value } => {
            native.set_user_property(name, value.as_deref()).await
        }
        Command::SetUserProperties { properties } => native.set_user_properties(properties).await,
        Command::ResetAnalyticsData => native.reset_analytics_data().await,
    }
}

fn adapt_result(method: &str, result: NativeResult) -> OperationOutcome {
    result.map_err(|err: NativeError| {
        let error = native_call_failed(err.code.as_deref(), err.message.as_deref());
        log::warn!("analytics {method} failed: {error}");
        error
    })
}

/// Error shape returned across the bridge: `{code, message}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeError {
    pub code: String,
    pub message: String,
}

impl From<&AnalyticsError> for BridgeError {
    fn from(error: &AnalyticsError) -> Self {
        Self {
            code: error.code_str().to_string(),
            message: error.message().to_string(),
        }
    }
}

impl From<AnalyticsError> for BridgeError {
    fn from(error: AnalyticsError) -> Self {
        BridgeError::from(&error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::native::{NativeInvocation, RecordingAnalytics};

    #[tokio::test(flavor = "current_thread")]
    async fn successful_call_resolves_void() {
        let native = RecordingAnalytics::new();
        let pending = spawn_native_call(
            Arc::new(native.clone()),
            Command::SetUserId {
                id: Some("rn-firebase".into()),
            },
        );
        assert_eq!(pending.operation(), "setUserId");
        pending.await.unwrap();
        assert_eq!(
            native.invocations(),
            vec![NativeInvocation::SetUserId(Some("rn-firebase".into()))]
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn failure_is_normalized() {
        let native = RecordingAnalytics::new();
        native.fail_on("resetAnalyticsData", NativeError::opaque());
        let err = spawn_native_call(Arc::new(native), Command::ResetAnalyticsData)
            .await
            .unwrap_err();
        assert_eq!(err.code_str(), "unknown");
        assert_eq!(err.message(), "An unknown error occurred");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn missing_activity_is_a_successful_no_op() {
        let native = RecordingAnalytics::without_activity();
        native.fail_on("setCurrentScreen", NativeError::new("must not be reached"));
        spawn_native_call(
            Arc::new(native.clone()),
            Command::SetCurrentScreen {
                screen_name: "home".into(),
                screen_class_override: None,
            },
        )
        .await
        .unwrap();
        assert!(native.invocations().is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn dropped_task_resolves_with_unknown_error() {
        let (sender, receiver) = oneshot::channel::<OperationOutcome>();
        drop(sender);
        let err = PendingOutcome::new("logEvent", receiver).await.unwrap_err();
        assert_eq!(err.code_str(), "unknown");
    }

    #[test]
    fn bridge_error_serializes_code_and_message() {
        let error = native_call_failed(Some("quota"), Some("slow down"));
        let json = serde_json::to_value(BridgeError::from(&error)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "code": "quota", "message": "slow down" })
        );
    }
}
