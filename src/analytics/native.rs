//! The native analytics SDK as an injected capability.
//!
//! Platform bindings implement [`NativeAnalytics`] with a thin wrapper around the vendor SDK
//! singleton. [`RecordingAnalytics`] is the in-process implementation used on hosts without a
//! native SDK and as a test double.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::analytics::value::NativeBundle;
use crate::platform::runtime::sleep;

/// Opaque reference to the foreground UI activity (or view controller).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityHandle {
    name: String,
}

impl ActivityHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Failure reported by a native SDK call. Either part may be missing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NativeError {
    pub code: Option<String>,
    pub message: Option<String>,
}

impl NativeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: Some(message.into()),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: Some(message.into()),
        }
    }

    /// A failure carrying neither code nor message.
    pub fn opaque() -> Self {
        Self::default()
    }
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => write!(f, "{message} ({code})"),
            (None, Some(message)) => f.write_str(message),
            (Some(code), None) => write!(f, "native call failed ({code})"),
            (None, None) => f.write_str("native call failed"),
        }
    }
}

impl std::error::Error for NativeError {}

pub type NativeResult = Result<(), NativeError>;

/// Surface of the native analytics SDK the bridge forwards to. One method per native call;
/// thread-safety of the underlying singleton is the SDK's concern.
#[async_trait]
pub trait NativeAnalytics: Send + Sync {
    async fn log_event(&self, name: &str, params: Option<&NativeBundle>) -> NativeResult;

    async fn set_analytics_collection_enabled(&self, enabled: bool) -> NativeResult;

    /// The activity screen tracking applies to, if any UI is in the foreground.
    fn current_activity(&self) -> Option<ActivityHandle>;

    async fn set_current_screen(
        &self,
        activity: &ActivityHandle,
        screen_name: &str,
        screen_class_override: Option<&str>,
    ) -> NativeResult;

    async fn set_minimum_session_duration(&self, milliseconds: i64) -> NativeResult;

    async fn set_session_timeout_duration(&self, milliseconds: i64) -> NativeResult;

    async fn set_user_id(&self, id: Option<&str>) -> NativeResult;

    async fn set_user_property(&self, name: &str, value: Option<&str>) -> NativeResult;

    /// Sets each property in turn. String values are forwarded, any other slot clears the
    /// property.
    async fn set_user_properties(&self, properties: &NativeBundle) -> NativeResult {
        for (name, value) in properties.iter() {
            self.set_user_property(name, value.as_str()).await?;
        }
        Ok(())
    }

    async fn reset_analytics_data(&self) -> NativeResult;
}

/// A native call observed by [`RecordingAnalytics`].
#[derive(Clone, Debug, PartialEq)]
pub enum NativeInvocation {
    LogEvent {
        name: String,
        params: Option<NativeBundle>,
    },
    SetAnalyticsCollectionEnabled(bool),
    SetCurrentScreen {
        activity: String,
        screen_name: String,
        screen_class_override: Option<String>,
    },
    SetMinimumSessionDuration(i64),
    SetSessionTimeoutDuration(i64),
    SetUserId(Option<String>),
    SetUserProperty {
        name: String,
        value: Option<String>,
    },
    ResetAnalyticsData,
}

#[derive(Debug, Default)]
struct RecordingState {
    invocations: Vec<NativeInvocation>,
    activity: Option<ActivityHandle>,
    failures: HashMap<String, NativeError>,
    delays: HashMap<String, Duration>,
}

/// In-memory native SDK that records every call. Failures and latency can be injected per
/// native method name (`logEvent`, `setUserId`, ...).
#[derive(Clone, Debug, Default)]
pub struct RecordingAnalytics {
    state: Arc<Mutex<RecordingState>>,
}

impl RecordingAnalytics {
    /// A recorder with a foreground activity named `MainActivity`.
    pub fn new() -> Self {
        let recorder = Self::default();
        recorder.set_activity(Some(ActivityHandle::new("MainActivity")));
        recorder
    }

    /// A recorder with no foreground activity.
    pub fn without_activity() -> Self {
        Self::default()
    }

    pub fn set_activity(&self, activity: Option<ActivityHandle>) {
        self.state.lock().unwrap().activity = activity;
    }

    pub fn fail_on(&self, method: &str, error: NativeError) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(method.to_string(), error);
    }

    pub fn delay_on(&self, method: &str, delay: Duration) {
        self.state
            .lock()
            .unwrap()
            .delays
            .insert(method.to_string(), delay);
    }

    pub fn invocations(&self) -> Vec<NativeInvocation> {
        self.state.lock().unwrap().invocations.clone()
    }

    async fn record(&self, method: &str, invocation: NativeInvocation) -> NativeResult {
        let delay = self.state.lock().unwrap().delays.get(method).copied();
        if let Some(delay) = delay {
            sleep(delay).await;
        }
        let mut state = self.state.lock().unwrap();
        if let Some(error) = state.failures.get(method) {
            return Err(error.clone());
        }
        state.invocations.push(invocation);
        Ok(())
    }
}

#[async_trait]
impl NativeAnalytics for RecordingAnalytics {
    async fn log_event(&self, name: &str, params: Option<&NativeBundle>) -> NativeResult {
        self.record(
            "logEvent",
            NativeInvocation::LogEvent {
                name: name.to_string(),
                params: params.cloned(),
            },
        )
        .await
    }

    async fn set_analytics_collection_enabled(&self, enabled: bool) -> NativeResult {
        self.record(
            "setAnalyticsCollectionEnabled",
            NativeInvocation::SetAnalyticsCollectionEnabled(enabled),
        )
        .await
    }

    fn current_activity(&self) -> Option<ActivityHandle> {
        self.state.lock().unwrap().activity.clone()
    }

    async fn set_current_screen(
        &self,
        activity: &ActivityHandle,
        screen_name: &str,
        screen_class_override: Option<&str>,
    ) -> NativeResult {
        self.record(
            "setCurrentScreen",
            NativeInvocation::SetCurrentScreen {
                activity: activity.name().to_string(),
                screen_name: screen_name.to_string(),
                screen_class_override: screen_class_override.map(str::to_string),
            },
        )
        .await
    }

    async fn set_minimum_session_duration(&self, milliseconds: i64) -> NativeResult {
        self.record(
            "setMinimumSessionDuration",
            NativeInvocation::SetMinimumSessionDuration(milliseconds),
        )
        .await
    }

    async fn set_session_timeout_duration(&self, milliseconds: i64) -> NativeResult {
        self.record(
            "setSessionTimeoutDuration",
            NativeInvocation::SetSessionTimeoutDuration(milliseconds),
        )
        .await
    }

    async fn set_user_id(&self, id: Option<&str>) -> NativeResult {
        self.record(
            "setUserId",
            NativeInvocation::SetUserId(id.map(str::to_string)),
        )
        .await
    }

    async fn set_user_property(&self, name: &str, value: Option<&str>) -> NativeResult {
        self.record(
            "setUserProperty",
            NativeInvocation::SetUserProperty {
                name: name.to_string(),
                value: value.map(str::to_string),
            },
        )
        .await
    }

    async fn reset_analytics_data(&self) -> NativeResult {
        self.record("resetAnalyticsData", NativeInvocation::ResetAnalyticsData)
            .await
    }
}
