use serde::Deserialize;

use crate::analytics::constants::{
    DEFAULT_MAX_EVENT_NAME_LENGTH, DEFAULT_MAX_EVENT_PARAMETERS,
    DEFAULT_MINIMUM_SESSION_DURATION_MS, DEFAULT_SESSION_TIMEOUT_DURATION_MS,
};
use crate::analytics::error::{invalid_argument, AnalyticsResult};

/// How floating durations are turned into the whole milliseconds the native SDK accepts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DurationRounding {
    /// Drops the fractional part, matching a plain `toLong()` on the native side.
    #[default]
    Truncate,
    /// Rounds half away from zero.
    Round,
    /// Fails validation for any value with a fractional part.
    Reject,
}

/// Limits and defaults applied by the argument validator.
///
/// Every field is optional when deserializing, so a partial JSON document such as
/// `{"maxEventParameters": 10}` keeps the remaining defaults.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyticsSettings {
    pub max_event_parameters: usize,
    pub max_event_name_length: usize,
    pub default_minimum_session_duration_ms: i64,
    pub default_session_timeout_duration_ms: i64,
    pub duration_rounding: DurationRounding,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            max_event_parameters: DEFAULT_MAX_EVENT_PARAMETERS,
            max_event_name_length: DEFAULT_MAX_EVENT_NAME_LENGTH,
            default_minimum_session_duration_ms: DEFAULT_MINIMUM_SESSION_DURATION_MS,
            default_session_timeout_duration_ms: DEFAULT_SESSION_TIMEOUT_DURATION_MS,
            duration_rounding: DurationRounding::default(),
        }
    }
}

impl AnalyticsSettings {
    pub fn from_json_str(raw: &str) -> AnalyticsResult<Self> {
        let settings: AnalyticsSettings = serde_json::from_str(raw)
            .map_err(|err| invalid_argument(format!("invalid analytics settings: {err}")))?;
        settings.check()?;
        Ok(settings)
    }

    pub fn with_duration_rounding(mut self, rounding: DurationRounding) -> Self {
        self.duration_rounding = rounding;
        self
    }

    pub fn with_max_event_parameters(mut self, limit: usize) -> Self {
        self.max_event_parameters = limit;
        self
    }

    fn check(&self) -> AnalyticsResult<()> {
        if self.max_event_name_length == 0 {
            return Err(invalid_argument(
                "invalid analytics settings: maxEventNameLength must be positive",
            ));
        }
        if self.default_minimum_session_duration_ms < 0
            || self.default_session_timeout_duration_ms < 0
        {
            return Err(invalid_argument(
                "invalid analytics settings: default durations must not be negative",
            ));
        }
        Ok(())
    }
}
