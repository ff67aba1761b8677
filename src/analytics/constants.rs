pub const SERVICE_NAME: &str = "Analytics";
pub const CHANNEL_NAMESPACE: &str = "io.invertase.firebase";
pub const CHANNEL_MODULE: &str = "analytics";

pub const UNKNOWN_ERROR_CODE: &str = "unknown";
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

pub const DEFAULT_MAX_EVENT_PARAMETERS: usize = 25;
pub const DEFAULT_MAX_EVENT_NAME_LENGTH: usize = 40;
pub const DEFAULT_MINIMUM_SESSION_DURATION_MS: i64 = 10_000;
pub const DEFAULT_SESSION_TIMEOUT_DURATION_MS: i64 = 1_800_000;

/// Event names reserved by the native SDK for automatically collected events.
pub const RESERVED_EVENT_NAMES: &[&str] = &[
    "app_clear_data",
    "app_uninstall",
    "app_update",
    "error",
    "first_open",
    "in_app_purchase",
    "notification_dismiss",
    "notification_foreground",
    "notification_open",
    "notification_receive",
    "os_update",
    "session_start",
    "user_engagement",
];

pub fn is_reserved_event_name(name: &str) -> bool {
    RESERVED_EVENT_NAMES.contains(&name)
}

/// Name of the method channel the platform binding listens on.
pub fn channel_name() -> String {
    format!("{CHANNEL_NAMESPACE}/{CHANNEL_MODULE}")
}
