mod api;
pub mod config;
pub mod constants;
mod dispatcher;
pub mod error;
pub mod events;
pub mod native;
mod operation;
mod task;
pub mod transport;
mod validate;
pub mod value;

pub use api::Analytics;
pub use config::{AnalyticsSettings, DurationRounding};
pub use dispatcher::CommandDispatcher;
pub use error::{AnalyticsError, AnalyticsErrorCode, AnalyticsResult};
pub use events::{CompoundField, SemanticEvent};
pub use native::{
    ActivityHandle, NativeAnalytics, NativeError, NativeInvocation, NativeResult,
    RecordingAnalytics,
};
pub use operation::{Operation, OperationRequest};
pub use task::{BridgeError, OperationOutcome, PendingOutcome};
pub use transport::{MethodCall, MethodChannel, MethodResponse, ReactNativeModule};
pub use validate::{ArgumentValidator, Command};
pub use value::{ArgValue, ArgumentMap, BundleValue, NativeBundle};
