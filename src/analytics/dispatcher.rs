use std::fmt;
use std::sync::Arc;

use crate::analytics::config::AnalyticsSettings;
use crate::analytics::error::{unsupported_operation, AnalyticsResult};
use crate::analytics::native::NativeAnalytics;
use crate::analytics::operation::{Operation, OperationRequest};
use crate::analytics::task::{spawn_native_call, OperationOutcome, PendingOutcome};
use crate::analytics::validate::ArgumentValidator;
use crate::analytics::value::ArgumentMap;

/// Routes named operations through validation and conversion to the injected native SDK.
///
/// Validation, conversion and unknown operation names fail synchronously. Once a call is
/// dispatched its outcome is delivered through the returned [`PendingOutcome`]; calls are
/// independent and may complete in any order.
#[derive(Clone)]
pub struct CommandDispatcher {
    native: Arc<dyn NativeAnalytics>,
    validator: ArgumentValidator,
}

impl fmt::Debug for CommandDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDispatcher")
            .field("settings", self.validator.settings())
            .finish()
    }
}

impl CommandDispatcher {
    pub fn new(native: Arc<dyn NativeAnalytics>) -> Self {
        Self::with_settings(native, AnalyticsSettings::default())
    }

    pub fn with_settings(native: Arc<dyn NativeAnalytics>, settings: AnalyticsSettings) -> Self {
        Self {
            native,
            validator: ArgumentValidator::new(settings),
        }
    }

    pub fn settings(&self) -> &AnalyticsSettings {
        self.validator.settings()
    }

    pub fn dispatch(&self, request: &OperationRequest) -> AnalyticsResult<PendingOutcome> {
        let Some(operation) = Operation::from_name(&request.operation) else {
            log::warn!("rejecting unsupported analytics operation '{}'", request.operation);
            return Err(unsupported_operation(&request.operation));
        };
        self.dispatch_operation(operation, &request.arguments)
    }

    pub fn dispatch_operation(
        &self,
        operation: Operation,
        arguments: &ArgumentMap,
    ) -> AnalyticsResult<PendingOutcome> {
        let command = self.validator.validate(operation, arguments)?.into_native()?;
        log::debug!(
            "dispatching analytics {operation} to native {}",
            command.native_method()
        );
        Ok(spawn_native_call(self.native.clone(), command))
    }

    /// Dispatches and waits for the outcome, folding synchronous and native failures together.
    pub async fn call(&self, request: &OperationRequest) -> OperationOutcome {
        self.dispatch(request)?.await
    }
}
