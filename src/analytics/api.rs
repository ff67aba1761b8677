use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::analytics::config::AnalyticsSettings;
use crate::analytics::dispatcher::CommandDispatcher;
use crate::analytics::error::AnalyticsResult;
use crate::analytics::events::SemanticEvent;
use crate::analytics::native::NativeAnalytics;
use crate::analytics::operation::{Operation, OperationRequest};
use crate::analytics::value::{ArgValue, ArgumentMap};

/// Typed entry point mirroring the script-side `analytics()` module.
///
/// Every method builds the same named request a platform binding would send and runs it
/// through the shared [`CommandDispatcher`], so validation behaves identically for Rust callers
/// and for bridged calls.
#[derive(Clone)]
pub struct Analytics {
    dispatcher: CommandDispatcher,
}

impl fmt::Debug for Analytics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analytics")
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}

macro_rules! semantic_event_methods {
    (required: [$($required:ident => $req_event:ident),* $(,)?], optional: [$($optional:ident => $opt_event:ident),* $(,)?] $(,)?) => {
        $(
            pub async fn $required(&self, params: ArgumentMap) -> AnalyticsResult<()> {
                self.log_semantic(SemanticEvent::$req_event, Some(params)).await
            }
        )*
        $(
            pub async fn $optional(&self, params: Option<ArgumentMap>) -> AnalyticsResult<()> {
                self.log_semantic(SemanticEvent::$opt_event, params).await
            }
        )*
    };
}

impl Analytics {
    pub fn new(native: Arc<dyn NativeAnalytics>) -> Self {
        Self::from_dispatcher(CommandDispatcher::new(native))
    }

    pub fn with_settings(native: Arc<dyn NativeAnalytics>, settings: AnalyticsSettings) -> Self {
        Self::from_dispatcher(CommandDispatcher::with_settings(native, settings))
    }

    pub fn from_dispatcher(dispatcher: CommandDispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    /// Logs a custom event. Reserved names, names outside `[A-Za-z0-9_]` and more than the
    /// configured number of parameters are rejected before reaching the native SDK.
    pub async fn log_event(&self, name: &str, params: Option<ArgumentMap>) -> AnalyticsResult<()> {
        self.run(
            OperationRequest::new(Operation::LogEvent.name())
                .with_arg("name", Some(name))
                .with_arg("params", params),
        )
        .await
    }

    pub async fn set_analytics_collection_enabled(&self, enabled: bool) -> AnalyticsResult<()> {
        self.run(
            OperationRequest::new(Operation::SetAnalyticsCollectionEnabled.name())
                .with_arg("enabled", Some(enabled)),
        )
        .await
    }

    /// Resolves without effect when no activity is in the foreground.
    pub async fn set_current_screen(
        &self,
        screen_name: &str,
        screen_class_override: Option<&str>,
    ) -> AnalyticsResult<()> {
        self.run(
            OperationRequest::new(Operation::SetCurrentScreen.name())
                .with_arg("screenName", Some(screen_name))
                .with_arg("screenClassOverride", screen_class_override),
        )
        .await
    }

    /// `None` applies the configured default (10 seconds).
    pub async fn set_minimum_session_duration(&self, milliseconds: Option<i64>) -> AnalyticsResult<()> {
        self.run(
            OperationRequest::new(Operation::SetMinimumSessionDuration.name())
                .with_arg("milliseconds", milliseconds),
        )
        .await
    }

    /// `None` applies the configured default (30 minutes).
    pub async fn set_session_timeout_duration(&self, milliseconds: Option<i64>) -> AnalyticsResult<()> {
        self.run(
            OperationRequest::new(Operation::SetSessionTimeoutDuration.name())
                .with_arg("milliseconds", milliseconds),
        )
        .await
    }

    /// `None` clears the user id.
    pub async fn set_user_id(&self, id: Option<&str>) -> AnalyticsResult<()> {
        self.run(
            OperationRequest::new(Operation::SetUserId.name())
                .with_arg("id", Some(ArgValue::from(id))),
        )
        .await
    }

    /// `None` clears the property.
    pub async fn set_user_property(&self, name: &str, value: Option<&str>) -> AnalyticsResult<()> {
        self.run(
            OperationRequest::new(Operation::SetUserProperty.name())
                .with_arg("name", Some(name))
                .with_arg("value", Some(ArgValue::from(value))),
        )
        .await
    }

    pub async fn set_user_properties(
        &self,
        properties: BTreeMap<String, Option<String>>,
    ) -> AnalyticsResult<()> {
        let properties: ArgumentMap = properties
            .into_iter()
            .map(|(name, value)| (name, ArgValue::from(value)))
            .collect();
        self.run(
            OperationRequest::new(Operation::SetUserProperties.name())
                .with_arg("properties", Some(properties)),
        )
        .await
    }

    pub async fn reset_analytics_data(&self) -> AnalyticsResult<()> {
        self.run(OperationRequest::new(Operation::ResetAnalyticsData.name()))
            .await
    }

    /// Logs one of the recommended events, enforcing its argument policy.
    pub async fn log_semantic(
        &self,
        event: SemanticEvent,
        params: Option<ArgumentMap>,
    ) -> AnalyticsResult<()> {
        self.run(OperationRequest::new(event.method_name()).with_arg("params", params))
            .await
    }

    semantic_event_methods! {
        required: [
            log_add_to_cart => AddToCart,
            log_add_to_wishlist => AddToWishlist,
            log_campaign_details => CampaignDetails,
            log_earn_virtual_currency => EarnVirtualCurrency,
            log_join_group => JoinGroup,
            log_level_end => LevelEnd,
            log_level_start => LevelStart,
            log_level_up => LevelUp,
            log_login => Login,
            log_post_score => PostScore,
            log_present_offer => PresentOffer,
            log_remove_from_cart => RemoveFromCart,
            log_search => Search,
            log_select_content => SelectContent,
            log_set_checkout_option => SetCheckoutOption,
            log_share => Share,
            log_sign_up => SignUp,
            log_spend_virtual_currency => SpendVirtualCurrency,
            log_unlock_achievement => UnlockAchievement,
            log_view_item => ViewItem,
            log_view_item_list => ViewItemList,
            log_view_search_results => ViewSearchResults,
        ],
        optional: [
            log_add_payment_info => AddPaymentInfo,
            log_app_open => AppOpen,
            log_begin_checkout => BeginCheckout,
            log_ecommerce_purchase => EcommercePurchase,
            log_generate_lead => GenerateLead,
            log_purchase_refund => PurchaseRefund,
            log_tutorial_begin => TutorialBegin,
            log_tutorial_complete => TutorialComplete,
        ],
    }

    async fn run(&self, request: OperationRequest) -> AnalyticsResult<()> {
        self.dispatcher.call(&request).await
    }
}
