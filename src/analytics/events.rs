//! Recommended ("semantic") events and the argument policy attached to each of them.

/// Parameter pair where supplying the first obligates the caller to supply the second.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompoundField {
    pub field: &'static str,
    pub dependent: &'static str,
}

pub const VALUE_REQUIRES_CURRENCY: CompoundField = CompoundField {
    field: "value",
    dependent: "currency",
};

macro_rules! semantic_events {
    ($($variant:ident => ($method:literal, $event:literal, $required:literal, [$($compound:expr),*])),* $(,)?) => {
        /// Recommended events exposed as dedicated `log*` helpers.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum SemanticEvent {
            $($variant),*
        }

        impl SemanticEvent {
            pub const ALL: &'static [SemanticEvent] = &[$(SemanticEvent::$variant),*];

            /// Name of the helper on the calling side, e.g. `logAddToCart`.
            pub fn method_name(self) -> &'static str {
                match self {
                    $(SemanticEvent::$variant => $method),*
                }
            }

            /// Native event name the helper forwards to, e.g. `add_to_cart`.
            pub fn event_name(self) -> &'static str {
                match self {
                    $(SemanticEvent::$variant => $event),*
                }
            }

            /// Whether the helper needs an argument object because the native event requires
            /// at least one field.
            pub fn requires_params(self) -> bool {
                match self {
                    $(SemanticEvent::$variant => $required),*
                }
            }

            pub fn compound_fields(self) -> &'static [CompoundField] {
                match self {
                    $(SemanticEvent::$variant => &[$($compound),*]),*
                }
            }
        }
    };
}

semantic_events! {
    AddPaymentInfo => ("logAddPaymentInfo", "add_payment_info", false, []),
    AddToCart => ("logAddToCart", "add_to_cart", true, [VALUE_REQUIRES_CURRENCY]),
    AddToWishlist => ("logAddToWishlist", "add_to_wishlist", true, [VALUE_REQUIRES_CURRENCY]),
    AppOpen => ("logAppOpen", "app_open", false, []),
    BeginCheckout => ("logBeginCheckout", "begin_checkout", false, [VALUE_REQUIRES_CURRENCY]),
    CampaignDetails => ("logCampaignDetails", "campaign_details", true, []),
    EarnVirtualCurrency => ("logEarnVirtualCurrency", "earn_virtual_currency", true, []),
    EcommercePurchase => ("logEcommercePurchase", "ecommerce_purchase", false, [VALUE_REQUIRES_CURRENCY]),
    GenerateLead => ("logGenerateLead", "generate_lead", false, [VALUE_REQUIRES_CURRENCY]),
    JoinGroup => ("logJoinGroup", "join_group", true, []),
    LevelEnd => ("logLevelEnd", "level_end", true, []),
    LevelStart => ("logLevelStart", "level_start", true, []),
    LevelUp => ("logLevelUp", "level_up", true, []),
    Login => ("logLogin", "login", true, []),
    PostScore => ("logPostScore", "post_score", true, []),
    PresentOffer => ("logPresentOffer", "present_offer", true, [VALUE_REQUIRES_CURRENCY]),
    PurchaseRefund => ("logPurchaseRefund", "purchase_refund", false, [VALUE_REQUIRES_CURRENCY]),
    RemoveFromCart => ("logRemoveFromCart", "remove_from_cart", true, [VALUE_REQUIRES_CURRENCY]),
    Search => ("logSearch", "search", true, []),
    SelectContent => ("logSelectContent", "select_content", true, []),
    SetCheckoutOption => ("logSetCheckoutOption", "set_checkout_option", true, []),
    Share => ("logShare", "share", true, []),
    SignUp => ("logSignUp", "sign_up", true, []),
    SpendVirtualCurrency => ("logSpendVirtualCurrency", "spend_virtual_currency", true, []),
    TutorialBegin => ("logTutorialBegin", "tutorial_begin", false, []),
    TutorialComplete => ("logTutorialComplete", "tutorial_complete", false, []),
    UnlockAchievement => ("logUnlockAchievement", "unlock_achievement", true, []),
    ViewItem => ("logViewItem", "view_item", true, [VALUE_REQUIRES_CURRENCY]),
    ViewItemList => ("logViewItemList", "view_item_list", true, []),
    ViewSearchResults => ("logViewSearchResults", "view_search_results", true, []),
}

impl SemanticEvent {
    pub fn from_method_name(method: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|event| event.method_name() == method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn method_and_event_names_are_unique() {
        let methods: HashSet<_> = SemanticEvent::ALL.iter().map(|e| e.method_name()).collect();
        let events: HashSet<_> = SemanticEvent::ALL.iter().map(|e| e.event_name()).collect();
        assert_eq!(methods.len(), SemanticEvent::ALL.len());
        assert_eq!(events.len(), SemanticEvent::ALL.len());
        assert_eq!(SemanticEvent::ALL.len(), 30);
    }

    #[test]
    fn lookup_by_method_name() {
        assert_eq!(
            SemanticEvent::from_method_name("logAddToCart"),
            Some(SemanticEvent::AddToCart)
        );
        assert_eq!(SemanticEvent::from_method_name("logEvent"), None);
    }

    #[test]
    fn monetary_events_pair_value_with_currency() {
        for event in [
            SemanticEvent::AddToCart,
            SemanticEvent::AddToWishlist,
            SemanticEvent::BeginCheckout,
            SemanticEvent::PresentOffer,
            SemanticEvent::PurchaseRefund,
            SemanticEvent::RemoveFromCart,
            SemanticEvent::ViewItem,
        ] {
            assert_eq!(event.compound_fields(), &[VALUE_REQUIRES_CURRENCY]);
        }
        assert!(SemanticEvent::EarnVirtualCurrency.compound_fields().is_empty());
    }
}
