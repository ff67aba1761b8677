use std::sync::Arc;
use std::time::Duration;

use firebase_analytics_bridge::analytics::{
    Analytics, AnalyticsSettings, ArgValue, ArgumentMap, BundleValue, CommandDispatcher,
    MethodCall, MethodChannel, MethodResponse, NativeBundle, NativeError, NativeInvocation,
    Operation, OperationRequest, ReactNativeModule, RecordingAnalytics, SemanticEvent,
};
use serde_json::{json, Value};

fn bridge() -> (CommandDispatcher, RecordingAnalytics) {
    let native = RecordingAnalytics::new();
    (CommandDispatcher::new(Arc::new(native.clone())), native)
}

fn numbered_params(count: usize) -> Value {
    Value::Object(
        (0..count)
            .map(|index| (index.to_string(), json!(1)))
            .collect(),
    )
}

#[tokio::test(flavor = "current_thread")]
async fn missing_required_arguments_never_reach_native() {
    let (dispatcher, native) = bridge();
    let requiring_arguments = Operation::all().filter(|operation| match operation {
        Operation::Semantic(event) => event.requires_params(),
        Operation::SetMinimumSessionDuration
        | Operation::SetSessionTimeoutDuration
        | Operation::ResetAnalyticsData => false,
        _ => true,
    });

    for operation in requiring_arguments {
        let err = dispatcher
            .dispatch(&OperationRequest::new(operation.name()))
            .expect_err(operation.name());
        assert_eq!(err.code_str(), "analytics/invalid-argument", "{operation}");
    }
    tokio::task::yield_now().await;
    assert!(native.invocations().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn reserved_event_name_is_rejected_over_the_channel() {
    let (dispatcher, native) = bridge();
    let channel = MethodChannel::new(dispatcher);
    for arguments in [
        json!({ "name": "session_start" }),
        json!({ "name": "session_start", "params": { "a": 1 } }),
    ] {
        let response = channel
            .handle(MethodCall::new("logEvent", Some(arguments)))
            .await;
        match response {
            MethodResponse::Error { message, .. } => assert!(message.contains("reserved event")),
            other => panic!("expected error, got {other:?}"),
        }
    }
    assert!(native.invocations().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn twenty_five_parameters_pass_and_twenty_six_fail() {
    let (dispatcher, native) = bridge();
    let channel = MethodChannel::new(dispatcher);

    let ok = channel
        .handle(MethodCall::new(
            "logEvent",
            Some(json!({ "name": "invertase", "params": numbered_params(25) })),
        ))
        .await;
    assert!(ok.is_success());

    let too_many = channel
        .handle(MethodCall::new(
            "logEvent",
            Some(json!({ "name": "invertase", "params": numbered_params(26) })),
        ))
        .await;
    match too_many {
        MethodResponse::Error { message, .. } => {
            assert!(message.contains("Maximum number of parameters exceeded"))
        }
        other => panic!("expected error, got {other:?}"),
    }
    assert_eq!(native.invocations().len(), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn compound_value_requires_currency_for_every_monetary_event() {
    let (dispatcher, native) = bridge();
    let module = ReactNativeModule::new(dispatcher);
    let monetary: Vec<_> = SemanticEvent::ALL
        .iter()
        .filter(|event| !event.compound_fields().is_empty())
        .collect();
    assert!(monetary.contains(&&SemanticEvent::ViewItem));

    for event in &monetary {
        let err = module
            .invoke(event.method_name(), vec![json!({ "item_id": "foo", "value": 123 })])
            .await
            .unwrap_err();
        assert!(
            err.message.contains("you must also supply the 'currency' parameter"),
            "{}",
            event.method_name()
        );

        module
            .invoke(
                event.method_name(),
                vec![json!({ "item_id": "foo", "value": 123, "currency": "GBP" })],
            )
            .await
            .unwrap();
    }
    assert_eq!(native.invocations().len(), monetary.len());
}

#[tokio::test(flavor = "current_thread")]
async fn user_id_null_clears_and_number_fails() {
    let (dispatcher, native) = bridge();
    let module = ReactNativeModule::new(dispatcher);

    module.invoke("setUserId", vec![Value::Null]).await.unwrap();
    let err = module
        .invoke("setUserId", vec![json!(66.1337)])
        .await
        .unwrap_err();
    assert!(err.message.contains("must be a string"));
    assert_eq!(native.invocations(), vec![NativeInvocation::SetUserId(None)]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failure_of_one_call_does_not_affect_another() {
    let native = RecordingAnalytics::new();
    native.delay_on("setUserProperty", Duration::from_millis(30));
    native.fail_on(
        "resetAnalyticsData",
        NativeError::with_code("internal", "storage unavailable"),
    );
    let analytics = Analytics::new(Arc::new(native.clone()));

    let (property, reset) = tokio::join!(
        analytics.set_user_property("plan", Some("pro")),
        analytics.reset_analytics_data(),
    );
    property.unwrap();
    let err = reset.unwrap_err();
    assert_eq!(err.code_str(), "internal");
    assert_eq!(err.message(), "storage unavailable");

    assert_eq!(
        native.invocations(),
        vec![NativeInvocation::SetUserProperty {
            name: "plan".into(),
            value: Some("pro".into()),
        }]
    );
}

#[tokio::test(flavor = "current_thread")]
async fn numeric_tags_survive_the_bridge() {
    let (dispatcher, native) = bridge();
    let channel = MethodChannel::new(dispatcher);
    channel
        .handle(MethodCall::new(
            "logEvent",
            Some(json!({
                "name": "numbers",
                "params": { "int": 7, "long": 8_589_934_592_i64, "double": 7.0, "flag": false },
            })),
        ))
        .await;

    let mut expected = NativeBundle::new();
    expected.insert("int", BundleValue::Int(7));
    expected.insert("long", BundleValue::Long(8_589_934_592));
    expected.insert("double", BundleValue::Double(7.0));
    expected.insert("flag", BundleValue::Bool(false));
    assert_eq!(
        native.invocations(),
        vec![NativeInvocation::LogEvent {
            name: "numbers".into(),
            params: Some(expected),
        }]
    );
}

#[tokio::test(flavor = "current_thread")]
async fn unsupported_values_fail_instead_of_being_dropped() {
    let (dispatcher, native) = bridge();
    let channel = MethodChannel::new(dispatcher);
    let response = channel
        .handle(MethodCall::new(
            "setUserProperties",
            Some(json!({ "properties": { "tags": ["a", "b"] } })),
        ))
        .await;
    match response {
        MethodResponse::Error { code, .. } => assert_eq!(code, "analytics/unsupported-value-type"),
        other => panic!("expected error, got {other:?}"),
    }
    assert!(native.invocations().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn screen_tracking_without_activity_resolves() {
    let native = RecordingAnalytics::without_activity();
    let analytics = Analytics::new(Arc::new(native.clone()));
    analytics
        .set_current_screen("invertase screen", None)
        .await
        .unwrap();
    assert!(native.invocations().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn settings_loaded_from_json_drive_validation() {
    let settings = AnalyticsSettings::from_json_str(
        r#"{"durationRounding": "reject", "defaultMinimumSessionDurationMs": 5000}"#,
    )
    .unwrap();
    let native = RecordingAnalytics::new();
    let analytics = Analytics::with_settings(Arc::new(native.clone()), settings);

    analytics.set_minimum_session_duration(None).await.unwrap();
    let params = ArgumentMap::from([("level".to_string(), ArgValue::from(3))]);
    analytics.log_level_start(params).await.unwrap();

    assert_eq!(
        native.invocations()[0],
        NativeInvocation::SetMinimumSessionDuration(5_000)
    );
    let module = ReactNativeModule::new(analytics.dispatcher().clone());
    let err = module
        .invoke("setMinimumSessionDuration", vec![json!(1.5)])
        .await
        .unwrap_err();
    assert!(err.message.contains("whole number"));
}
