//! Drives the bridge the way a platform binding would: JSON method-channel envelopes in,
//! JSON replies out, with the in-process recording SDK standing in for the native one.

use std::sync::Arc;

use firebase_analytics_bridge::analytics::{
    ArgValue, CommandDispatcher, MethodChannel, NativeInvocation, RecordingAnalytics,
};
use serde_json::json;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let native = RecordingAnalytics::new();
    let channel = MethodChannel::new(CommandDispatcher::new(Arc::new(native.clone())));
    println!("listening on {}", channel.name());

    let calls = [
        json!({ "method": "setUserId", "arguments": { "id": "user-42" } }),
        json!({
            "method": "logAddToCart",
            "arguments": { "params": { "item_id": "sku-1", "value": 9.99, "currency": "EUR" } },
        }),
        json!({ "method": "logAddToCart", "arguments": { "params": { "value": 9.99 } } }),
        json!({ "method": "logEvent", "arguments": { "name": "session_start" } }),
        json!({ "method": "setDeviceColour", "arguments": null }),
    ];

    for call in calls {
        let reply = channel.handle_value(call.clone()).await;
        println!("{} -> {}", call["method"], serde_json::to_string(&reply)?);
    }

    for invocation in native.invocations() {
        match invocation {
            NativeInvocation::LogEvent {
                name,
                params: Some(bundle),
            } => {
                let params = ArgValue::Map(bundle.to_arguments()).to_json();
                println!("native: logEvent {name} {params}");
            }
            other => println!("native: {other:?}"),
        }
    }

    Ok(())
}
