//! Validated command-forwarding bridge between script runtimes (React Native, Flutter) and the
//! native Firebase Analytics SDK.
//!
//! A platform binding hands the bridge an operation name and an argument mapping. The bridge
//! validates the arguments, converts structured parameters into primitive-typed native
//! bundles, forwards a single call to the injected [`analytics::NativeAnalytics`]
//! implementation and reports the outcome as `Ok(())` or a normalized `{code, message}` error.
//!
//! ```
//! use std::sync::Arc;
//!
//! use firebase_analytics_bridge::analytics::{Analytics, ArgValue, ArgumentMap, RecordingAnalytics};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let native = RecordingAnalytics::new();
//! let analytics = Analytics::new(Arc::new(native.clone()));
//!
//! let params = ArgumentMap::from([("search_term".to_string(), ArgValue::from("shoes"))]);
//! analytics.log_search(params).await?;
//! assert_eq!(native.invocations().len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod analytics;
pub mod platform;
