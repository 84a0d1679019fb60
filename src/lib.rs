//! # Lagrene
//!
//! A client-side route-activation engine for single-page applications.
//!
//! Given a current location and a registered set of routable entries, the
//! engine decides, for each independent routing group, which single entry is
//! active, toggles that state, and runs the winning entry's lifecycle
//! hooks. It owns no rendering and no visual tree: host adapters register
//! entries, feed in location changes, and react to the became-active
//! signal.
//!
//! ## Core Concepts
//!
//! - **Pattern**: a `/`-delimited template with literal, `:param`, `*`, and
//!   trailing `**` segments, plus an optional `#hash` constraint.
//! - **Group**: an independent namespace of entries in which at most one
//!   entry is active at a time.
//! - **Specificity**: when several patterns match, the more constrained one
//!   wins, regardless of registration order.
//! - **Fallback**: the entry activated when nothing else in its group
//!   matches, subject to suppression and an anti-flash rule.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use lagrene::{RouteEntry, RoutingRegistry, Trigger};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut registry = RoutingRegistry::new();
//!
//! let jobs = RouteEntry::builder().pattern("/jobs/:id").build().unwrap();
//! registry.register(Arc::clone(&jobs)).await;
//!
//! registry
//! 	.activate_current_location("/jobs/42", Trigger::Navigation)
//! 	.await;
//! assert!(jobs.is_active());
//! # }
//! ```

mod config;
mod engine;
mod entry;
mod error;
mod events;
mod fallback;
mod location;
mod pattern;
mod registry;
mod specificity;

pub use config::{ConfigLayer, RouteConfig, DEFAULT_GROUP};
pub use engine::{ActivationContext, NavigationQueue, Trigger};
pub use entry::{EntryId, ParamChecker, RouteEntry, RouteEntryBuilder, RouteLifecycle};
pub use error::{HookError, PatternError};
pub use events::{ActivationEvent, ActivationSignal, ReceiverFn, SubscriptionId};
pub use fallback::FallbackSuppression;
pub use location::Location;
pub use pattern::{MatchResult, PathParams, RoutePattern};
pub use registry::{RoutingGroup, RoutingRegistry};
pub use specificity::{compare, Specificity};
