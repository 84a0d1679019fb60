// Registration surface: idempotency, registration-time evaluation against
// an already-seen location, bulk register/unregister, the install hook,
// parameter checkers, and config-layer resolution.

use std::sync::Arc;

use parking_lot::Mutex;

use lagrene::{ConfigLayer, RouteEntry, RoutingRegistry, Trigger};

fn entry(pattern: &str) -> Arc<RouteEntry> {
	RouteEntry::builder().pattern(pattern).build().unwrap()
}

// Test: registering the same entry twice leaves a single registration
#[tokio::test]
async fn test_duplicate_registration_is_ignored() {
	let mut registry = RoutingRegistry::new();
	let e = entry("/jobs");
	registry.register(Arc::clone(&e)).await;
	registry.register(Arc::clone(&e)).await;

	assert_eq!(registry.group("default").unwrap().entry_count(), 1);
}

// Test: an entry registered after a location was seen is evaluated
// immediately and can activate without a new navigation
#[tokio::test]
async fn test_late_registration_activates_immediately() {
	let mut registry = RoutingRegistry::new();
	registry
		.activate_current_location("/jobs", Trigger::Navigation)
		.await;

	let jobs = entry("/jobs");
	registry.register(Arc::clone(&jobs)).await;
	assert!(jobs.is_active());
	assert_eq!(
		registry.group("default").unwrap().active_pattern(),
		Some("/jobs")
	);
}

// Test: a late, more specific entry displaces the current active entry
#[tokio::test]
async fn test_late_registration_displaces_on_specificity() {
	let mut registry = RoutingRegistry::new();
	let broad = entry("/account/**");
	registry.register(Arc::clone(&broad)).await;
	registry
		.activate_current_location("/account/7", Trigger::Navigation)
		.await;
	assert!(broad.is_active());

	let specific = entry("/account/:id");
	registry.register(Arc::clone(&specific)).await;
	assert!(specific.is_active());
	assert!(!broad.is_active());
}

// Test: a late, less specific entry does not displace the active one
#[tokio::test]
async fn test_late_registration_respects_active_winner() {
	let mut registry = RoutingRegistry::new();
	let specific = entry("/account/:id");
	registry.register(Arc::clone(&specific)).await;
	registry
		.activate_current_location("/account/7", Trigger::Navigation)
		.await;

	let broad = entry("/account/**");
	registry.register(Arc::clone(&broad)).await;
	assert!(specific.is_active());
	assert!(!broad.is_active());
}

// Test: registration before any location has been seen has no activation
// side effects
#[tokio::test]
async fn test_registration_without_location_stays_inert() {
	let mut registry = RoutingRegistry::new();
	let jobs = entry("/jobs");
	registry.register(Arc::clone(&jobs)).await;

	assert!(!jobs.is_active());
	assert!(registry.group("default").unwrap().active_entry().is_none());
}

// Test: the install hook runs on the first registration only
#[tokio::test]
async fn test_install_hook_fires_once() {
	let installs = Arc::new(Mutex::new(0usize));
	let installs_clone = Arc::clone(&installs);

	let mut registry = RoutingRegistry::new();
	registry.set_install_hook(move || {
		*installs_clone.lock() += 1;
	});

	registry.register(entry("/a")).await;
	registry.register(entry("/b")).await;
	registry.register(entry("/c")).await;

	assert_eq!(*installs.lock(), 1);
}

// Test: bulk registration skips rejected and already-registered entries
#[tokio::test]
async fn test_register_matching_filters() {
	let mut registry = RoutingRegistry::new();
	let a = entry("/a");
	let b = RouteEntry::builder()
		.pattern("/b")
		.group("other")
		.build()
		.unwrap();
	registry.register(Arc::clone(&a)).await;

	registry
		.register_matching(vec![Arc::clone(&a), Arc::clone(&b)], |e| {
			e.group() == "default" || e.group() == "other"
		})
		.await;

	assert_eq!(registry.group("default").unwrap().entry_count(), 1);
	assert_eq!(registry.group("other").unwrap().entry_count(), 1);
}

// Test: unregistering the active entry clears the group's active state
// without promoting a replacement until the next pass
#[tokio::test]
async fn test_unregister_active_entry() {
	let mut registry = RoutingRegistry::new();
	let jobs = entry("/jobs");
	registry.register(Arc::clone(&jobs)).await;
	registry
		.activate_current_location("/jobs", Trigger::Navigation)
		.await;
	assert!(jobs.is_active());

	registry.unregister(&jobs);
	assert!(!jobs.is_active());
	assert!(!registry.is_registered(&jobs));
	assert!(registry.group("default").unwrap().active_entry().is_none());
}

// Test: unregister_matching removes across groups
#[tokio::test]
async fn test_unregister_matching_spans_groups() {
	let mut registry = RoutingRegistry::new();
	registry.register(entry("/a")).await;
	registry
		.register(RouteEntry::builder().pattern("/b").group("tabs").build().unwrap())
		.await;

	registry.unregister_matching(|_| true);

	assert_eq!(registry.group("default").unwrap().entry_count(), 0);
	assert_eq!(registry.group("tabs").unwrap().entry_count(), 0);
}

// Test: a parameter checker can veto a match, letting a broader sibling win
#[tokio::test]
async fn test_checker_vetoes_match() {
	let mut registry = RoutingRegistry::new();
	let numeric = RouteEntry::builder()
		.pattern("/record/:id")
		.checker(|params| {
			params
				.get("id")
				.is_some_and(|id| id.chars().all(|c| c.is_ascii_digit()))
		})
		.build()
		.unwrap();
	let catch = entry("/record/*");
	registry.register(Arc::clone(&numeric)).await;
	registry.register(Arc::clone(&catch)).await;

	registry
		.activate_current_location("/record/42", Trigger::Navigation)
		.await;
	assert!(numeric.is_active());

	registry
		.activate_current_location("/record/latest", Trigger::Navigation)
		.await;
	assert!(catch.is_active());
	assert!(!numeric.is_active());
}

// Test: per-instance overrides beat instance values beat defaults
#[tokio::test]
async fn test_config_layer_resolution_order() {
	let overridden = RouteEntry::builder()
		.pattern("/instance")
		.group("instance-group")
		.overrides(ConfigLayer {
			group: Some("override-group".to_string()),
			..ConfigLayer::default()
		})
		.build()
		.unwrap();
	assert_eq!(overridden.group(), "override-group");

	let defaulted = RouteEntry::builder()
		.defaults(ConfigLayer {
			patterns: Some(vec!["/from-default".to_string()]),
			group: Some("default-group".to_string()),
			..ConfigLayer::default()
		})
		.build()
		.unwrap();
	assert_eq!(defaulted.group(), "default-group");
	assert_eq!(defaulted.first_pattern(), Some("/from-default"));

	let mut registry = RoutingRegistry::new();
	registry.register(Arc::clone(&defaulted)).await;
	registry
		.activate_current_location("/from-default", Trigger::Navigation)
		.await;
	assert!(defaulted.is_active());
}
