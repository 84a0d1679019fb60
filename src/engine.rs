//! The activation engine.
//!
//! One activation pass evaluates every registered entry of a group against
//! the current location, in registration order. Which entry ends up active
//! is decided by pattern specificity, not by registration order, except for
//! ties. Each entry's full lifecycle chain is awaited before the next entry
//! is examined, so no two chains ever interleave within a pass.
//!
//! Navigation requested from inside a lifecycle hook is not run re-entrantly:
//! it is recorded on a [`NavigationQueue`] and drained as follow-up passes
//! once the current pass has completed.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::entry::RouteEntry;
use crate::events::{ActivationEvent, ActivationSignal};
use crate::fallback;
use crate::location::Location;
use crate::pattern::PathParams;
use crate::registry::{ActiveEntry, RoutingGroup};
use crate::specificity::{compare, Specificity};

/// Distinguishes how an activation pass was triggered. Consumed by the
/// fallback controller's suppression and anti-flash rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
	/// A user-driven navigation, such as an intercepted link click.
	Navigation,
	/// A programmatic or initial evaluation.
	Programmatic,
}

/// Queue of navigation requests recorded during a pass.
///
/// Lifecycle hooks receive a handle to this queue through
/// [`ActivationContext`]; requests are drained by the registry after the
/// pass that recorded them has completed.
#[derive(Clone, Default)]
pub struct NavigationQueue {
	inner: Arc<Mutex<VecDeque<(Location, Trigger)>>>,
}

impl NavigationQueue {
	/// Records a navigation request to run after the current pass.
	pub fn request(&self, location: impl Into<Location>, trigger: Trigger) {
		self.inner.lock().push_back((location.into(), trigger));
	}

	pub(crate) fn pop(&self) -> Option<(Location, Trigger)> {
		self.inner.lock().pop_front()
	}
}

/// Context handed to every lifecycle hook stage.
pub struct ActivationContext {
	params: PathParams,
	pattern: Option<String>,
	trigger: Trigger,
	nav: NavigationQueue,
}

impl ActivationContext {
	pub(crate) fn new(
		params: PathParams,
		pattern: Option<String>,
		trigger: Trigger,
		nav: NavigationQueue,
	) -> Self {
		Self {
			params,
			pattern,
			trigger,
			nav,
		}
	}

	/// The parameters captured by the winning pattern. Empty for fallback
	/// and unmatched forced activations.
	pub fn params(&self) -> &PathParams {
		&self.params
	}

	/// Looks up one captured parameter.
	pub fn param(&self, name: &str) -> Option<&str> {
		self.params.get(name).map(String::as_str)
	}

	/// The pattern string that fired, when the activation came from a match.
	pub fn pattern(&self) -> Option<&str> {
		self.pattern.as_deref()
	}

	/// How the pass was triggered.
	pub fn trigger(&self) -> Trigger {
		self.trigger
	}

	/// Requests a follow-up navigation. The request is queued and runs as a
	/// fresh pass after the current one completes.
	pub fn request_navigation(&self, location: impl Into<Location>) {
		self.nav.request(location, Trigger::Programmatic);
	}
}

/// Runs an entry's three-stage lifecycle chain, each stage awaited to
/// completion before the next. A failed stage is logged and the chain
/// continues; the pass itself never fails.
pub(crate) async fn run_chain(entry: &RouteEntry, ctx: &ActivationContext) {
	let Some(hooks) = entry.lifecycle() else {
		return;
	};
	if let Err(error) = hooks.pre_activate(ctx).await {
		tracing::warn!(entry = %entry.id(), %error, "pre_activate hook failed; continuing");
	}
	if let Err(error) = hooks.on_activate(ctx).await {
		tracing::warn!(entry = %entry.id(), %error, "on_activate hook failed; continuing");
	}
	if let Err(error) = hooks.post_activate(ctx).await {
		tracing::warn!(entry = %entry.id(), %error, "post_activate hook failed; continuing");
	}
}

/// Evaluates one entry against the location and, when it wins, makes it the
/// group's active entry. Returns whether the entry counts as matched for
/// the group's fallback decision.
pub(crate) async fn try_activate(
	group: &mut RoutingGroup,
	entry: &Arc<RouteEntry>,
	location: &Location,
	trigger: Trigger,
	signal: &ActivationSignal,
	nav: &NavigationQueue,
) -> bool {
	let Some(matched) = entry.match_location(location) else {
		return false;
	};

	// Observer detour: the callback chain fires on a match, but the entry
	// is never toggled and does not count toward "anything matched".
	if entry.activation_disabled() {
		let ctx =
			ActivationContext::new(matched.params, Some(matched.pattern), trigger, nav.clone());
		run_chain(entry, &ctx).await;
		return false;
	}

	if group.is_fallback(entry) && group.suppression.suppresses(trigger) {
		return false;
	}

	// Swapping is disallowed only when the currently active entry's winning
	// pattern still matches and strictly beats this entry's pattern.
	let swap_allowed = match &group.active {
		None => true,
		Some(active) => {
			let still_matches = active
				.pattern
				.as_deref()
				.map(|p| active.entry.pattern_still_matches(p, location))
				.unwrap_or(false);
			if still_matches {
				let active_pattern = active.pattern.as_deref().unwrap_or_default();
				compare(active_pattern, &matched.pattern) != Specificity::AWins
			} else {
				true
			}
		}
	};
	if !swap_allowed {
		return false;
	}

	let already_active = group
		.active
		.as_ref()
		.is_some_and(|a| a.entry.id() == entry.id());
	let ctx = ActivationContext::new(
		matched.params,
		Some(matched.pattern.clone()),
		trigger,
		nav.clone(),
	);

	if already_active {
		// The entry may have matched on a different one of its patterns.
		// Refresh the bookkeeping and re-run the chain, but do not produce
		// a deactivate/activate pair.
		if let Some(active) = group.active.as_mut() {
			active.pattern = Some(matched.pattern);
		}
		run_chain(entry, &ctx).await;
		return true;
	}

	if let Some(previous) = group.active.take() {
		// The outgoing entry is toggled off without a callback.
		previous.entry.set_active(false);
	}
	entry.set_active(true);
	group.active = Some(ActiveEntry {
		entry: Arc::clone(entry),
		pattern: Some(matched.pattern.clone()),
	});
	signal.emit(&ActivationEvent {
		group: group.name().to_string(),
		entry_id: entry.id(),
		pattern: Some(matched.pattern),
	});
	run_chain(entry, &ctx).await;
	true
}

/// Runs one full activation pass over a group: every entry in registration
/// order, stale-active cleanup, the fallback decision, and the
/// multiple-active diagnostic.
pub(crate) async fn run_group_pass(
	group: &mut RoutingGroup,
	location: &Location,
	trigger: Trigger,
	signal: &ActivationSignal,
	nav: &NavigationQueue,
) {
	let entries: Vec<Arc<RouteEntry>> = group.entries.clone();
	let mut any_matched = false;
	for entry in &entries {
		let activated = try_activate(group, entry, location, trigger, signal, nav).await;
		if activated && !group.is_fallback(entry) {
			any_matched = true;
		}
	}

	// An active entry whose winning pattern no longer matches, and which no
	// other entry displaced, is toggled off here. The fallback entry stays
	// for the fallback controller to decide, but its stale winning pattern
	// is cleared: if it remains active it does so as a fallback, not as a
	// match.
	let stale_fallback = match group.active.as_ref() {
		Some(active)
			if !active
				.pattern
				.as_deref()
				.map(|p| active.entry.pattern_still_matches(p, location))
				.unwrap_or(false) =>
		{
			Some(group.is_fallback(&active.entry))
		}
		_ => None,
	};
	match stale_fallback {
		Some(true) => {
			if let Some(active) = group.active.as_mut() {
				active.pattern = None;
			}
		}
		Some(false) => {
			if let Some(active) = group.active.take() {
				active.entry.set_active(false);
			}
		}
		None => {}
	}

	fallback::apply_fallback(group, any_matched, location, trigger, signal, nav).await;

	let active_count = group.entries.iter().filter(|e| e.is_active()).count();
	if active_count > 1 {
		tracing::error!(
			group = %group.name(),
			active_count,
			"more than one entry active in a group after an activation pass"
		);
	}
}
