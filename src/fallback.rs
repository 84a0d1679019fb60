//! Fallback decision, applied once per group at the end of a pass.
//!
//! A group's fallback entry becomes active only as a last resort: when no
//! regular entry matched, the fallback is not suppressed, and the anti-flash
//! rule allows it. The anti-flash rule exists because entries are often
//! registered asynchronously in response to the very navigation being
//! evaluated: on a user-navigation pass over a group with no regular
//! entries yet, showing a "not found" fallback would flash and immediately
//! be replaced once the real entries arrive.

use crate::engine::{run_chain, ActivationContext, NavigationQueue, Trigger};
use crate::events::{ActivationEvent, ActivationSignal};
use crate::location::Location;
use crate::pattern::PathParams;
use crate::registry::{ActiveEntry, RoutingGroup};

/// Per-group fallback suppression state, settable independently of
/// registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackSuppression {
	/// The fallback participates normally.
	#[default]
	Enabled,
	/// The fallback never activates.
	All,
	/// The fallback never activates on passes with this trigger.
	ForTrigger(Trigger),
}

impl FallbackSuppression {
	/// Whether the fallback is suppressed for a pass with this trigger.
	pub fn suppresses(&self, trigger: Trigger) -> bool {
		match self {
			Self::Enabled => false,
			Self::All => true,
			Self::ForTrigger(suppressed) => *suppressed == trigger,
		}
	}
}

/// Applies the fallback decision for one group after its entries have been
/// evaluated. `any_matched` reports whether any regular (non-fallback,
/// non-observer) entry matched during the pass.
pub(crate) async fn apply_fallback(
	group: &mut RoutingGroup,
	any_matched: bool,
	_location: &Location,
	trigger: Trigger,
	signal: &ActivationSignal,
	nav: &NavigationQueue,
) {
	let Some(fallback) = group.fallback.clone() else {
		return;
	};

	if group.suppression.suppresses(trigger) || any_matched {
		if fallback.is_active() {
			fallback.set_active(false);
			if group
				.active
				.as_ref()
				.is_some_and(|a| a.entry.id() == fallback.id())
			{
				group.active = None;
			}
		}
		return;
	}

	// The fallback's own pattern won this pass as a regular match: it is
	// already active, its chain has run with the captured params, and the
	// slot is not consulted.
	if group
		.active
		.as_ref()
		.is_some_and(|a| a.entry.id() == fallback.id() && a.pattern.is_some())
	{
		return;
	}

	// Anti-flash rule: the fallback only activates on a user-navigation
	// pass if at least one regular entry is registered. Programmatic and
	// initial passes activate it even over an empty group.
	let has_regular_entries = group.entries.iter().any(|e| e.id() != fallback.id());
	if !has_regular_entries && trigger == Trigger::Navigation {
		return;
	}

	// An activation-disabled fallback is an observer: its chain runs below,
	// but it is never toggled, never assigned as the active entry, and
	// produces no signal.
	if !fallback.is_active() && !fallback.activation_disabled() {
		if let Some(previous) = group.active.take() {
			previous.entry.set_active(false);
		}
		fallback.set_active(true);
		group.active = Some(ActiveEntry {
			entry: fallback.clone(),
			pattern: None,
		});
		signal.emit(&ActivationEvent {
			group: group.name().to_string(),
			entry_id: fallback.id(),
			pattern: None,
		});
	}

	// The fallback chain runs on every pass that leaves it active, with an
	// empty parameter mapping: it was chosen as a last resort, not matched.
	let ctx = ActivationContext::new(PathParams::new(), None, trigger, nav.clone());
	run_chain(&fallback, &ctx).await;
}
