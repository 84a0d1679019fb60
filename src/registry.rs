//! The routing registry: per-group entry lists and the registration API.
//!
//! A [`RoutingRegistry`] is an explicit, explicitly-constructed value; test
//! harnesses build a fresh one per test instead of sharing process-wide
//! state. All mutation happens on the single logical thread that also
//! dispatches navigation notifications, through `&mut self` methods.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::engine::{self, ActivationContext, NavigationQueue, Trigger};
use crate::entry::RouteEntry;
use crate::events::{ActivationEvent, ActivationSignal};
use crate::fallback::FallbackSuppression;
use crate::location::Location;
use crate::pattern::PathParams;

/// The currently active entry of a group, together with the pattern string
/// that produced the activation. The pattern is needed to re-evaluate
/// specificity on the next pass; it is `None` for fallback-path activations
/// and for a forced activation of an entry with no patterns (an unmatched
/// forced activation falls back to the entry's first pattern).
pub(crate) struct ActiveEntry {
	pub(crate) entry: Arc<RouteEntry>,
	pub(crate) pattern: Option<String>,
}

/// One independent routing group: an ordered entry list in which at most
/// one entry is active at a time.
pub struct RoutingGroup {
	name: String,
	pub(crate) entries: Vec<Arc<RouteEntry>>,
	pub(crate) active: Option<ActiveEntry>,
	pub(crate) fallback: Option<Arc<RouteEntry>>,
	pub(crate) suppression: FallbackSuppression,
}

impl std::fmt::Debug for RoutingGroup {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RoutingGroup")
			.field("name", &self.name)
			.field("entries", &self.entries.len())
			.field("active", &self.active.as_ref().map(|a| a.entry.id()))
			.field("fallback", &self.fallback.as_ref().map(|e| e.id()))
			.field("suppression", &self.suppression)
			.finish()
	}
}

impl RoutingGroup {
	pub(crate) fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			entries: Vec::new(),
			active: None,
			fallback: None,
			suppression: FallbackSuppression::default(),
		}
	}

	/// The group's name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Number of registered entries, the fallback included.
	pub fn entry_count(&self) -> usize {
		self.entries.len()
	}

	/// The currently active entry, if any.
	pub fn active_entry(&self) -> Option<&Arc<RouteEntry>> {
		self.active.as_ref().map(|a| &a.entry)
	}

	/// The pattern string that produced the current activation.
	pub fn active_pattern(&self) -> Option<&str> {
		self.active.as_ref().and_then(|a| a.pattern.as_deref())
	}

	/// The group's fallback entry, if one is registered.
	pub fn fallback_entry(&self) -> Option<&Arc<RouteEntry>> {
		self.fallback.as_ref()
	}

	pub(crate) fn is_fallback(&self, entry: &RouteEntry) -> bool {
		self.fallback.as_ref().is_some_and(|f| f.id() == entry.id())
	}
}

/// Process-lifetime routing state: groups, the last seen location, and the
/// became-active signal.
pub struct RoutingRegistry {
	groups: BTreeMap<String, RoutingGroup>,
	last_location: Option<Location>,
	router_installed: bool,
	install_hook: Option<Box<dyn FnOnce() + Send>>,
	signal: ActivationSignal,
	nav: NavigationQueue,
}

impl std::fmt::Debug for RoutingRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RoutingRegistry")
			.field("groups", &self.groups.keys().collect::<Vec<_>>())
			.field("last_location", &self.last_location)
			.field("router_installed", &self.router_installed)
			.finish()
	}
}

impl Default for RoutingRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl RoutingRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self {
			groups: BTreeMap::new(),
			last_location: None,
			router_installed: false,
			install_hook: None,
			signal: ActivationSignal::new(),
			nav: NavigationQueue::default(),
		}
	}

	/// Returns a clone of the became-active signal, for adapters to
	/// connect receivers to.
	pub fn activation_signal(&self) -> ActivationSignal {
		self.signal.clone()
	}

	/// Sets a hook that fires exactly once, on the first successful
	/// registration. Hosts use it to wire their navigation source lazily.
	pub fn set_install_hook(&mut self, hook: impl FnOnce() + Send + 'static) {
		self.install_hook = Some(Box::new(hook));
	}

	/// Looks up a group by name.
	pub fn group(&self, name: &str) -> Option<&RoutingGroup> {
		self.groups.get(name)
	}

	/// The location of the most recent activation pass.
	pub fn last_location(&self) -> Option<&Location> {
		self.last_location.as_ref()
	}

	/// Whether this entry is currently registered.
	pub fn is_registered(&self, entry: &RouteEntry) -> bool {
		self.groups
			.get(entry.group())
			.is_some_and(|g| g.entries.iter().any(|e| e.id() == entry.id()))
	}

	/// Registers an entry with its configured group.
	///
	/// Registration is idempotent: a second registration of the same entry
	/// is logged and ignored. If a location has already been seen, the
	/// newcomer is evaluated immediately; when the group carries a
	/// fallback, that evaluation is a full pass, because the fallback
	/// decision depends on whether anything in the group matched.
	pub async fn register(&mut self, entry: Arc<RouteEntry>) {
		let group_name = entry.group().to_string();
		{
			let group = self
				.groups
				.entry(group_name.clone())
				.or_insert_with(|| RoutingGroup::new(group_name.clone()));

			if group.entries.iter().any(|e| e.id() == entry.id()) {
				tracing::warn!(
					entry = %entry.id(),
					group = %group_name,
					"entry already registered; ignoring duplicate registration"
				);
				return;
			}

			if !entry.is_fallback() && entry.config().patterns.is_empty() {
				tracing::warn!(
					entry = %entry.id(),
					group = %group_name,
					"routing entry has no path pattern and will never match"
				);
			}

			if entry.is_fallback() {
				if group.fallback.is_none() {
					group.fallback = Some(Arc::clone(&entry));
				} else {
					tracing::warn!(
						entry = %entry.id(),
						group = %group_name,
						"group already has a fallback; keeping the first one"
					);
				}
			}

			// The fallback occupies the regular list as well: its own
			// patterns still compete on specificity, and the fallback slot
			// is only consulted as a last resort.
			group.entries.push(Arc::clone(&entry));
		}

		if !self.router_installed {
			self.router_installed = true;
			if let Some(hook) = self.install_hook.take() {
				hook();
			}
		}

		if let Some(location) = self.last_location.clone() {
			let has_fallback = self
				.groups
				.get(&group_name)
				.is_some_and(|g| g.fallback.is_some());
			if has_fallback {
				self.run_full_pass(&location, Trigger::Programmatic).await;
			} else {
				let signal = self.signal.clone();
				let nav = self.nav.clone();
				if let Some(group) = self.groups.get_mut(&group_name) {
					engine::try_activate(
						group,
						&entry,
						&location,
						Trigger::Programmatic,
						&signal,
						&nav,
					)
					.await;
				}
			}
			self.drain_navigation().await;
		}
	}

	/// Registers every entry accepted by the predicate that is not already
	/// registered.
	pub async fn register_matching<I, P>(&mut self, entries: I, predicate: P)
	where
		I: IntoIterator<Item = Arc<RouteEntry>>,
		P: Fn(&RouteEntry) -> bool,
	{
		for entry in entries {
			if !predicate(&entry) || self.is_registered(&entry) {
				continue;
			}
			self.register(entry).await;
		}
	}

	/// Removes an entry from its group.
	///
	/// If the entry was the active one, the group's active state is cleared
	/// and left unresolved until the next activation pass; it is not
	/// recomputed here.
	pub fn unregister(&mut self, entry: &RouteEntry) {
		let Some(group) = self.groups.get_mut(entry.group()) else {
			return;
		};
		let before = group.entries.len();
		group.entries.retain(|e| e.id() != entry.id());
		if group.entries.len() == before {
			return;
		}

		if group
			.active
			.as_ref()
			.is_some_and(|a| a.entry.id() == entry.id())
		{
			group.active = None;
			entry.set_active(false);
		}
		if group.is_fallback(entry) {
			group.fallback = None;
		}
	}

	/// Unregisters every registered entry accepted by the predicate.
	pub fn unregister_matching<P>(&mut self, predicate: P)
	where
		P: Fn(&RouteEntry) -> bool,
	{
		let matching: Vec<Arc<RouteEntry>> = self
			.groups
			.values()
			.flat_map(|g| g.entries.iter().filter(|e| predicate(e)).cloned())
			.collect();
		for entry in matching {
			self.unregister(&entry);
		}
	}

	/// Activates an entry unconditionally, bypassing matching.
	///
	/// Every other entry in the group, the fallback included, is toggled
	/// off. The entry's callback chain runs with whatever parameters `path`
	/// happens to match against its patterns, or an empty mapping. Used for
	/// host-driven activation outside normal navigation, such as showing an
	/// error view after an asynchronous module-load failure.
	pub async fn force_activate(&mut self, entry: &Arc<RouteEntry>, path: &str) {
		let location = Location::parse(path);
		let group_name = entry.group().to_string();
		let Some(group) = self.groups.get_mut(&group_name) else {
			tracing::warn!(
				entry = %entry.id(),
				group = %group_name,
				"force_activate on an entry whose group has no registrations"
			);
			return;
		};

		for other in &group.entries {
			if other.id() != entry.id() {
				other.set_active(false);
			}
		}
		group.active = None;

		let (params, pattern) = match entry.match_location(&location) {
			Some(m) => (m.params, Some(m.pattern)),
			None => (PathParams::new(), None),
		};

		if entry.activation_disabled() {
			tracing::warn!(
				entry = %entry.id(),
				"force_activate on an activation-disabled entry; running callbacks only"
			);
		} else {
			let became_active = !entry.is_active();
			entry.set_active(true);
			group.active = Some(ActiveEntry {
				entry: Arc::clone(entry),
				pattern: pattern
					.clone()
					.or_else(|| entry.first_pattern().map(str::to_string)),
			});
			if became_active {
				self.signal.emit(&ActivationEvent {
					group: group_name.clone(),
					entry_id: entry.id(),
					pattern: None,
				});
			}
		}

		let ctx = ActivationContext::new(params, pattern, Trigger::Programmatic, self.nav.clone());
		engine::run_chain(entry, &ctx).await;
		self.drain_navigation().await;
	}

	/// Re-evaluates every group against a new location. The navigation
	/// source calls this on every location change, and optionally once,
	/// eagerly, at startup.
	pub async fn activate_current_location(
		&mut self,
		location: impl Into<Location>,
		trigger: Trigger,
	) {
		let location = location.into();
		tracing::debug!(%location, ?trigger, "activation pass");
		self.last_location = Some(location.clone());
		self.run_full_pass(&location, trigger).await;
		self.drain_navigation().await;
	}

	/// Suppresses the fallback for a group entirely.
	pub fn disable_fallback(&mut self, group: &str) {
		self.group_mut_or_create(group).suppression = FallbackSuppression::All;
	}

	/// Suppresses the fallback for a group on passes with this trigger.
	pub fn disable_fallback_for(&mut self, group: &str, trigger: Trigger) {
		self.group_mut_or_create(group).suppression = FallbackSuppression::ForTrigger(trigger);
	}

	/// Lifts any fallback suppression for a group.
	pub fn enable_fallback(&mut self, group: &str) {
		self.group_mut_or_create(group).suppression = FallbackSuppression::Enabled;
	}

	fn group_mut_or_create(&mut self, name: &str) -> &mut RoutingGroup {
		self.groups
			.entry(name.to_string())
			.or_insert_with(|| RoutingGroup::new(name))
	}

	async fn run_full_pass(&mut self, location: &Location, trigger: Trigger) {
		let signal = self.signal.clone();
		let nav = self.nav.clone();
		let names: Vec<String> = self.groups.keys().cloned().collect();
		for name in names {
			if let Some(group) = self.groups.get_mut(&name) {
				engine::run_group_pass(group, location, trigger, &signal, &nav).await;
			}
		}
	}

	/// Runs passes queued by lifecycle hooks during the pass that just
	/// completed, until the queue is empty.
	async fn drain_navigation(&mut self) {
		while let Some((location, trigger)) = self.nav.pop() {
			tracing::debug!(%location, ?trigger, "running queued activation pass");
			self.last_location = Some(location.clone());
			self.run_full_pass(&location, trigger).await;
		}
	}
}
