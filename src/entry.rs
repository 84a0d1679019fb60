//! Routable entries and their lifecycle hooks.
//!
//! A [`RouteEntry`] is a value object describing one routable unit: its
//! compiled patterns, its group, its flags, and the lifecycle hooks invoked
//! when it wins an activation pass. Entries are shared handles: the host
//! keeps one `Arc` clone for the lifetime of its UI element, the registry
//! keeps another while the entry is registered and drops it on
//! unregistration. The registry is never the sole owner.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{ConfigLayer, RouteConfig};
use crate::engine::ActivationContext;
use crate::error::{HookError, PatternError};
use crate::location::Location;
use crate::pattern::{match_first, MatchResult, PathParams};

/// Process-wide counter backing [`EntryId`].
static NEXT_ENTRY_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a registered entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

impl EntryId {
	fn next() -> Self {
		Self(NEXT_ENTRY_ID.fetch_add(1, Ordering::Relaxed))
	}
}

impl std::fmt::Display for EntryId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Predicate over captured parameters that can veto a match.
pub type ParamChecker = Arc<dyn Fn(&PathParams) -> bool + Send + Sync>;

/// Lifecycle hooks for a routable entry.
///
/// All three stages are optional: the default implementations are no-ops.
/// When an entry is activated (or an observer entry sees a match), the
/// engine runs `pre_activate`, `on_activate`, `post_activate` strictly in
/// that order, each awaited to completion before the next begins. A failed
/// stage is logged and the chain continues with the next stage.
#[async_trait]
pub trait RouteLifecycle: Send + Sync {
	/// Runs before the activation is applied to the host element.
	async fn pre_activate(&self, _ctx: &ActivationContext) -> Result<(), HookError> {
		Ok(())
	}

	/// Runs when the entry has become (or stayed) active.
	async fn on_activate(&self, _ctx: &ActivationContext) -> Result<(), HookError> {
		Ok(())
	}

	/// Runs after activation, for follow-up work such as data loading.
	async fn post_activate(&self, _ctx: &ActivationContext) -> Result<(), HookError> {
		Ok(())
	}
}

/// A registered routable unit.
pub struct RouteEntry {
	id: EntryId,
	config: RouteConfig,
	checker: Option<ParamChecker>,
	lifecycle: Option<Arc<dyn RouteLifecycle>>,
	active: AtomicBool,
}

impl std::fmt::Debug for RouteEntry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteEntry")
			.field("id", &self.id)
			.field("group", &self.config.group)
			.field(
				"patterns",
				&self
					.config
					.patterns
					.iter()
					.map(|p| p.as_str())
					.collect::<Vec<_>>(),
			)
			.field("activation_disabled", &self.config.activation_disabled)
			.field("is_fallback", &self.config.is_fallback)
			.field("active", &self.is_active())
			.finish()
	}
}

impl RouteEntry {
	/// Starts building an entry.
	pub fn builder() -> RouteEntryBuilder {
		RouteEntryBuilder::default()
	}

	/// Returns this entry's identity.
	pub fn id(&self) -> EntryId {
		self.id
	}

	/// Returns the resolved configuration.
	pub fn config(&self) -> &RouteConfig {
		&self.config
	}

	/// Returns the group this entry belongs to.
	pub fn group(&self) -> &str {
		&self.config.group
	}

	/// Whether this entry declares itself a fallback.
	pub fn is_fallback(&self) -> bool {
		self.config.is_fallback
	}

	/// Whether this entry is an observer that is never toggled active.
	pub fn activation_disabled(&self) -> bool {
		self.config.activation_disabled
	}

	/// Whether the entry is currently active. Adapters read this to drive
	/// show/hide behavior.
	pub fn is_active(&self) -> bool {
		self.active.load(Ordering::SeqCst)
	}

	pub(crate) fn set_active(&self, active: bool) {
		self.active.store(active, Ordering::SeqCst);
	}

	pub(crate) fn lifecycle(&self) -> Option<&Arc<dyn RouteLifecycle>> {
		self.lifecycle.as_ref()
	}

	/// The first declared pattern string, if any.
	pub fn first_pattern(&self) -> Option<&str> {
		self.config.patterns.first().map(|p| p.as_str())
	}

	/// Matches this entry's patterns against a location, in declaration
	/// order, applying the entry's parameter checker if one is set.
	pub fn match_location(&self, location: &Location) -> Option<MatchResult> {
		let checker = self
			.checker
			.as_ref()
			.map(|c| c.as_ref() as &(dyn Fn(&PathParams) -> bool + Send + Sync));
		match_first(&self.config.patterns, location, checker)
	}

	/// Re-evaluates one specific pattern of this entry (identified by its
	/// string form) against a location. Used to decide whether a previously
	/// winning pattern still matches.
	pub(crate) fn pattern_still_matches(&self, pattern: &str, location: &Location) -> bool {
		self.config
			.patterns
			.iter()
			.find(|p| p.as_str() == pattern)
			.and_then(|p| p.matches(location))
			.map(|params| match &self.checker {
				Some(check) => check(&params),
				None => true,
			})
			.unwrap_or(false)
	}
}

/// Builder for [`RouteEntry`].
///
/// Direct setters populate the per-instance configuration layer; the
/// `overrides` and `defaults` layers can be supplied whole for hosts that
/// carry explicit per-registration overrides or type-level defaults.
#[derive(Default)]
pub struct RouteEntryBuilder {
	overrides: ConfigLayer,
	instance: ConfigLayer,
	defaults: ConfigLayer,
	checker: Option<ParamChecker>,
	lifecycle: Option<Arc<dyn RouteLifecycle>>,
}

impl RouteEntryBuilder {
	/// Adds a pattern string, preserving declaration order.
	pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
		self.instance
			.patterns
			.get_or_insert_with(Vec::new)
			.push(pattern.into());
		self
	}

	/// Sets the routing group.
	pub fn group(mut self, group: impl Into<String>) -> Self {
		self.instance.group = Some(group.into());
		self
	}

	/// Marks the entry as the group's fallback.
	pub fn fallback(mut self) -> Self {
		self.instance.is_fallback = Some(true);
		self
	}

	/// Marks the entry as an observer that reacts to navigation without
	/// ever being toggled active.
	pub fn disable_activation(mut self) -> Self {
		self.instance.activation_disabled = Some(true);
		self
	}

	/// Supplies the explicit per-registration override layer.
	pub fn overrides(mut self, layer: ConfigLayer) -> Self {
		self.overrides = layer;
		self
	}

	/// Supplies the type-level default layer.
	pub fn defaults(mut self, layer: ConfigLayer) -> Self {
		self.defaults = layer;
		self
	}

	/// Sets a predicate over captured parameters; a `false` result rejects
	/// an otherwise-successful match.
	pub fn checker(mut self, checker: impl Fn(&PathParams) -> bool + Send + Sync + 'static) -> Self {
		self.checker = Some(Arc::new(checker));
		self
	}

	/// Attaches the lifecycle hooks.
	pub fn lifecycle(mut self, lifecycle: Arc<dyn RouteLifecycle>) -> Self {
		self.lifecycle = Some(lifecycle);
		self
	}

	/// Resolves configuration and compiles patterns.
	///
	/// # Errors
	///
	/// Returns [`PatternError`] if any configured pattern fails to compile.
	pub fn build(self) -> Result<Arc<RouteEntry>, PatternError> {
		let config = RouteConfig::resolve(&self.overrides, &self.instance, &self.defaults)?;
		Ok(Arc::new(RouteEntry {
			id: EntryId::next(),
			config,
			checker: self.checker,
			lifecycle: self.lifecycle,
			active: AtomicBool::new(false),
		}))
	}
}
