//! Route configuration and its layered resolution.
//!
//! Host adapters can describe an entry's routing behavior at three levels:
//! an explicit per-registration override, a per-instance value, and a
//! type-level default. For every property the first present value wins;
//! absence at all three levels yields the `false`/empty default. Resolution
//! happens exactly once, when the entry is built, never during an
//! activation pass.

use crate::error::PatternError;
use crate::pattern::RoutePattern;

/// The group entries belong to when no group is configured.
pub const DEFAULT_GROUP: &str = "default";

/// One source of configuration values. Every field is optional; a `None`
/// defers to the next layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
	/// Pattern strings, in declaration order.
	pub patterns: Option<Vec<String>>,
	/// Routing group name.
	pub group: Option<String>,
	/// Entry participates in callbacks but is never toggled active.
	pub activation_disabled: Option<bool>,
	/// Entry is the group's fallback.
	pub is_fallback: Option<bool>,
}

impl ConfigLayer {
	/// Convenience constructor for a layer carrying a single pattern.
	pub fn with_pattern(pattern: impl Into<String>) -> Self {
		Self {
			patterns: Some(vec![pattern.into()]),
			..Self::default()
		}
	}
}

/// Fully resolved routing configuration for one entry.
#[derive(Debug, Clone)]
pub struct RouteConfig {
	/// Compiled patterns, in declaration order.
	pub patterns: Vec<RoutePattern>,
	/// Routing group name.
	pub group: String,
	/// The entry is an observer: callbacks fire on match, but the entry is
	/// never assigned as a group's active entry.
	pub activation_disabled: bool,
	/// The entry is the group's fallback candidate.
	pub is_fallback: bool,
}

impl RouteConfig {
	/// Resolves the three configuration layers into a concrete config.
	///
	/// Pattern strings are compiled here, so malformed patterns are rejected
	/// before the entry can ever be registered.
	pub fn resolve(
		overrides: &ConfigLayer,
		instance: &ConfigLayer,
		defaults: &ConfigLayer,
	) -> Result<Self, PatternError> {
		let pattern_strs = pick(&overrides.patterns, &instance.patterns, &defaults.patterns)
			.cloned()
			.unwrap_or_default();

		let patterns = pattern_strs
			.iter()
			.map(|p| RoutePattern::new(p))
			.collect::<Result<Vec<_>, _>>()?;

		Ok(Self {
			patterns,
			group: pick(&overrides.group, &instance.group, &defaults.group)
				.cloned()
				.unwrap_or_else(|| DEFAULT_GROUP.to_string()),
			activation_disabled: pick(
				&overrides.activation_disabled,
				&instance.activation_disabled,
				&defaults.activation_disabled,
			)
			.copied()
			.unwrap_or(false),
			is_fallback: pick(
				&overrides.is_fallback,
				&instance.is_fallback,
				&defaults.is_fallback,
			)
			.copied()
			.unwrap_or(false),
		})
	}
}

/// First present value wins: override, then instance, then default.
fn pick<'a, T>(
	overrides: &'a Option<T>,
	instance: &'a Option<T>,
	defaults: &'a Option<T>,
) -> Option<&'a T> {
	overrides
		.as_ref()
		.or(instance.as_ref())
		.or(defaults.as_ref())
}
