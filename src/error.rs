//! Error types for route patterns and lifecycle hooks.

use thiserror::Error;

/// Error raised when a pattern string cannot be compiled.
///
/// Pattern problems are rejected eagerly, at entry construction, so that a
/// malformed pattern can never silently misbehave during an activation pass.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatternError {
	/// A `**` segment appeared somewhere other than the final position.
	#[error("catch-all segment '**' must be the final segment in '{pattern}'")]
	CatchAllNotLast {
		/// The offending pattern string.
		pattern: String,
	},
	/// A `:name` segment with an empty name.
	#[error("named parameter with empty name in '{pattern}'")]
	EmptyParamName {
		/// The offending pattern string.
		pattern: String,
	},
}

/// Error returned by a lifecycle hook stage.
///
/// Hook failures never abort an activation pass. The engine logs the failure
/// and continues with the next stage, preserving the no-throw contract
/// toward the navigation source.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("lifecycle hook failed: {message}")]
pub struct HookError {
	message: String,
}

impl HookError {
	/// Creates a hook error from a message.
	pub fn message(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}
}
