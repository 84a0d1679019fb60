//! Path pattern parsing and matching.
//!
//! A [`RoutePattern`] is a `/`-delimited template with four segment kinds:
//!
//! - literal text, matched exactly
//! - `:name`, a named parameter capturing one segment
//! - `*`, a single-segment wildcard capturing nothing
//! - `**`, a catch-all absorbing the rest of the path (final segment only)
//!
//! A pattern may also carry a hash constraint after a `#`:
//!
//! - `/a/b#details` requires the hash to equal `details`
//! - `/a/b#*` matches any non-empty hash
//! - `/a/b#` requires the hash to be empty
//!
//! The hash constraint is evaluated before any path segment, and a failed
//! hash check is "no match" regardless of the path.

use std::collections::HashMap;

use crate::error::PatternError;
use crate::location::Location;

/// Parameter names mapped to the segment values they captured.
pub type PathParams = HashMap<String, String>;

/// One parsed segment of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
	/// Literal text, matched by string equality.
	Literal(String),
	/// `:name`: matches any segment and records it under `name`.
	Param(String),
	/// `*`: matches any non-empty segment, records nothing.
	Wildcard,
	/// `**`: absorbs zero or more trailing segments.
	CatchAll,
}

/// Hash-fragment constraint carried by a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) enum HashConstraint {
	/// No `#` in the pattern: the location hash is ignored.
	#[default]
	None,
	/// Trailing `#`: the location hash must be empty.
	Empty,
	/// `#*`: the location must carry a non-empty hash.
	Any,
	/// `#literal`: exact equality.
	Literal(String),
}

/// A compiled path pattern.
///
/// Compilation happens once, at entry construction; matching is a pure
/// segment walk with no shared state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
	/// The original pattern string, kept for specificity comparison and
	/// for reporting which of an entry's patterns fired.
	raw: String,
	segments: Vec<Segment>,
	hash: HashConstraint,
}

/// A successful match: the captured parameters plus the pattern string that
/// produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
	/// Captured named parameters.
	pub params: PathParams,
	/// The pattern string that matched. When an entry carries several
	/// patterns this records which one actually fired.
	pub pattern: String,
}

impl RoutePattern {
	/// Compiles a pattern string.
	///
	/// # Errors
	///
	/// Returns [`PatternError::CatchAllNotLast`] if `**` appears anywhere
	/// but the final segment, and [`PatternError::EmptyParamName`] for a
	/// bare `:` segment.
	pub fn new(pattern: &str) -> Result<Self, PatternError> {
		let (path_part, hash) = match pattern.split_once('#') {
			Some((path, "")) => (path, HashConstraint::Empty),
			Some((path, "*")) => (path, HashConstraint::Any),
			Some((path, literal)) => (path, HashConstraint::Literal(literal.to_string())),
			None => (pattern, HashConstraint::None),
		};

		let raw_segments: Vec<&str> = path_part.split('/').collect();
		let last = raw_segments.len() - 1;
		let mut segments = Vec::with_capacity(raw_segments.len());

		for (i, seg) in raw_segments.iter().enumerate() {
			let parsed = match *seg {
				"**" => {
					if i != last {
						return Err(PatternError::CatchAllNotLast {
							pattern: pattern.to_string(),
						});
					}
					Segment::CatchAll
				}
				"*" => Segment::Wildcard,
				s if s.starts_with(':') => {
					let name = &s[1..];
					if name.is_empty() {
						return Err(PatternError::EmptyParamName {
							pattern: pattern.to_string(),
						});
					}
					Segment::Param(name.to_string())
				}
				s => Segment::Literal(s.to_string()),
			};
			segments.push(parsed);
		}

		Ok(Self {
			raw: pattern.to_string(),
			segments,
			hash,
		})
	}

	/// Returns the original pattern string.
	pub fn as_str(&self) -> &str {
		&self.raw
	}

	/// Attempts to match a location against this pattern.
	///
	/// Matching is deterministic and pure: the hash constraint is checked
	/// first, then segment counts, then a pairwise segment walk. Returns the
	/// captured parameters on success.
	pub fn matches(&self, location: &Location) -> Option<PathParams> {
		if !self.hash_matches(location.hash()) {
			return None;
		}

		let loc_segments = location.segments();
		let has_catch_all = matches!(self.segments.last(), Some(Segment::CatchAll));

		let compare_len = if has_catch_all {
			// The catch-all absorbs everything after the fixed prefix,
			// including zero segments.
			let prefix = self.segments.len() - 1;
			if loc_segments.len() < prefix {
				return None;
			}
			prefix
		} else {
			if loc_segments.len() != self.segments.len() {
				return None;
			}
			self.segments.len()
		};

		let mut params = PathParams::new();
		for (segment, value) in self.segments[..compare_len].iter().zip(loc_segments.iter()) {
			match segment {
				Segment::Literal(text) => {
					if text.as_str() != *value {
						return None;
					}
				}
				Segment::Param(name) => {
					params.insert(name.clone(), (*value).to_string());
				}
				Segment::Wildcard => {
					if value.is_empty() {
						return None;
					}
				}
				Segment::CatchAll => unreachable!("catch-all is always the final segment"),
			}
		}

		Some(params)
	}

	fn hash_matches(&self, hash: &str) -> bool {
		match &self.hash {
			HashConstraint::None => true,
			HashConstraint::Empty => hash.is_empty(),
			HashConstraint::Any => !hash.is_empty(),
			HashConstraint::Literal(expected) => expected == hash,
		}
	}
}

impl std::fmt::Display for RoutePattern {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.raw)
	}
}

/// Matches a location against an ordered pattern list, returning the first
/// success. Declaration order is significant: the returned pattern string
/// feeds later specificity comparisons.
///
/// The optional `checker` predicate can veto an otherwise-successful match
/// based on the captured parameters; a veto is equivalent to "no match" and
/// matching continues with the next pattern.
pub fn match_first(
	patterns: &[RoutePattern],
	location: &Location,
	checker: Option<&(dyn Fn(&PathParams) -> bool + Send + Sync)>,
) -> Option<MatchResult> {
	for pattern in patterns {
		if let Some(params) = pattern.matches(location) {
			if let Some(check) = checker {
				if !check(&params) {
					continue;
				}
			}
			return Some(MatchResult {
				params,
				pattern: pattern.as_str().to_string(),
			});
		}
	}
	None
}

#[cfg(test)]
mod tests {
	use super::*;

	fn loc(raw: &str) -> Location {
		Location::parse(raw)
	}

	#[test]
	fn test_literal_pattern() {
		let pattern = RoutePattern::new("/jobs").unwrap();
		assert!(pattern.matches(&loc("/jobs")).is_some());
		assert!(pattern.matches(&loc("/friends")).is_none());
		assert!(pattern.matches(&loc("/jobs/10")).is_none());
	}

	#[test]
	fn test_named_param() {
		let pattern = RoutePattern::new("/record/:id").unwrap();
		let params = pattern.matches(&loc("/record/10")).unwrap();
		assert_eq!(params.get("id"), Some(&"10".to_string()));
	}

	#[test]
	fn test_named_param_segment_count_mismatch() {
		let pattern = RoutePattern::new("/record/:id").unwrap();
		assert!(pattern.matches(&loc("/record/10/extra")).is_none());
		assert!(pattern.matches(&loc("/record")).is_none());
	}

	#[test]
	fn test_catch_all_absorbs_tail() {
		let pattern = RoutePattern::new("/view/**").unwrap();
		let params = pattern.matches(&loc("/view/a/b/c")).unwrap();
		assert!(params.is_empty());
	}

	#[test]
	fn test_catch_all_absorbs_zero_segments() {
		let pattern = RoutePattern::new("/view/**").unwrap();
		assert!(pattern.matches(&loc("/view")).is_some());
	}

	#[test]
	fn test_catch_all_rejected_outside_final_segment() {
		let result = RoutePattern::new("/a/**/b");
		assert_eq!(
			result,
			Err(PatternError::CatchAllNotLast {
				pattern: "/a/**/b".to_string()
			})
		);
	}

	#[test]
	fn test_single_wildcard() {
		let pattern = RoutePattern::new("/preferences/*/large").unwrap();
		assert!(pattern.matches(&loc("/preferences/user/large")).is_some());
		assert!(pattern.matches(&loc("/preferences/company/large")).is_some());
		assert!(pattern.matches(&loc("/preferences/large")).is_none());
	}

	#[test]
	fn test_wildcard_rejects_empty_segment() {
		let pattern = RoutePattern::new("/preferences/*/large").unwrap();
		assert!(pattern.matches(&loc("/preferences//large")).is_none());
	}

	#[test]
	fn test_empty_param_name_rejected() {
		assert_eq!(
			RoutePattern::new("/a/:"),
			Err(PatternError::EmptyParamName {
				pattern: "/a/:".to_string()
			})
		);
	}

	#[test]
	fn test_hash_literal() {
		let pattern = RoutePattern::new("/jobs#details").unwrap();
		assert!(pattern.matches(&loc("/jobs#details")).is_some());
		assert!(pattern.matches(&loc("/jobs#other")).is_none());
		assert!(pattern.matches(&loc("/jobs")).is_none());
	}

	#[test]
	fn test_hash_must_be_empty() {
		let pattern = RoutePattern::new("/jobs#").unwrap();
		assert!(pattern.matches(&loc("/jobs")).is_some());
		assert!(pattern.matches(&loc("/jobs#details")).is_none());
	}

	#[test]
	fn test_hash_wildcard_requires_a_hash() {
		let pattern = RoutePattern::new("/jobs#*").unwrap();
		assert!(pattern.matches(&loc("/jobs#anything")).is_some());
		assert!(pattern.matches(&loc("/jobs")).is_none());
	}

	#[test]
	fn test_hash_checked_before_path() {
		// A hash failure is "no match" even when the path would match.
		let pattern = RoutePattern::new("/record/:id#").unwrap();
		assert!(pattern.matches(&loc("/record/10#x")).is_none());
	}

	#[test]
	fn test_match_is_pure() {
		let pattern = RoutePattern::new("/record/:id").unwrap();
		let location = loc("/record/10");
		assert_eq!(pattern.matches(&location), pattern.matches(&location));
	}

	#[test]
	fn test_match_first_declaration_order() {
		let patterns = vec![
			RoutePattern::new("/a/**").unwrap(),
			RoutePattern::new("/a/:id").unwrap(),
		];
		let result = match_first(&patterns, &loc("/a/5"), None).unwrap();
		assert_eq!(result.pattern, "/a/**");
	}

	#[test]
	fn test_match_first_checker_veto_falls_through() {
		let patterns = vec![
			RoutePattern::new("/a/:id").unwrap(),
			RoutePattern::new("/a/**").unwrap(),
		];
		let numeric = |params: &PathParams| {
			params
				.get("id")
				.map_or(true, |id| id.chars().all(|c| c.is_ascii_digit()))
		};
		let result = match_first(&patterns, &loc("/a/abc"), Some(&numeric)).unwrap();
		// The :id pattern is vetoed; the catch-all still fires.
		assert_eq!(result.pattern, "/a/**");

		let result = match_first(&patterns, &loc("/a/42"), Some(&numeric)).unwrap();
		assert_eq!(result.pattern, "/a/:id");
	}

	#[test]
	fn test_multiple_params() {
		let pattern = RoutePattern::new("/users/:user_id/posts/:post_id").unwrap();
		let params = pattern.matches(&loc("/users/42/posts/123")).unwrap();
		assert_eq!(params.get("user_id"), Some(&"42".to_string()));
		assert_eq!(params.get("post_id"), Some(&"123".to_string()));
	}

	#[test]
	fn test_pattern_display() {
		let pattern = RoutePattern::new("/users/:id").unwrap();
		assert_eq!(pattern.to_string(), "/users/:id");
	}
}
