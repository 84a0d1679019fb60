//! Specificity ordering over pattern strings.
//!
//! When a location matches more than one registered pattern in a group, the
//! engine must deterministically prefer the more constrained one; otherwise
//! registration order would silently decide which view is shown. Patterns
//! are compared position by position with a fixed rank per segment kind:
//! literal beats `:param`, which beats `*`, which beats `**`. When every
//! compared position ties, the longer pattern wins; a full-scan draw is a
//! tie, and registration order then applies as an implicit fallback.

/// Outcome of comparing two pattern strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Specificity {
	/// The first pattern is strictly more specific.
	AWins,
	/// The second pattern is strictly more specific.
	BWins,
	/// Neither pattern is more specific than the other.
	Tie,
}

/// Rank of a single segment: higher is more constrained.
fn rank(token: &str) -> u8 {
	match token {
		"**" => 0,
		"*" => 1,
		_ if token.starts_with(':') => 2,
		_ => 3,
	}
}

/// Strips an optional hash constraint; only path segments carry specificity.
fn path_part(pattern: &str) -> &str {
	pattern.split('#').next().unwrap_or(pattern)
}

/// Compares two pattern strings for specificity.
///
/// The walk stops at the first position where the segment kinds differ in
/// rank. Two distinct literals at the same position are a draw at that
/// position and the scan continues.
pub fn compare(a: &str, b: &str) -> Specificity {
	let a_tokens: Vec<&str> = path_part(a).split('/').collect();
	let b_tokens: Vec<&str> = path_part(b).split('/').collect();

	let common = a_tokens.len().min(b_tokens.len());
	for i in 0..common {
		let ra = rank(a_tokens[i]);
		let rb = rank(b_tokens[i]);
		if ra > rb {
			return Specificity::AWins;
		}
		if rb > ra {
			return Specificity::BWins;
		}
	}

	// The shorter pattern ran out: the longer one is more constrained.
	if a_tokens.len() > b_tokens.len() {
		return Specificity::AWins;
	}
	if b_tokens.len() > a_tokens.len() {
		return Specificity::BWins;
	}

	Specificity::Tie
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("/account/:id", "/account/**", Specificity::AWins)]
	#[case("/a/*", "/a/:id", Specificity::BWins)]
	#[case("/a/b", "/a/:id", Specificity::AWins)]
	#[case("/a/b", "/a/c", Specificity::Tie)]
	#[case("/a/b/c", "/a/b", Specificity::AWins)]
	#[case("/a", "/a/b", Specificity::BWins)]
	#[case("/a/**", "/a/**", Specificity::Tie)]
	#[case("/a/:x", "/a/:y", Specificity::Tie)]
	fn test_compare(#[case] a: &str, #[case] b: &str, #[case] expected: Specificity) {
		assert_eq!(compare(a, b), expected);
	}

	#[test]
	fn test_first_differing_rank_decides() {
		// The literal at position 1 beats the parameter even though the
		// parameter pattern is longer.
		assert_eq!(compare("/a/b", "/a/:id/c"), Specificity::AWins);
	}

	#[test]
	fn test_hash_constraint_ignored() {
		assert_eq!(compare("/a/b#x", "/a/b"), Specificity::Tie);
	}

	#[test]
	fn test_catch_all_loses_to_wildcard() {
		assert_eq!(compare("/a/**", "/a/*"), Specificity::BWins);
	}
}
