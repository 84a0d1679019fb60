//! Location value type supplied by the host platform.
//!
//! A [`Location`] is a path plus an optional hash fragment. The engine never
//! mutates a location; it is read-only input to pattern matching.

/// A current location: `/`-delimited path plus an optional hash fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
	path: String,
	hash: String,
}

impl Location {
	/// Creates a location from a bare path with no hash fragment.
	pub fn new(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			hash: String::new(),
		}
	}

	/// Parses a location from a `path#hash` string.
	///
	/// Everything before the first `#` is the path; everything after it is
	/// the hash fragment (possibly empty).
	pub fn parse(raw: &str) -> Self {
		match raw.split_once('#') {
			Some((path, hash)) => Self {
				path: path.to_string(),
				hash: hash.to_string(),
			},
			None => Self::new(raw),
		}
	}

	/// Returns the path portion.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Returns the hash fragment, without the leading `#`. Empty when absent.
	pub fn hash(&self) -> &str {
		&self.hash
	}

	/// Returns the `/`-delimited path segments.
	pub fn segments(&self) -> Vec<&str> {
		self.path.split('/').collect()
	}
}

impl From<&str> for Location {
	fn from(raw: &str) -> Self {
		Self::parse(raw)
	}
}

impl std::fmt::Display for Location {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.hash.is_empty() {
			write!(f, "{}", self.path)
		} else {
			write!(f, "{}#{}", self.path, self.hash)
		}
	}
}
