use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::TokrepResult;
use crate::resolver;
use crate::resolver::ResolvedTokenSet;

/// Token definitions as read from disk. Values may still contain
/// `@@@NAME@@@` references to other tokens; call [`RawTokenSet::resolve`] to
/// eliminate them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTokenSet {
	tokens: BTreeMap<String, String>,
}

impl RawTokenSet {
	/// Read token definitions from a flat directory: every regular file
	/// directly inside `directory` defines one token, with the file name as
	/// the token name and the file content, trimmed of surrounding
	/// whitespace, as the raw value. Subdirectories are not descended into.
	///
	/// A missing or unlistable directory surfaces as the underlying I/O
	/// error.
	pub fn from_directory(directory: &Path) -> TokrepResult<Self> {
		debug!(directory = %directory.display(), "reading token definitions");

		let mut tokens = BTreeMap::new();

		for entry in std::fs::read_dir(directory)? {
			let entry = entry?;
			let path = entry.path();
			if !path.is_file() {
				continue;
			}

			let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
				debug!(path = %path.display(), "skipping definition file with non-UTF-8 name");
				continue;
			};

			let content = std::fs::read_to_string(&path)?;
			tokens.insert(name.to_string(), content.trim().to_string());
		}

		debug!(count = tokens.len(), "token definitions read");
		Ok(Self { tokens })
	}

	/// Build a raw token set from in-memory pairs. Values are trimmed the
	/// same way file contents are.
	pub fn from_pairs<N, V>(pairs: impl IntoIterator<Item = (N, V)>) -> Self
	where
		N: Into<String>,
		V: AsRef<str>,
	{
		let tokens = pairs
			.into_iter()
			.map(|(name, value)| (name.into(), value.as_ref().trim().to_string()))
			.collect();
		Self { tokens }
	}

	/// Resolve every cross-reference, producing a placeholder-free
	/// [`ResolvedTokenSet`] or a cyclic-definition error.
	pub fn resolve(self) -> TokrepResult<ResolvedTokenSet> {
		resolver::resolve(self)
	}

	/// The raw value for `name`, if the token is defined.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.tokens.get(name).map(String::as_str)
	}

	/// Iterate tokens in name order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.tokens
			.iter()
			.map(|(name, value)| (name.as_str(), value.as_str()))
	}

	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}

	pub(crate) fn into_inner(self) -> BTreeMap<String, String> {
		self.tokens
	}
}
