use std::collections::BTreeMap;

use tracing::debug;

use crate::TokrepError;
use crate::TokrepResult;
use crate::UnresolvedToken;
use crate::placeholder::contains_placeholder;
use crate::placeholder::placeholder;
use crate::placeholder::placeholder_names;
use crate::store::RawTokenSet;

/// A fully resolved token set: no value contains a placeholder.
///
/// The only way to obtain one is through a successful [`resolve`] (or
/// [`RawTokenSet::resolve`]); the set is immutable afterwards, so it can be
/// shared freely across threads and reused for any number of filtering runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedTokenSet {
	tokens: BTreeMap<String, String>,
}

impl ResolvedTokenSet {
	/// The resolved value for `name`, if the token is defined.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.tokens.get(name).map(String::as_str)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.tokens.contains_key(name)
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
}

/// Resolve every cross-reference in `raw` by fixed-point substitution.
///
/// Tokens are partitioned into *valid* (placeholder-free) and *invalid*
/// values. Each pass substitutes, into every invalid value, the current
/// value of every valid token it references, then re-classifies. The set-wide
/// sweep converges for any acyclic reference graph regardless of chain depth;
/// a pass that leaves invalid tokens behind without performing a single
/// substitution means no order of substitutions can ever finish, and
/// resolution fails with the names and partially substituted values of every
/// stuck token. References to names that are never defined fail the same way.
///
/// There is no partially resolved result: the call either returns a complete
/// [`ResolvedTokenSet`] or an error.
pub fn resolve(raw: RawTokenSet) -> TokrepResult<ResolvedTokenSet> {
	let mut valid: BTreeMap<String, String> = BTreeMap::new();
	let mut invalid: BTreeMap<String, String> = BTreeMap::new();

	for (name, value) in raw.into_inner() {
		if contains_placeholder(&value) {
			invalid.insert(name, value);
		} else {
			valid.insert(name, value);
		}
	}

	let mut pass = 0usize;
	while !invalid.is_empty() {
		pass += 1;
		let mut still_invalid: BTreeMap<String, String> = BTreeMap::new();
		let mut substitutions = 0usize;

		for (name, mut value) in invalid {
			let mut referenced: Vec<String> = Vec::new();
			for referenced_name in placeholder_names(&value) {
				if !referenced.iter().any(|seen| seen == referenced_name) {
					referenced.push(referenced_name.to_string());
				}
			}

			for referenced_name in &referenced {
				if let Some(resolved_value) = valid.get(referenced_name) {
					value = value.replace(&placeholder(referenced_name), resolved_value);
					substitutions += 1;
				}
			}

			if contains_placeholder(&value) {
				still_invalid.insert(name, value);
			} else {
				valid.insert(name, value);
			}
		}

		debug!(pass, substitutions, remaining = still_invalid.len(), "resolution pass");

		if !still_invalid.is_empty() && substitutions == 0 {
			let unresolved = still_invalid
				.into_iter()
				.map(|(name, value)| UnresolvedToken { name, value })
				.collect();
			return Err(TokrepError::CyclicDefinition(unresolved));
		}

		invalid = still_invalid;
	}

	Ok(ResolvedTokenSet { tokens: valid })
}
