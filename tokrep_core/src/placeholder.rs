use std::sync::LazyLock;

use regex::Regex;

/// Matches a placeholder occurrence `@@@NAME@@@`. Token names are restricted
/// to letters, digits, underscores, and hyphens; the name may be empty, in
/// which case the reference can never match a stored token.
pub(crate) static PLACEHOLDER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"@@@([A-Za-z0-9_-]*)@@@").expect("placeholder pattern is valid"));

/// Render the placeholder marker for a token name.
pub(crate) fn placeholder(name: &str) -> String {
	format!("@@@{name}@@@")
}

pub(crate) fn contains_placeholder(content: &str) -> bool {
	PLACEHOLDER.is_match(content)
}

/// Name referenced by the leftmost placeholder in `content`, if any.
pub(crate) fn first_placeholder_name(content: &str) -> Option<&str> {
	PLACEHOLDER
		.captures(content)
		.and_then(|captures| captures.get(1))
		.map(|name| name.as_str())
}

/// Names referenced by every placeholder in `content`, in order of
/// occurrence. May contain duplicates.
pub(crate) fn placeholder_names(content: &str) -> impl Iterator<Item = &str> {
	PLACEHOLDER
		.captures_iter(content)
		.filter_map(|captures| captures.get(1).map(|name| name.as_str()))
}
