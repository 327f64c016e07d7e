use std::path::Path;

use crate::RawTokenSet;
use crate::ResolvedTokenSet;

pub(crate) fn raw_tokens(pairs: &[(&str, &str)]) -> RawTokenSet {
	RawTokenSet::from_pairs(pairs.iter().copied())
}

pub(crate) fn resolved_tokens(pairs: &[(&str, &str)]) -> ResolvedTokenSet {
	raw_tokens(pairs)
		.resolve()
		.expect("fixture token set resolves")
}

/// Write a file tree rooted at `root`, creating parent directories as
/// needed. Paths use `/` separators.
pub(crate) fn write_tree(root: &Path, files: &[(&str, &str)]) -> std::io::Result<()> {
	for (relative, content) in files {
		let path = root.join(relative);
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(path, content)?;
	}

	Ok(())
}
