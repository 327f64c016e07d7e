use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;
use tracing::info;

use crate::TokrepError;
use crate::TokrepResult;
use crate::config::TokrepConfig;
use crate::filter::ContentFilter;

/// Options controlling a directory filtering run.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
	/// HTML-escape and wrap file content before substitution.
	pub html_escape: bool,
	/// Compute changes without writing any file.
	pub dry_run: bool,
	/// Gitignore-style patterns for files under the target tree that must
	/// not be filtered. Relative to the target directory.
	pub exclude_patterns: Vec<String>,
}

impl FilterOptions {
	/// Construct [`FilterOptions`] from a loaded configuration. Flags the
	/// caller controls per invocation (`dry_run`) keep their defaults.
	pub fn from_config(config: Option<&TokrepConfig>) -> Self {
		Self {
			html_escape: config.is_some_and(|c| c.html_escape),
			dry_run: false,
			exclude_patterns: config
				.map(|c| c.exclude.patterns.clone())
				.unwrap_or_default(),
		}
	}
}

/// A file whose content differs after filtering.
#[derive(Debug, Clone)]
pub struct FileChange {
	pub path: PathBuf,
	/// Content before filtering.
	pub original: String,
	/// Content after wrapping (if any) and substitution.
	pub filtered: String,
}

/// Outcome of one directory filtering run.
#[derive(Debug, Default)]
pub struct FilterSummary {
	/// Number of regular files visited (excluded and skipped files not
	/// counted).
	pub visited_files: usize,
	/// Files whose content changed, in walk order.
	pub changes: Vec<FileChange>,
}

/// Recursively filter every regular file under `target` in place.
///
/// Paths under `definitions` (the directory the token set was read from)
/// are never treated as templates, even when that directory is nested inside
/// the target tree. The check is a structural is-ancestor test on
/// canonicalized paths. Files matching `options.exclude_patterns` are
/// skipped as well.
///
/// Each file is rewritten with a plain truncate-and-write; a failure midway
/// leaves earlier files already rewritten and later ones untouched. Nothing
/// is rolled back; callers decide what a partial outcome means for the run.
pub fn filter_directory(
	filter: &ContentFilter<'_>,
	target: &Path,
	definitions: &Path,
	options: &FilterOptions,
) -> TokrepResult<FilterSummary> {
	info!(directory = %target.display(), "filtering files");

	let definitions = definitions
		.canonicalize()
		.unwrap_or_else(|_| definitions.to_path_buf());
	let exclude = build_exclude_matcher(target, &options.exclude_patterns)?;

	let mut summary = FilterSummary::default();
	let mut visited_dirs = HashSet::new();
	walk_dir(
		filter,
		target,
		&definitions,
		&exclude,
		options,
		&mut summary,
		&mut visited_dirs,
	)?;

	info!(
		visited = summary.visited_files,
		changed = summary.changes.len(),
		"directory filtered"
	);
	Ok(summary)
}

/// Build a `Gitignore` matcher from the configured exclude patterns. These
/// follow `.gitignore` syntax, rooted at the target directory.
fn build_exclude_matcher(root: &Path, patterns: &[String]) -> TokrepResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			TokrepError::ConfigParse(format!("invalid exclude pattern `{pattern}`: {e}"))
		})?;
	}
	builder
		.build()
		.map_err(|e| TokrepError::ConfigParse(format!("failed to build exclude rules: {e}")))
}

fn walk_dir(
	filter: &ContentFilter<'_>,
	dir: &Path,
	definitions: &Path,
	exclude: &Gitignore,
	options: &FilterOptions,
	summary: &mut FilterSummary,
	visited_dirs: &mut HashSet<PathBuf>,
) -> TokrepResult<()> {
	if !dir.is_dir() {
		return Ok(());
	}

	let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
	if canonical.starts_with(definitions) {
		return Ok(());
	}

	// Detect symlink cycles by tracking canonical paths.
	if !visited_dirs.insert(canonical) {
		return Err(TokrepError::SymlinkCycle {
			path: dir.display().to_string(),
		});
	}

	let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
		.map(|entry| entry.map(|e| e.path()))
		.collect::<Result<_, _>>()?;
	// Sort for deterministic ordering.
	entries.sort();

	for path in entries {
		let is_dir = path.is_dir();

		if exclude.matched(&path, is_dir).is_ignore() {
			continue;
		}

		if is_dir {
			walk_dir(
				filter,
				&path,
				definitions,
				exclude,
				options,
				summary,
				visited_dirs,
			)?;
		} else if path.is_file() {
			summary.visited_files += 1;

			let (original, filtered) = filter.render_file(&path, options.html_escape)?;
			if !options.dry_run {
				std::fs::write(&path, &filtered)?;
			}

			if original != filtered {
				summary.changes.push(FileChange {
					path,
					original,
					filtered,
				});
			}
		}
	}

	Ok(())
}
