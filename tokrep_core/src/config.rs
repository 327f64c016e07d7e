use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::TokrepError;
use crate::TokrepResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["tokrep.toml", ".tokrep.toml", ".config/tokrep.toml"];

/// Environment variable that overrides config file discovery with an
/// explicit path.
pub const ENV_CONFIG_FILE: &str = "TOKREP_CONFIG_FILE";

/// Configuration loaded from a `tokrep.toml` file.
///
/// ```toml
/// definitions = "tokens"
/// html_escape = false
/// max_failed_targets = 3
///
/// [exclude]
/// patterns = ["*.rpmnew", "generated/"]
/// ```
///
/// The loaded value is constructed once at startup and passed by reference
/// to whatever needs it; there is no process-wide settings state.
#[derive(Debug, Default, Deserialize)]
pub struct TokrepConfig {
	/// Path to the token definitions directory, relative to the project
	/// root. One regular file per token: file name = token name, trimmed
	/// content = raw value.
	#[serde(default)]
	pub definitions: Option<PathBuf>,
	/// Exclusion configuration using gitignore-style patterns.
	#[serde(default)]
	pub exclude: ExcludeConfig,
	/// Default for HTML wrap mode: escape file content and embed it in a
	/// standalone document before substitution.
	#[serde(default)]
	pub html_escape: bool,
	/// Failure budget when filtering several target directories in one run:
	/// once this many targets have failed, no further targets are started.
	/// Absent means unlimited.
	#[serde(default)]
	pub max_failed_targets: Option<usize>,
}

/// Configuration for excluding files from filtering.
#[derive(Debug, Default, Deserialize)]
pub struct ExcludeConfig {
	/// Gitignore-style patterns for files and directories to skip during
	/// filtering, relative to the target directory.
	#[serde(default)]
	pub patterns: Vec<String>,
}

impl TokrepConfig {
	/// Resolve the config path: the `TOKREP_CONFIG_FILE` environment
	/// variable when set, otherwise the first existing discovery candidate
	/// under `root`.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		if let Some(path) = std::env::var_os(ENV_CONFIG_FILE) {
			return Some(PathBuf::from(path));
		}

		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the resolved config file at `root`. Returns
	/// `None` if no config file exists.
	pub fn load(root: &Path) -> TokrepResult<Option<TokrepConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: TokrepConfig =
			toml::from_str(&content).map_err(|e| TokrepError::ConfigParse(e.to_string()))?;

		Ok(Some(config))
	}
}
