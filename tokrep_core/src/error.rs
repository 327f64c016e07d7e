use std::path::Path;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// A token whose value still contains placeholders after resolution stalled.
///
/// Carried by [`TokrepError::CyclicDefinition`] so callers can report the
/// partially substituted value of every token that never became
/// placeholder-free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedToken {
	/// Name of the token.
	pub name: String,
	/// The token's value as it stood when resolution stopped making progress.
	pub value: String,
}

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum TokrepError {
	#[error(transparent)]
	#[diagnostic(code(tokrep::io_error))]
	Io(#[from] std::io::Error),

	#[error(
		"there is a cycle in the token definitions: {} (stuck values: {})",
		join_names(.0),
		join_stuck_values(.0)
	)]
	#[diagnostic(
		code(tokrep::cyclic_definition),
		help(
			"these tokens reference each other (or a token that is never defined) such that no \
			 substitution order can eliminate all placeholders"
		)
	)]
	CyclicDefinition(Vec<UnresolvedToken>),

	#[error("missing token `{0}`")]
	#[diagnostic(
		code(tokrep::missing_token),
		help("add a definition file named `{0}` to the token definitions directory")
	)]
	MissingToken(String),

	#[error("missing token `{}` in file `{}`", .name, .file.display())]
	#[diagnostic(
		code(tokrep::missing_token),
		help("add a definition file named `{name}` to the token definitions directory")
	)]
	MissingTokenInFile { name: String, file: PathBuf },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(tokrep::config_parse),
		help("check that tokrep.toml is valid TOML with an optional [exclude] section")
	)]
	ConfigParse(String),

	#[error("symlink cycle detected at: `{path}`")]
	#[diagnostic(
		code(tokrep::symlink_cycle),
		help("remove the circular symlink or exclude this path")
	)]
	SymlinkCycle { path: String },
}

impl TokrepError {
	/// Attach a file path to a [`TokrepError::MissingToken`] so callers can
	/// report which file referenced the undefined token. Every other variant
	/// is returned unchanged.
	pub fn with_file(self, file: &Path) -> Self {
		match self {
			Self::MissingToken(name) => {
				Self::MissingTokenInFile {
					name,
					file: file.to_path_buf(),
				}
			}
			other => other,
		}
	}
}

fn join_names(tokens: &[UnresolvedToken]) -> String {
	tokens
		.iter()
		.map(|token| token.name.as_str())
		.collect::<Vec<_>>()
		.join(", ")
}

fn join_stuck_values(tokens: &[UnresolvedToken]) -> String {
	tokens
		.iter()
		.map(|token| format!("{} = {:?}", token.name, token.value))
		.collect::<Vec<_>>()
		.join(", ")
}

pub type TokrepResult<T> = Result<T, TokrepError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
