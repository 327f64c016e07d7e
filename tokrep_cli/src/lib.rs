use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Substitute @@@TOKEN@@@ placeholders across configuration trees.",
	long_about = "tokrep resolves a directory of token definitions (one file per token, values may \
	              reference other tokens) into a placeholder-free mapping, then rewrites \
	              @@@TOKEN@@@ markers in every file of one or more target directories, in \
	              place.\n\nQuick start:\n  tokrep resolve          Show the resolved token \
	              values\n  tokrep filter <DIR>     Rewrite placeholders under a directory\n  \
	              tokrep info             Inspect the loaded configuration"
)]
pub struct TokrepCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Token definitions directory. Overrides the `definitions` value from
	/// tokrep.toml.
	#[arg(long, short, global = true)]
	pub definitions: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Resolve the token definitions and print the resulting values.
	///
	/// Reads every definition file, eliminates cross-references between token
	/// values, and prints the fully resolved mapping in name order. Fails
	/// with a diagnostic listing the stuck tokens when the definitions
	/// contain a reference cycle.
	Resolve {
		/// Output format. Use `text` for human-readable output or `json`
		/// for programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Substitute placeholders in every file under the given directories.
	///
	/// Each target directory is walked recursively and every regular file is
	/// rewritten in place with resolved token values. Files under the
	/// definitions directory are never treated as templates. Targets are
	/// processed independently; a failure in one does not roll back files
	/// already rewritten there, and remaining targets still run until the
	/// configured failure budget is exhausted.
	Filter {
		/// Target directories to filter in place.
		#[arg(required = true)]
		targets: Vec<PathBuf>,

		/// HTML-escape file content and wrap it in a standalone document
		/// before substitution.
		#[arg(long, default_value_t = false)]
		html: bool,

		/// Report the files that would change without writing anything.
		#[arg(long, default_value_t = false)]
		dry_run: bool,

		/// Show a unified diff for each changed file.
		#[arg(long, default_value_t = false)]
		diff: bool,
	},
	/// Print a summary of the loaded configuration and token definitions.
	///
	/// Shows the resolved config file, the definitions directory, token
	/// counts, and the filtering options in effect.
	Info,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
