use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tokrep_cli::Commands;
use tokrep_cli::OutputFormat;
use tokrep_cli::TokrepCli;
use tokrep_core::AnyEmptyResult;
use tokrep_core::AnyResult;
use tokrep_core::ContentFilter;
use tokrep_core::FilterOptions;
use tokrep_core::FilterSummary;
use tokrep_core::RawTokenSet;
use tokrep_core::ResolvedTokenSet;
use tokrep_core::TokrepConfig;
use tokrep_core::filter_directory;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = TokrepCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	let default_directive = if args.verbose { "debug" } else { "warn" };
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(default_directive));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.init();

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match args.command {
		Some(Commands::Resolve { format }) => run_resolve(&args, format),
		Some(Commands::Filter {
			ref targets,
			html,
			dry_run,
			diff,
		}) => run_filter(&args, targets, html, dry_run, diff),
		Some(Commands::Info) => run_info(&args),
		None => {
			eprintln!("No subcommand specified. Run `tokrep --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<tokrep_core::TokrepError>() {
			Ok(tokrep_err) => {
				let report: miette::Report = (*tokrep_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

fn resolve_root(args: &TokrepCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Resolve the definitions directory: the `--definitions` flag wins,
/// otherwise the config value joined to the project root.
fn definitions_dir(
	args: &TokrepCli,
	config: Option<&TokrepConfig>,
	root: &Path,
) -> AnyResult<PathBuf> {
	if let Some(definitions) = &args.definitions {
		return Ok(definitions.clone());
	}

	if let Some(definitions) = config.and_then(|c| c.definitions.as_ref()) {
		return Ok(root.join(definitions));
	}

	Err("no token definitions directory configured; pass --definitions or set `definitions` in \
	     tokrep.toml"
		.into())
}

/// Load config, read the definitions directory, and resolve every
/// cross-reference. The resolved set is built once and reused for every
/// target.
fn resolve_tokens(args: &TokrepCli) -> AnyResult<(ResolvedTokenSet, PathBuf, Option<TokrepConfig>)> {
	let root = resolve_root(args);
	let config = TokrepConfig::load(&root)?;
	let definitions = definitions_dir(args, config.as_ref(), &root)?;
	let resolved = RawTokenSet::from_directory(&definitions)?.resolve()?;

	Ok((resolved, definitions, config))
}

fn print_section(title: &str) {
	println!();
	println!("{}", colored!(title, bold));
}

fn print_field(label: &str, value: impl std::fmt::Display) {
	println!("{label:<24} {value}");
}

fn run_resolve(args: &TokrepCli, format: OutputFormat) -> AnyEmptyResult {
	let (resolved, definitions, _) = resolve_tokens(args)?;

	match format {
		OutputFormat::Json => {
			let tokens: serde_json::Map<String, serde_json::Value> = resolved
				.iter()
				.map(|(name, value)| {
					(
						name.to_string(),
						serde_json::Value::String(value.to_string()),
					)
				})
				.collect();
			let output = serde_json::json!({
				"definitions": definitions.display().to_string(),
				"tokens": tokens,
			});
			println!("{output}");
		}
		OutputFormat::Text => {
			if resolved.is_empty() {
				println!("No token definitions found in {}", definitions.display());
				return Ok(());
			}

			println!("{}", colored!("Resolved tokens:", bold));
			for (name, value) in resolved.iter() {
				println!("  {name} = {value}");
			}
			println!(
				"\n{} token(s) resolved from {}",
				resolved.len(),
				definitions.display()
			);
		}
	}

	Ok(())
}

fn run_filter(
	args: &TokrepCli,
	targets: &[PathBuf],
	html: bool,
	dry_run: bool,
	diff: bool,
) -> AnyEmptyResult {
	let (resolved, definitions, config) = resolve_tokens(args)?;
	let filter = ContentFilter::new(&resolved);

	let mut options = FilterOptions::from_config(config.as_ref());
	options.html_escape = options.html_escape || html;
	options.dry_run = dry_run;

	let failure_budget = config.as_ref().and_then(|c| c.max_failed_targets);
	let mut failed_targets = 0usize;

	for (index, target) in targets.iter().enumerate() {
		if let Some(budget) = failure_budget {
			if failed_targets >= budget {
				eprintln!(
					"{} failure budget exhausted ({budget}); skipping {} remaining target(s)",
					colored!("warning:", yellow),
					targets.len() - index
				);
				break;
			}
		}

		match filter_directory(&filter, target, &definitions, &options) {
			Ok(summary) => report_target(target, &summary, dry_run, diff),
			Err(e) => {
				failed_targets += 1;
				let report: miette::Report = e.into();
				eprintln!(
					"{} filtering {} failed",
					colored!("error:", red),
					target.display()
				);
				eprintln!("{report:?}");
			}
		}
	}

	if failed_targets > 0 {
		eprintln!("{failed_targets} target(s) failed.");
		process::exit(1);
	}

	Ok(())
}

fn report_target(target: &Path, summary: &FilterSummary, dry_run: bool, diff: bool) {
	if dry_run {
		println!(
			"Dry run: would rewrite {} of {} file(s) in {}",
			summary.changes.len(),
			summary.visited_files,
			target.display()
		);
	} else {
		println!(
			"Filtered {} file(s) in {} ({} changed).",
			summary.visited_files,
			target.display(),
			summary.changes.len()
		);
	}

	for change in &summary.changes {
		println!("  {}", make_relative(&change.path, target));
		if diff {
			print_diff(&change.original, &change.filtered);
		}
	}
}

fn run_info(args: &TokrepCli) -> AnyEmptyResult {
	let root = resolve_root(args);
	let config = TokrepConfig::load(&root)?;
	let resolved_config = TokrepConfig::resolve_path(&root)
		.map_or_else(|| "none".to_string(), |path| path.display().to_string());

	println!("{}", colored!("tokrep info", bold));

	print_section("Project");
	print_field("Project root", root.display());
	print_field("Resolved config", resolved_config);

	print_section("Tokens");
	match definitions_dir(args, config.as_ref(), &root) {
		Ok(definitions) => {
			print_field("Definitions directory", definitions.display());
			match RawTokenSet::from_directory(&definitions) {
				Ok(raw) => {
					print_field("Definitions", raw.len());
					match raw.resolve() {
						Ok(_) => print_field("Resolution", "ok"),
						Err(e) => print_field("Resolution", format!("failed: {e}")),
					}
				}
				Err(e) => print_field("Definitions", format!("unreadable: {e}")),
			}
		}
		Err(_) => print_field("Definitions directory", "not configured"),
	}

	print_section("Filtering");
	let html_escape = config.as_ref().is_some_and(|c| c.html_escape);
	let exclude_patterns = config
		.as_ref()
		.map(|c| c.exclude.patterns.clone())
		.unwrap_or_default();
	let failure_budget = config
		.as_ref()
		.and_then(|c| c.max_failed_targets)
		.map_or_else(|| "unlimited".to_string(), |n| n.to_string());
	print_field("HTML escape", html_escape);
	print_field(
		"Exclude patterns",
		if exclude_patterns.is_empty() {
			"none".to_string()
		} else {
			exclude_patterns.join(", ")
		},
	);
	print_field("Failure budget", failure_budget);

	Ok(())
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				print!("    {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				print!("    {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				print!("     {change}");
			}
		}
	}
}

/// Make a path relative to a base directory for display purposes.
fn make_relative(path: &Path, base: &Path) -> String {
	path.strip_prefix(base)
		.unwrap_or(path)
		.display()
		.to_string()
}
