//! `tokrep_core` is the core library for the tokrep substitution engine. It
//! turns a flat directory of token definitions into a fully resolved
//! name→value mapping and rewrites `@@@NAME@@@` placeholders across
//! configuration file trees in place.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Definitions directory
//!   → RawTokenSet (one file per token, trimmed values)
//!   → resolve (fixed-point substitution, cycle detection)
//!   → ResolvedTokenSet (immutable, placeholder-free)
//!   → ContentFilter (per-file substitution, pluggable strategies)
//!   → filter_directory (recursive in-place rewrite of a target tree)
//! ```
//!
//! ## Modules
//!
//! - [`config`] — Configuration loading from `tokrep.toml`, including the
//!   definitions directory, exclude patterns, and the multi-target failure
//!   budget.
//!
//! ## Key Types
//!
//! - [`RawTokenSet`] — Token definitions as read from disk; values may still
//!   reference other tokens.
//! - [`ResolvedTokenSet`] — The resolved mapping; no value contains a
//!   placeholder, immutable and safe to share across threads.
//! - [`ContentFilter`] — Placeholder substitution over text and files, with
//!   injectable [`Replacer`] and [`HtmlWrapper`] strategies.
//! - [`FilterOptions`] / [`FilterSummary`] — Options and outcome of a
//!   directory filtering run.
//! - [`TokrepError`] — Cyclic definitions, missing tokens (with file
//!   context), and pass-through I/O failures.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use tokrep_core::ContentFilter;
//! use tokrep_core::FilterOptions;
//! use tokrep_core::RawTokenSet;
//! use tokrep_core::filter_directory;
//!
//! let definitions = Path::new("tokens");
//! let tokens = RawTokenSet::from_directory(definitions)?.resolve()?;
//!
//! let filter = ContentFilter::new(&tokens);
//! let summary = filter_directory(
//! 	&filter,
//! 	Path::new("hosts/web01"),
//! 	definitions,
//! 	&FilterOptions::default(),
//! )?;
//! println!("{} file(s) changed", summary.changes.len());
//! # Ok::<(), tokrep_core::TokrepError>(())
//! ```

pub use config::*;
pub use error::*;
pub use filter::*;
pub use resolver::*;
pub use store::*;
pub use walker::*;

pub mod config;
mod error;
mod filter;
pub(crate) mod placeholder;
mod resolver;
mod store;
mod walker;

#[cfg(test)]
mod __fixtures;
