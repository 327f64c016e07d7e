use std::path::Path;

use tracing::debug;

use crate::TokrepError;
use crate::TokrepResult;
use crate::placeholder::first_placeholder_name;
use crate::placeholder::placeholder;
use crate::resolver::ResolvedTokenSet;

/// Per-occurrence replacement strategy: maps a token name and its resolved
/// value to the text that is substituted into the content. The default is
/// [`identity_replacer`]. The returned text must not contain placeholder
/// markers.
pub type Replacer = Box<dyn Fn(&str, &str) -> String + Send + Sync>;

/// Content-wrapping strategy used in HTML mode: maps a file's base name and
/// its raw content to the wrapped content that is filtered and written. The
/// default is [`html_document_wrapper`].
pub type HtmlWrapper = Box<dyn Fn(&str, &str) -> String + Send + Sync>;

/// Default [`Replacer`]: substitutes the resolved value unchanged.
pub fn identity_replacer(_name: &str, value: &str) -> String {
	value.to_string()
}

/// Default [`HtmlWrapper`]: escapes `&`, `<`, `>`, and `"` in the content and
/// embeds the result, preformatted, in a minimal standalone document titled
/// with the file's base name. Placeholder markers use only characters the
/// escaping leaves alone, so references in the original content survive
/// wrapping and are still substituted afterwards.
pub fn html_document_wrapper(file_name: &str, content: &str) -> String {
	let escaped = escape_html(content);
	format!(
		"<!DOCTYPE html><html><head><title>{file_name}</title></head><body><pre>{escaped}</pre></body></html>"
	)
}

fn escape_html(content: &str) -> String {
	content
		.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
}

/// Substitutes `@@@NAME@@@` placeholders in text using a resolved token set.
///
/// The replacement and HTML-wrapping strategies are injectable; both
/// defaults are plain functions documented above.
pub struct ContentFilter<'t> {
	tokens: &'t ResolvedTokenSet,
	replacer: Replacer,
	html_wrapper: HtmlWrapper,
}

impl<'t> ContentFilter<'t> {
	/// A filter over `tokens` with the default replacement and wrapping
	/// strategies.
	pub fn new(tokens: &'t ResolvedTokenSet) -> Self {
		Self {
			tokens,
			replacer: Box::new(identity_replacer),
			html_wrapper: Box::new(html_document_wrapper),
		}
	}

	/// Replace the per-occurrence replacement strategy.
	pub fn with_replacer(
		mut self,
		replacer: impl Fn(&str, &str) -> String + Send + Sync + 'static,
	) -> Self {
		self.replacer = Box::new(replacer);
		self
	}

	/// Replace the HTML-wrapping strategy used by [`ContentFilter::render_file`]
	/// and [`ContentFilter::filter_file`] in HTML mode.
	pub fn with_html_wrapper(
		mut self,
		wrapper: impl Fn(&str, &str) -> String + Send + Sync + 'static,
	) -> Self {
		self.html_wrapper = Box::new(wrapper);
		self
	}

	/// Substitute every placeholder in `content`.
	///
	/// Repeatedly takes the leftmost remaining placeholder and replaces
	/// **all** occurrences of that name at once, so each distinct name is
	/// resolved exactly once per call. Resolved values are placeholder-free,
	/// so each step strictly reduces the number of distinct unresolved names
	/// and the loop terminates. Content without placeholders is returned
	/// unchanged, which also makes the operation idempotent.
	///
	/// Fails with [`TokrepError::MissingToken`] when a placeholder references
	/// a name the token set does not define.
	pub fn filter(&self, content: &str) -> TokrepResult<String> {
		let mut content = content.to_string();

		loop {
			let Some(name) = first_placeholder_name(&content).map(str::to_string) else {
				return Ok(content);
			};

			let Some(value) = self.tokens.get(&name) else {
				return Err(TokrepError::MissingToken(name));
			};

			let replacement = (self.replacer)(&name, value);
			content = content.replace(&placeholder(&name), &replacement);
		}
	}

	/// Compute the filtered content of the file at `path` without writing.
	/// Returns the original content alongside the filtered result.
	///
	/// With `html_escape` set, the content is passed through the wrapping
	/// strategy before substitution. A missing-token failure is annotated
	/// with `path`.
	pub fn render_file(&self, path: &Path, html_escape: bool) -> TokrepResult<(String, String)> {
		debug!(path = %path.display(), "filtering file");

		let original = std::fs::read_to_string(path)?;

		let content = if html_escape {
			let base_name = path
				.file_name()
				.and_then(|name| name.to_str())
				.unwrap_or_default();
			(self.html_wrapper)(base_name, &original)
		} else {
			original.clone()
		};

		let filtered = self
			.filter(&content)
			.map_err(|error| error.with_file(path))?;

		Ok((original, filtered))
	}

	/// Filter the file at `path` in place: read, optionally HTML-wrap,
	/// substitute, and overwrite. The rewrite is a plain truncate-and-write,
	/// not an atomic replace.
	pub fn filter_file(&self, path: &Path, html_escape: bool) -> TokrepResult<()> {
		let (_, filtered) = self.render_file(path, html_escape)?;
		std::fs::write(path, filtered)?;
		Ok(())
	}
}
