use crate::lcs::{line_is_repeated, longest_common_run};
use crate::{Error, Result};
use tracing::debug;

/// Models that sometimes emit one extra leading space at a mid-line cursor.
const DEFAULT_LEADING_SPACE_MARKERS: &[&str] = &["codestral"];

/// Models that tend to re-emit the start of the current line.
const DEFAULT_PREFIX_ECHO_MARKERS: &[&str] = &["granite"];

/// A completion shorter than this many lines is never treated as a
/// repetition loop.
const MIN_LINES_FOR_REPETITION_CHECK: usize = 6;

/// Repetition periods to probe, exclusive upper bound.
const MAX_REPETITION_PERIOD: usize = 3;

// region:    --- ModelQuirks

/// Configuration table of per-model correction markers.
///
/// Markers are matched by case-insensitive substring against the caller's
/// model identifier. The table is passed explicitly so the postprocessor
/// stays pure and independently testable; `Default` carries the known
/// quirky-model markers.
#[derive(Debug, Clone)]
pub struct ModelQuirks {
	leading_space_markers: Vec<String>,
	prefix_echo_markers: Vec<String>,
}

impl Default for ModelQuirks {
	fn default() -> Self {
		Self {
			leading_space_markers: DEFAULT_LEADING_SPACE_MARKERS.iter().map(|s| s.to_string()).collect(),
			prefix_echo_markers: DEFAULT_PREFIX_ECHO_MARKERS.iter().map(|s| s.to_string()).collect(),
		}
	}
}

impl ModelQuirks {
	/// Builds a custom marker table. An empty marker would substring-match
	/// every model id, so those are rejected.
	pub fn new(leading_space_markers: Vec<String>, prefix_echo_markers: Vec<String>) -> Result<Self> {
		if leading_space_markers.iter().any(|m| m.trim().is_empty()) {
			return Err(Error::quirks_empty_marker("leading_space"));
		}
		if prefix_echo_markers.iter().any(|m| m.trim().is_empty()) {
			return Err(Error::quirks_empty_marker("prefix_echo"));
		}

		Ok(Self {
			leading_space_markers: leading_space_markers.into_iter().map(|m| m.to_lowercase()).collect(),
			prefix_echo_markers: prefix_echo_markers.into_iter().map(|m| m.to_lowercase()).collect(),
		})
	}

	fn has_leading_space_quirk(&self, model_id: &str) -> bool {
		matches_marker(model_id, &self.leading_space_markers)
	}

	fn has_prefix_echo_quirk(&self, model_id: &str) -> bool {
		matches_marker(model_id, &self.prefix_echo_markers)
	}
}

fn matches_marker(model_id: &str, markers: &[String]) -> bool {
	let model_id = model_id.to_lowercase();
	markers.iter().any(|marker| model_id.contains(marker))
}

// endregion: --- ModelQuirks

/// Filters and corrects a finished completion before it is shown.
///
/// Returns `None` (the reject verdict, meaning "show nothing") when the
/// completion is degenerate, otherwise the possibly-corrected completion.
/// The gates short-circuit in order:
///
/// 1. Blank completion.
/// 2. Whitespace-only completion.
/// 3. First completion line repeats the line above the cursor.
/// 4. Runaway repetition loop.
///
/// Surviving completions then go through narrow per-model corrections keyed
/// on `quirks`, plus a universal double-space seam fixup. Never fails; a
/// transform that does not apply is a no-op.
pub fn postprocess_completion(
	completion: &str,
	model_id: &str,
	prefix: &str,
	suffix: &str,
	quirks: &ModelQuirks,
) -> Option<String> {
	// -- Gate: blank completion
	if completion.trim().is_empty() {
		debug!(model_id, "postprocess reject: blank completion");
		return None;
	}

	// -- Gate: whitespace-only completion
	if completion.chars().all(char::is_whitespace) {
		debug!(model_id, "postprocess reject: whitespace-only completion");
		return None;
	}

	// -- Gate: completion repeats the line above the cursor
	if repeats_line_above(completion, prefix) {
		debug!(model_id, "postprocess reject: repeats line above");
		return None;
	}

	// -- Gate: runaway repetition loop
	if is_extreme_repetition(completion) {
		debug!(model_id, "postprocess reject: extreme repetition");
		return None;
	}

	let mut completion = completion.to_string();

	// -- Correction: extra leading space at a mid-line cursor
	if quirks.has_leading_space_quirk(model_id) {
		if completion.starts_with(' ')
			&& !completion.starts_with("  ")
			&& prefix.ends_with(' ')
			&& suffix.starts_with('\n')
		{
			completion = completion[1..].to_string();
		}

		// Double blank line when completing at the end of the file.
		if suffix.is_empty() && prefix.ends_with("\n\n") && completion.starts_with('\n') {
			completion = completion[1..].to_string();
		}
	}

	// -- Correction: model re-emits the start of the current line
	if quirks.has_prefix_echo_quirk(model_id) {
		let prefix_end = prefix.split('\n').next_back().unwrap_or_default();
		if !prefix_end.is_empty() {
			let trimmed = prefix_end.trim();
			let last_word = trimmed.split_whitespace().next_back();

			if let Some(stripped) = completion.strip_prefix(prefix_end) {
				completion = stripped.to_string();
			} else if let Some(last_word) = last_word
				&& let Some(stripped) = completion.strip_prefix(last_word)
			{
				completion = stripped.to_string();
			} else if let Some(stripped) = completion.strip_prefix(trimmed) {
				completion = stripped.to_string();
			}
		}

		// Indented start while the cursor sits at the end of a line: the
		// model wanted a fresh line rather than continuing this one.
		if (completion.starts_with("  ") || completion.starts_with('\t'))
			&& !prefix.ends_with('\n')
			&& (suffix.starts_with('\n') || suffix.trim().is_empty())
		{
			completion = format!("\n{completion}");
		}
	}

	// -- Universal seam fixup: no double space where prefix and completion meet
	if prefix.ends_with(' ') && completion.starts_with(' ') {
		completion = completion[1..].to_string();
	}

	Some(completion)
}

// region:    --- Support

/// True when the first non-blank completion line near-equals the last
/// non-blank prefix line (the model echoed a line the user already has).
fn repeats_line_above(completion: &str, prefix: &str) -> bool {
	let Some(line_above) = prefix.lines().rev().find(|line| !line.trim().is_empty()) else {
		return false;
	};
	let Some(first_line) = completion.lines().find(|line| !line.trim().is_empty()) else {
		return false;
	};

	line_is_repeated(line_above, first_line)
}

/// Detects a model stuck in a loop, emitting a near-identical line every
/// `period` lines. The shared run between line 0 and line `period` serves as
/// the repetition witness, so slowly drifting loops are caught too, not just
/// exact copy-paste loops.
fn is_extreme_repetition(completion: &str) -> bool {
	let lines: Vec<&str> = completion.split('\n').collect();
	if lines.len() < MIN_LINES_FOR_REPETITION_CHECK {
		return false;
	}

	for period in 1..MAX_REPETITION_PERIOD {
		let witness = longest_common_run(lines[0], lines[period]);
		let witness_len = witness.chars().count();
		let first_len = lines[0].chars().count();

		if witness_len > 5 || witness_len * 2 > first_len {
			let match_count = lines.iter().step_by(period).filter(|line| line.contains(&witness)).count();

			let covered = match_count * period;
			if covered > 8 || (covered as f64) / (lines.len() as f64) > 0.8 {
				return true;
			}
		}
	}

	false
}

// endregion: --- Support

// region:    --- Tests


// endregion: --- Tests
