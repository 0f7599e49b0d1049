//! Shared text-similarity primitives used by the postprocessor gates.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Minimum line length for the repeated-line predicate.
/// Shorter lines (e.g. `}` or `end`) legitimately repeat all over source code.
const REPEAT_MIN_LEN: usize = 5;

/// Maximum edit-distance ratio (relative to the second line) under which two
/// lines are judged repeated.
const REPEAT_MAX_DISTANCE_RATIO: f64 = 0.1;

/// Returns the longest contiguous run of characters shared by `a` and `b`.
///
/// This is the similarity witness used by the extreme-repetition heuristic:
/// the run itself is then searched for as a substring in other lines.
pub fn longest_common_run(a: &str, b: &str) -> String {
	let a_chars: Vec<char> = a.chars().collect();
	let b_chars: Vec<char> = b.chars().collect();

	if a_chars.is_empty() || b_chars.is_empty() {
		return String::new();
	}

	let mut prev_row = vec![0usize; b_chars.len() + 1];
	let mut curr_row = vec![0usize; b_chars.len() + 1];

	let mut best_len = 0;
	let mut best_end = 0; // exclusive end in a_chars

	for (i, a_ch) in a_chars.iter().enumerate() {
		for (j, b_ch) in b_chars.iter().enumerate() {
			if a_ch == b_ch {
				curr_row[j + 1] = prev_row[j] + 1;
				if curr_row[j + 1] > best_len {
					best_len = curr_row[j + 1];
					best_end = i + 1;
				}
			} else {
				curr_row[j + 1] = 0;
			}
		}
		std::mem::swap(&mut prev_row, &mut curr_row);
	}

	a_chars[best_end - best_len..best_end].iter().collect()
}

/// Levenshtein edit distance between two strings, by characters.
pub fn levenshtein(a: &str, b: &str) -> usize {
	let a_chars: Vec<char> = a.chars().collect();
	let b_chars: Vec<char> = b.chars().collect();

	if a_chars.is_empty() {
		return b_chars.len();
	}
	if b_chars.is_empty() {
		return a_chars.len();
	}

	let mut prev_row: Vec<usize> = (0..=b_chars.len()).collect();
	let mut curr_row = vec![0usize; b_chars.len() + 1];

	for (i, a_ch) in a_chars.iter().enumerate() {
		curr_row[0] = i + 1;
		for (j, b_ch) in b_chars.iter().enumerate() {
			let cost = if a_ch == b_ch { 0 } else { 1 };
			curr_row[j + 1] = (prev_row[j + 1] + 1).min(curr_row[j] + 1).min(prev_row[j] + cost);
		}
		std::mem::swap(&mut prev_row, &mut curr_row);
	}

	prev_row[b_chars.len()]
}

/// Judges whether line `a` repeats line `b` (near-equality, not exact).
///
/// Both lines are trimmed, inner whitespace runs collapsed, and lowercased
/// before comparing; the pair is repeated when the edit distance stays under
/// 10% of the normalized second line. Lines shorter than 5 characters are
/// never considered repeated.
pub fn line_is_repeated(a: &str, b: &str) -> bool {
	if a.len() < REPEAT_MIN_LEN || b.len() < REPEAT_MIN_LEN {
		return false;
	}

	let a_norm = normalize_line(a);
	let b_norm = normalize_line(b);
	if b_norm.is_empty() {
		return false;
	}

	let distance = levenshtein(&a_norm, &b_norm);
	(distance as f64) / (b_norm.len() as f64) < REPEAT_MAX_DISTANCE_RATIO
}

// region:    --- Support

fn normalize_line(line: &str) -> String {
	RE_WHITESPACE.replace_all(line.trim(), " ").to_lowercase()
}

// endregion: --- Support

// region:    --- Tests


// endregion: --- Tests
