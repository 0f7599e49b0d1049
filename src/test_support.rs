//! Support utilities for tests and demos (behind the `test-support` feature).

use futures::Stream;

/// Builds an owned line vector from string slices.
pub fn to_lines(lines: &[&str]) -> Vec<String> {
	lines.iter().map(|s| s.to_string()).collect()
}

/// Builds a line stream from string slices, standing in for a model response
/// arriving line by line.
pub fn lines_stream(lines: &[&str]) -> impl Stream<Item = String> + Unpin {
	futures::stream::iter(to_lines(lines))
}
