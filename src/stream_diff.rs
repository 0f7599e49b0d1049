use crate::DiffLine;
use futures::{Stream, StreamExt};
use std::collections::VecDeque;
use tracing::trace;

/// Maximum number of candidate lines buffered while searching for a new-side
/// anchor. The old side is fully materialized so its scan is unbounded; the
/// new side is a live stream, so lookahead past this window gives up and
/// falls back to a paired substitution.
const MAX_NEW_LOOKAHEAD: usize = 8;

/// Computes an online line diff between `old_lines` (fully known) and
/// `new_lines` (a lazily produced stream, possibly unbounded).
///
/// Emits `same`/`old`/`new` classified lines as soon as each classification
/// is certain; an emitted line is never revised. The only suspension point is
/// pulling the next candidate line, and every already-committed line is
/// yielded before the next pull, so a consumer rendering incrementally sees
/// results as early as soundness allows.
///
/// Matching is greedy nearest-anchor with asymmetric lookahead:
/// - Equal fronts emit `same`.
/// - On mismatch, the first anchor found on either side resolves the region;
///   when both sides find one, the smaller skip wins, and ties go to the old
///   side (a one-line modification renders as `old` then `new`).
/// - With no anchor in reach, the mismatch is a paired substitution: one
///   `old` line immediately followed by one `new` line.
///
/// Never fails: empty `old_lines`, an immediately-ending candidate source,
/// and a source that never ends are all well-defined.
pub fn diff_lines<S>(old_lines: Vec<String>, new_lines: S) -> impl Stream<Item = DiffLine>
where
	S: Stream<Item = String> + Unpin,
{
	let differ = StreamDiffer::new(old_lines, new_lines);
	futures::stream::unfold(differ, |mut differ| async move {
		differ.next_line().await.map(|line| (line, differ))
	})
}

/// Convenience for callers with both sides fully materialized.
pub fn diff_all(old_lines: Vec<String>, new_lines: Vec<String>) -> Vec<DiffLine> {
	let stream = diff_lines(old_lines, futures::stream::iter(new_lines));
	futures::executor::block_on(stream.collect())
}

// region:    --- StreamDiffer

struct StreamDiffer<S> {
	old_lines: Vec<String>,
	old_idx: usize,
	source: S,
	new_buffer: VecDeque<String>,
	new_exhausted: bool,
	/// Lines already classified during mismatch resolution, drained before
	/// the source is polled again.
	pending: VecDeque<DiffLine>,
}

impl<S> StreamDiffer<S>
where
	S: Stream<Item = String> + Unpin,
{
	fn new(old_lines: Vec<String>, source: S) -> Self {
		Self {
			old_lines,
			old_idx: 0,
			source,
			new_buffer: VecDeque::new(),
			new_exhausted: false,
			pending: VecDeque::new(),
		}
	}

	async fn next_line(&mut self) -> Option<DiffLine> {
		loop {
			if let Some(line) = self.pending.pop_front() {
				return Some(line);
			}

			if self.new_buffer.is_empty() && !self.new_exhausted {
				self.pull_one().await;
			}

			// -- Candidate source exhausted: flush remaining old lines
			if self.new_buffer.is_empty() {
				if self.old_idx < self.old_lines.len() {
					let line = self.old_lines[self.old_idx].clone();
					self.old_idx += 1;
					return Some(DiffLine::old(line));
				}
				return None;
			}

			// -- Old side exhausted: everything buffered or future is new
			if self.old_idx >= self.old_lines.len() {
				if let Some(line) = self.new_buffer.pop_front() {
					return Some(DiffLine::new(line));
				}
				continue;
			}

			// -- Both sides have a front line
			if self.old_lines[self.old_idx] == self.new_buffer[0] {
				self.old_idx += 1;
				if let Some(line) = self.new_buffer.pop_front() {
					return Some(DiffLine::same(line));
				}
			} else {
				self.resolve_mismatch().await;
			}
		}
	}

	/// Pulls one candidate line into the buffer. Returns false once the
	/// source is exhausted. This is the engine's only suspension point.
	async fn pull_one(&mut self) -> bool {
		match self.source.next().await {
			Some(line) => {
				self.new_buffer.push_back(line);
				true
			}
			None => {
				self.new_exhausted = true;
				false
			}
		}
	}

	/// Resolves a front mismatch by searching both sides for an anchor and
	/// queueing the classified skipped lines onto `pending`.
	async fn resolve_mismatch(&mut self) {
		let old_front = self.old_lines[self.old_idx].clone();
		let new_front = self.new_buffer[0].clone();

		// -- Old-side search (unbounded, old is fully materialized)
		let d_old = self.old_lines[self.old_idx..].iter().position(|line| *line == new_front);

		// -- New-side search (bounded lookahead over the live stream)
		let mut d_new = self
			.new_buffer
			.iter()
			.skip(1)
			.position(|line| *line == old_front)
			.map(|pos| pos + 1);

		// A new-side anchor only wins below the old-side skip distance (ties
		// go to the old side), so never pull further than that.
		let pull_cap = d_old.unwrap_or(MAX_NEW_LOOKAHEAD).min(MAX_NEW_LOOKAHEAD);
		while d_new.is_none() && !self.new_exhausted && self.new_buffer.len() < pull_cap {
			if !self.pull_one().await {
				break;
			}
			if self.new_buffer.back() == Some(&old_front) {
				d_new = Some(self.new_buffer.len() - 1);
			}
		}

		trace!(d_old, d_new, old_idx = self.old_idx, "stream_diff mismatch resolution");

		// -- Resolution (smaller skip wins, ties favor the old side)
		match (d_old, d_new) {
			(Some(d_o), Some(d_n)) if d_o <= d_n => self.skip_old(d_o),
			(Some(d_o), None) => self.skip_old(d_o),
			(_, Some(d_n)) => self.skip_new(d_n),
			(None, None) => {
				// Paired substitution
				self.old_idx += 1;
				self.pending.push_back(DiffLine::old(old_front));
				if let Some(line) = self.new_buffer.pop_front() {
					self.pending.push_back(DiffLine::new(line));
				}
			}
		}
	}

	fn skip_old(&mut self, count: usize) {
		for _ in 0..count {
			let line = self.old_lines[self.old_idx].clone();
			self.old_idx += 1;
			self.pending.push_back(DiffLine::old(line));
		}
	}

	fn skip_new(&mut self, count: usize) {
		for _ in 0..count {
			if let Some(line) = self.new_buffer.pop_front() {
				self.pending.push_back(DiffLine::new(line));
			}
		}
	}
}

// endregion: --- StreamDiffer

// region:    --- Tests


// endregion: --- Tests
