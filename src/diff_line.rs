use derive_more::Display;

/// Classification of a single line in a streamed diff.
///
/// `Same` lines belong to both sides, `Old` lines only to the reference
/// content, `New` lines only to the candidate content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DiffType {
	#[display("same")]
	Same,
	#[display("old")]
	Old,
	#[display("new")]
	New,
}

impl DiffType {
	/// The unified-diff style line prefix (`' '`, `'-'`, `'+'`).
	pub fn symbol(&self) -> char {
		match self {
			DiffType::Same => ' ',
			DiffType::Old => '-',
			DiffType::New => '+',
		}
	}
}

/// One classified line of diff output.
///
/// Emission order is the only observable structure; once emitted, a
/// `DiffLine` is never revised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
	pub kind: DiffType,
	pub line: String,
}

impl DiffLine {
	pub fn same(line: impl Into<String>) -> Self {
		Self {
			kind: DiffType::Same,
			line: line.into(),
		}
	}

	pub fn old(line: impl Into<String>) -> Self {
		Self {
			kind: DiffType::Old,
			line: line.into(),
		}
	}

	pub fn new(line: impl Into<String>) -> Self {
		Self {
			kind: DiffType::New,
			line: line.into(),
		}
	}
}

// region:    --- Display

impl std::fmt::Display for DiffLine {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} {}", self.kind.symbol(), self.line)
	}
}

// endregion: --- Display
