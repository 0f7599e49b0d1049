// region:    --- Modules

mod diff_line;
mod error;
mod lcs;
mod postprocess;
mod stream_diff;

pub use diff_line::*;
pub use error::*;
pub use lcs::*;
pub use postprocess::*;
pub use stream_diff::*;

#[cfg(feature = "test-support")]
pub mod test_support;

// endregion: --- Modules
