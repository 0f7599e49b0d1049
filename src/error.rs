use derive_more::{Display, From};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Display, From)]
pub enum Error {
	#[from(String, &String, &str)]
	Custom(String),
}

// region:    --- Constructors

impl Error {
	pub fn quirks_empty_marker(family: &str) -> Self {
		Self::Custom(format!("ModelQuirks '{family}' marker cannot be empty (would match every model id)"))
	}
}

// endregion: --- Constructors

// region:    --- Error Boilerplate

impl std::error::Error for Error {}

// endregion: --- Error Boilerplate
