use std::error::Error;
use std::fmt;

/// Alias for `Result<T, PageError>`
pub type Result<T> = std::result::Result<T, PageError>;

/// Errors that can occur while reading page headers and segment tables
#[derive(Debug)]
pub enum PageError {
	/// The reader contains a page with a nonzero version
	InvalidVersion(u8),
	/// The reader contains a page without a magic signature (OggS)
	MissingMagic,
	/// The page's header type flag is not a valid combination
	///
	/// A page can't both begin a stream and continue a packet, and only the lower 3 bits are defined.
	BadHeaderType(u8),
	/// Too much data was provided for a single page
	TooMuchData,
	/// Any std::io::Error
	Io(std::io::Error),
}

impl fmt::Display for PageError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PageError::InvalidVersion(version) => write!(
				f,
				"Invalid stream structure version {version} (Should always be 0)"
			),
			PageError::MissingMagic => write!(f, "Page is missing a magic signature"),
			PageError::BadHeaderType(flags) => {
				write!(f, "Page has an invalid header type flag (0x{flags:02X})")
			},
			PageError::TooMuchData => write!(f, "Too much data was provided"),
			PageError::Io(err) => write!(f, "{err}"),
		}
	}
}

impl Error for PageError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match *self {
			PageError::Io(ref e) => Some(e),
			_ => None,
		}
	}
}

impl From<std::io::Error> for PageError {
	fn from(err: std::io::Error) -> PageError {
		PageError::Io(err)
	}
}
