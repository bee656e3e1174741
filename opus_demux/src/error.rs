//! Contains the errors that can arise while demuxing
//!
//! The primary error is [`DemuxError`]. The type of error is determined by [`ErrorKind`],
//! which can be extended at any time.
//!
//! Every error is fatal to the reader that produced it. Once a reader has returned an error, all
//! further calls will return [`ErrorKind::Failed`] (or [`ErrorKind::Disposed`] after
//! disposal), it will never attempt to resynchronize.

use std::collections::TryReserveError;
use std::fmt::{Debug, Display, Formatter};

use ogg_pager::PageError;

/// Alias for `Result<T, DemuxError>`
pub type Result<T> = std::result::Result<T, DemuxError>;

/// The types of errors that can occur
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
	// Container related errors
	/// Errors that arise while parsing OGG pages
	OggPage(PageError),
	/// The pages of the stream arrived in an invalid order or with invalid flags
	StreamState(StreamError),

	// Opus header related errors
	/// Errors that arise while decoding the identification or comment header
	OpusHeader(HeaderError),
	/// The identification header has a version other than 1
	UnsupportedVersion(u8),
	/// The identification header has a channel mapping family other than 0 (single stream)
	UnsupportedMappingFamily(u8),
	/// The identification header has a channel count that is invalid for its mapping family
	InvalidChannelCount(u8),
	/// The comment header was written by an unsupported encoder
	UnsupportedVendor(String),

	// Data related errors
	/// Attempting to read an abnormally large amount of data
	///
	/// See [`ParseOptions::allocation_limit`](crate::config::ParseOptions::allocation_limit).
	TooMuchData,
	/// Expected the data to be a different size than provided
	///
	/// This occurs when the size of an item is written as one value, but that size is either too
	/// big or small to be valid within the bounds of that item.
	SizeMismatch,

	// Reader state
	/// The reader was used after being disposed
	Disposed,
	/// The reader previously encountered an error, and can no longer be used
	Failed,

	// Conversions for external errors
	/// Unable to convert bytes to a String
	StringFromUtf8(std::string::FromUtf8Error),
	/// Represents all cases of [`std::io::Error`].
	Io(std::io::Error),
	/// Failure to allocate enough memory
	Alloc(TryReserveError),
}

/// Violations of the page flow of a logical bitstream
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StreamError {
	/// A page's sequence number didn't follow the previous page's
	BadSequenceNumber {
		/// The sequence number that should have been encountered
		expected: u32,
		/// The sequence number that was encountered
		found: u32,
	},
	/// The first page isn't marked as the beginning of the stream
	MissingBeginningOfStream,
	/// A page other than the first is marked as the beginning of the stream
	UnexpectedBeginningOfStream,
	/// A page belongs to a different logical bitstream than the first
	UnexpectedSerial(u32),
	/// A page is marked as a continuation, but no packet was left unfinished
	UnexpectedContinuation,
	/// A packet was left unfinished, but the next page isn't marked as a continuation
	MissingContinuation,
	/// The stream ended before the headers were complete
	EarlyEndOfStream,
	/// The stream ended in the middle of a packet
	TruncatedPacket,
}

impl Display for StreamError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::BadSequenceNumber { expected, found } => write!(
				f,
				"Expected page sequence number {expected}, found {found}"
			),
			Self::MissingBeginningOfStream => write!(f, "Expected beginning of stream"),
			Self::UnexpectedBeginningOfStream => {
				write!(f, "Encountered a second beginning of stream")
			},
			Self::UnexpectedSerial(serial) => write!(
				f,
				"Encountered a page from another logical bitstream (serial {serial})"
			),
			Self::UnexpectedContinuation => {
				write!(f, "Page continues a packet, but no packet is unfinished")
			},
			Self::MissingContinuation => write!(
				f,
				"Packet is unfinished, but the next page is not a continuation"
			),
			Self::EarlyEndOfStream => write!(f, "End of stream earlier than expected"),
			Self::TruncatedPacket => write!(f, "Stream ended in the middle of a packet"),
		}
	}
}

/// An error that arises while decoding an Opus header packet
pub struct HeaderError {
	description: &'static str,
}

impl HeaderError {
	/// Create a `HeaderError` from a description
	#[must_use]
	pub const fn new(description: &'static str) -> Self {
		Self { description }
	}

	/// Returns the error description
	pub fn description(&self) -> &str {
		self.description
	}
}

impl Debug for HeaderError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "Opus: {:?}", self.description)
	}
}

impl Display for HeaderError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "Opus: {}", self.description)
	}
}

/// Errors that could occur while demuxing
pub struct DemuxError {
	pub(crate) kind: ErrorKind,
}

impl DemuxError {
	/// Create a `DemuxError` from an [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use opus_demux::error::{DemuxError, ErrorKind};
	///
	/// let disposed = DemuxError::new(ErrorKind::Disposed);
	/// ```
	#[must_use]
	pub const fn new(kind: ErrorKind) -> Self {
		Self { kind }
	}

	/// Returns the [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use opus_demux::error::{DemuxError, ErrorKind};
	///
	/// let disposed = DemuxError::new(ErrorKind::Disposed);
	/// if let ErrorKind::Disposed = disposed.kind() {
	/// 	println!("The reader is gone!");
	/// }
	/// ```
	pub fn kind(&self) -> &ErrorKind {
		&self.kind
	}
}

impl std::error::Error for DemuxError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self.kind {
			ErrorKind::OggPage(ref err) => Some(err),
			ErrorKind::StringFromUtf8(ref err) => Some(err),
			ErrorKind::Io(ref err) => Some(err),
			ErrorKind::Alloc(ref err) => Some(err),
			_ => None,
		}
	}
}

impl Debug for DemuxError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}", self.kind)
	}
}

impl From<HeaderError> for DemuxError {
	fn from(input: HeaderError) -> Self {
		Self {
			kind: ErrorKind::OpusHeader(input),
		}
	}
}

impl From<StreamError> for DemuxError {
	fn from(input: StreamError) -> Self {
		Self {
			kind: ErrorKind::StreamState(input),
		}
	}
}

impl From<PageError> for DemuxError {
	fn from(input: PageError) -> Self {
		match input {
			// Keep I/O errors in one place, regardless of where they came from
			PageError::Io(err) => Self {
				kind: ErrorKind::Io(err),
			},
			_ => Self {
				kind: ErrorKind::OggPage(input),
			},
		}
	}
}

impl From<std::io::Error> for DemuxError {
	fn from(input: std::io::Error) -> Self {
		Self {
			kind: ErrorKind::Io(input),
		}
	}
}

impl From<std::string::FromUtf8Error> for DemuxError {
	fn from(input: std::string::FromUtf8Error) -> Self {
		Self {
			kind: ErrorKind::StringFromUtf8(input),
		}
	}
}

impl From<TryReserveError> for DemuxError {
	fn from(input: TryReserveError) -> Self {
		Self {
			kind: ErrorKind::Alloc(input),
		}
	}
}

impl Display for DemuxError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.kind {
			// Conversions
			ErrorKind::OggPage(ref err) => write!(f, "{err}"),
			ErrorKind::StringFromUtf8(ref err) => write!(f, "{err}"),
			ErrorKind::Io(ref err) => write!(f, "{err}"),
			ErrorKind::Alloc(ref err) => write!(f, "{err}"),

			ErrorKind::StreamState(ref err) => write!(f, "OGG: {err}"),
			ErrorKind::OpusHeader(ref err) => write!(f, "{err}"),
			ErrorKind::UnsupportedVersion(version) => write!(
				f,
				"Opus: Only version 1 is supported, found version {version}"
			),
			ErrorKind::UnsupportedMappingFamily(family) => write!(
				f,
				"Opus: Channel mapping family {family} is not supported (multistream)"
			),
			ErrorKind::InvalidChannelCount(channels) => write!(
				f,
				"Opus: Invalid channel count {channels} for the channel mapping family"
			),
			ErrorKind::UnsupportedVendor(ref vendor) => {
				write!(f, "Opus: Support for \"{vendor}\" is not implemented")
			},

			ErrorKind::TooMuchData => write!(
				f,
				"Attempted to read an abnormally large amount of data"
			),
			ErrorKind::SizeMismatch => write!(
				f,
				"Encountered an invalid item size, either too big or too small to be valid"
			),

			ErrorKind::Disposed => write!(f, "The reader has been disposed"),
			ErrorKind::Failed => write!(
				f,
				"The reader previously encountered an error and can no longer be used"
			),
		}
	}
}
