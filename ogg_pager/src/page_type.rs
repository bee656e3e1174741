use crate::error::{PageError, Result};

/// The first packet on this page is a continuation of the previous packet in the logical bitstream
pub const CONTINUED_PACKET: u8 = 0x01;
/// The page is the first page of the logical bitstream
pub const CONTAINS_FIRST_PAGE_OF_BITSTREAM: u8 = 0x02;
/// The page is the last page of the logical bitstream
pub const CONTAINS_LAST_PAGE_OF_BITSTREAM: u8 = 0x04;

/// The role a page plays in its logical bitstream
///
/// This is decoded once from the header type flag, so that callers can `match` on the valid combinations
/// rather than test individual bits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PageType {
	/// The page begins with a fresh packet
	Fresh,
	/// The first packet on the page continues a packet from the previous page
	Continuation,
	/// The first page of the logical bitstream
	BeginningOfStream,
	/// The last page of the logical bitstream, beginning with a fresh packet
	EndOfStream,
	/// The last page of the logical bitstream, continuing a packet from the previous page
	ContinuedEndOfStream,
	/// A logical bitstream that consists of this page alone
	Complete,
}

impl PageType {
	/// Decode a header type flag
	///
	/// # Errors
	///
	/// * Any bits outside of the lower 3 are set
	/// * The beginning of stream and continuation bits are both set, as a stream's first page has no
	///   previous page to continue
	///
	/// # Examples
	///
	/// ```rust
	/// use ogg_pager::PageType;
	///
	/// # fn main() -> ogg_pager::Result<()> {
	/// assert_eq!(PageType::from_flags(0x02)?, PageType::BeginningOfStream);
	/// assert_eq!(PageType::from_flags(0x05)?, PageType::ContinuedEndOfStream);
	/// assert!(PageType::from_flags(0x03).is_err());
	/// # Ok(()) }
	/// ```
	pub fn from_flags(flags: u8) -> Result<Self> {
		match flags {
			0 => Ok(Self::Fresh),
			CONTINUED_PACKET => Ok(Self::Continuation),
			CONTAINS_FIRST_PAGE_OF_BITSTREAM => Ok(Self::BeginningOfStream),
			CONTAINS_LAST_PAGE_OF_BITSTREAM => Ok(Self::EndOfStream),
			0x05 => Ok(Self::ContinuedEndOfStream),
			0x06 => Ok(Self::Complete),
			_ => Err(PageError::BadHeaderType(flags)),
		}
	}

	/// The header type flag for this page type
	pub fn flags(self) -> u8 {
		match self {
			Self::Fresh => 0,
			Self::Continuation => CONTINUED_PACKET,
			Self::BeginningOfStream => CONTAINS_FIRST_PAGE_OF_BITSTREAM,
			Self::EndOfStream => CONTAINS_LAST_PAGE_OF_BITSTREAM,
			Self::ContinuedEndOfStream => CONTINUED_PACKET | CONTAINS_LAST_PAGE_OF_BITSTREAM,
			Self::Complete => CONTAINS_FIRST_PAGE_OF_BITSTREAM | CONTAINS_LAST_PAGE_OF_BITSTREAM,
		}
	}

	/// Whether the page's first packet continues one from the previous page
	pub fn is_continuation(self) -> bool {
		matches!(self, Self::Continuation | Self::ContinuedEndOfStream)
	}

	/// Whether the page begins the logical bitstream
	pub fn is_bos(self) -> bool {
		matches!(self, Self::BeginningOfStream | Self::Complete)
	}

	/// Whether the page ends the logical bitstream
	pub fn is_eos(self) -> bool {
		matches!(
			self,
			Self::EndOfStream | Self::ContinuedEndOfStream | Self::Complete
		)
	}
}
