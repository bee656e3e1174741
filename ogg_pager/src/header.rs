use crate::error::{PageError, Result};
use crate::lacing::{Lacing, lace};
use crate::page_type::PageType;

use std::io::{ErrorKind, Read};

use byteorder::{LittleEndian, ReadBytesExt};

/// The size of the fixed portion of a page header, not including the segment table
pub const PAGE_HEADER_SIZE: usize = 27;

const MAGIC: &[u8; 4] = b"OggS";

/// An OGG page header, including its segment table
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PageHeader {
	pub(crate) page_type: PageType,
	/// The page's absolute granule position
	pub abgp: u64,
	/// The page's stream serial number
	pub stream_serial: u32,
	/// The page's sequence number
	pub sequence_number: u32,
	pub(crate) checksum: u32,
	pub(crate) segments: Vec<u8>,
}

impl PageHeader {
	/// Read a page header and its segment table
	///
	/// The magic signature and version are verified before anything else is read.
	///
	/// NOTE: The checksum is read as is, it is **not** verified.
	///
	/// # Errors
	///
	/// * [`std::io::Error`], including running out of data mid-header
	/// * [`PageError::MissingMagic`]
	/// * [`PageError::InvalidVersion`]
	/// * [`PageError::BadHeaderType`]
	pub fn read<R>(data: &mut R) -> Result<Self>
	where
		R: Read,
	{
		let mut sig = [0; 4];
		data.read_exact(&mut sig)?;

		Self::read_after_magic(data, sig)
	}

	/// Read a page header, returning `None` if the reader is exhausted before the first byte
	///
	/// This distinguishes a stream that ends cleanly on a page boundary from one that was cut off
	/// partway through a page, which is still an error.
	///
	/// # Errors
	///
	/// See [`PageHeader::read`]
	pub fn read_next<R>(data: &mut R) -> Result<Option<Self>>
	where
		R: Read,
	{
		let mut sig = [0; 4];
		let mut filled = 0;
		while filled < sig.len() {
			match data.read(&mut sig[filled..]) {
				Ok(0) if filled == 0 => return Ok(None),
				Ok(0) => return Err(std::io::Error::from(ErrorKind::UnexpectedEof).into()),
				Ok(n) => filled += n,
				Err(e) if e.kind() == ErrorKind::Interrupted => continue,
				Err(e) => return Err(e.into()),
			}
		}

		Self::read_after_magic(data, sig).map(Some)
	}

	fn read_after_magic<R>(data: &mut R, sig: [u8; 4]) -> Result<Self>
	where
		R: Read,
	{
		if &sig != MAGIC {
			return Err(PageError::MissingMagic);
		}

		// Version, always 0
		let version = data.read_u8()?;
		if version != 0 {
			return Err(PageError::InvalidVersion(version));
		}

		let page_type = PageType::from_flags(data.read_u8()?)?;

		let abgp = data.read_u64::<LittleEndian>()?;
		let stream_serial = data.read_u32::<LittleEndian>()?;
		let sequence_number = data.read_u32::<LittleEndian>()?;
		let checksum = data.read_u32::<LittleEndian>()?;

		// A page may have no segments at all, which is common for a trailing EOS page
		let segment_count = data.read_u8()?;

		let mut segments = vec![0; usize::from(segment_count)];
		data.read_exact(&mut segments)?;

		Ok(Self {
			page_type,
			abgp,
			stream_serial,
			sequence_number,
			checksum,
			segments,
		})
	}

	/// Returns the page's type
	pub fn page_type(&self) -> PageType {
		self.page_type
	}

	/// Returns the page's checksum
	///
	/// This is the value as stored, it is never verified.
	pub fn checksum(&self) -> u32 {
		self.checksum
	}

	/// Returns the page's segment table
	pub fn segments(&self) -> &[u8] {
		self.segments.as_slice()
	}

	/// Returns the number of entries in the segment table
	pub fn segment_count(&self) -> usize {
		self.segments.len()
	}

	/// Returns the segment table entry at `index`, or `None` if it is past the end of the table
	pub fn segment(&self, index: usize) -> Option<u8> {
		self.segments.get(index).copied()
	}

	/// Returns the total size of the page's content, in bytes
	pub fn content_size(&self) -> usize {
		self.segments.iter().map(|&b| usize::from(b)).sum()
	}

	/// Returns the size of the page on disk, including the header and segment table
	pub fn page_size(&self) -> usize {
		PAGE_HEADER_SIZE + self.segments.len() + self.content_size()
	}

	/// Split the page's content into packets
	///
	/// See [`lace`].
	pub fn packet_spans(&self) -> Lacing {
		lace(&self.segments)
	}
}
