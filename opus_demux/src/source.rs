//! The byte sources a reader can pull pages from
//!
//! A [`PageSource`] only knows how to read page headers and how to gather page content into
//! packets. All validation and packet reassembly happens in [`OpusReader`](crate::reader::OpusReader),
//! so every source behaves identically.
//!
//! Two sources are provided:
//!
//! * [`MappedSource`](crate::mapped::MappedSource), borrowing packets from a buffer holding the entire stream
//! * [`StreamedSource`](crate::streamed::StreamedSource), copying packets out of a [`Read`](std::io::Read)er

use crate::error::Result;

use ogg_pager::PageHeader;

/// A source of OGG pages
pub trait PageSource {
	/// A packet that is still being assembled
	type Fragment;
	/// A complete packet
	type Packet: Clone + AsRef<[u8]>;

	/// Read the next page header and its segment table
	///
	/// This returns `None` if the source is exhausted exactly at a page boundary.
	///
	/// # Errors
	///
	/// * The source ends partway through the header
	/// * The header is invalid, see [`PageHeader::read`]
	fn next_header(&mut self) -> Result<Option<PageHeader>>;

	/// Read the next `len` bytes of page content, appending them to `fragment`
	///
	/// If `fragment` is `None`, a new packet is started.
	///
	/// # Errors
	///
	/// * The source has less than `len` bytes remaining
	/// * Unable to allocate room for the packet
	fn append(&mut self, fragment: Option<Self::Fragment>, len: usize) -> Result<Self::Fragment>;

	/// Finish a packet, no more content will be appended to it
	fn finish(&mut self, fragment: Self::Fragment) -> Self::Packet;

	/// The number of bytes consumed from the source so far
	fn position(&self) -> u64;

	/// Release the underlying bytes or reader
	///
	/// Called once the reader is disposed. No more pages will be requested afterwards.
	fn release(&mut self);
}
