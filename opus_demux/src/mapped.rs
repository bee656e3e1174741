//! Demuxing a stream held entirely in memory
//!
//! Packets borrow directly from the buffer, and are only copied when they span multiple pages.
//!
//! NOTE: Packets spanning pages are owned by the reader, and [`OpusReader::packet`] clones them,
//!       copying the whole packet on every call. Keep the returned packet around rather than
//!       requesting it again.
//!
//! # Examples
//!
//! ```rust,no_run
//! use opus_demux::mapped::{OpusMappedFile, map_file};
//!
//! # fn main() -> opus_demux::error::Result<()> {
//! let map = map_file("test.opus")?;
//! let mut file = OpusMappedFile::new(&map);
//!
//! println!("Channels: {}", file.channel_count()?);
//!
//! for packet in &mut file {
//! 	let packet = packet?;
//! 	println!("Packet: {} bytes", packet.len());
//! }
//! # Ok(()) }
//! ```

use crate::config::ParseOptions;
use crate::error::Result;
use crate::reader::OpusReader;
use crate::source::PageSource;

use std::borrow::Cow;
use std::fs::File;
use std::io;
use std::path::Path;

use memmap2::Mmap;
use ogg_pager::PageHeader;

/// A reader over an in-memory stream
pub type OpusMappedFile<'a> = OpusReader<MappedSource<'a>>;

impl<'a> OpusReader<MappedSource<'a>> {
	/// Create a reader over `data`, with the default [`ParseOptions`]
	pub fn new(data: &'a [u8]) -> Self {
		Self::with_options(data, ParseOptions::new())
	}

	/// Create a reader over `data`
	pub fn with_options(data: &'a [u8], parse_options: ParseOptions) -> Self {
		OpusReader::from_source(MappedSource::new(data), parse_options)
	}
}

/// Map an entire file into memory
///
/// The file must not be modified while the map is in use.
///
/// # Errors
///
/// The file could not be opened or mapped
pub fn map_file(path: impl AsRef<Path>) -> Result<Mmap> {
	let file = File::open(path)?;

	// SAFETY: The map is read only. Modifying the file while it is mapped is undefined behavior,
	//         which is documented above.
	let map = unsafe { Mmap::map(&file)? };

	log::debug!("Mapped {} bytes", map.len());
	Ok(map)
}

/// A [`PageSource`] borrowing from a byte slice
#[derive(Debug, Clone)]
pub struct MappedSource<'a> {
	data: &'a [u8],
	cursor: usize,
}

impl<'a> MappedSource<'a> {
	/// Create a source starting at the beginning of `data`
	pub fn new(data: &'a [u8]) -> Self {
		Self { data, cursor: 0 }
	}

	/// The bytes that have yet to be read
	pub fn remaining(&self) -> &'a [u8] {
		&self.data[self.cursor..]
	}
}

impl<'a> PageSource for MappedSource<'a> {
	type Fragment = Cow<'a, [u8]>;
	type Packet = Cow<'a, [u8]>;

	fn next_header(&mut self) -> Result<Option<PageHeader>> {
		let mut remaining = self.remaining();

		let header = PageHeader::read_next(&mut remaining)?;
		self.cursor = self.data.len() - remaining.len();

		Ok(header)
	}

	fn append(&mut self, fragment: Option<Self::Fragment>, len: usize) -> Result<Self::Fragment> {
		let remaining = self.remaining();
		if remaining.len() < len {
			let err = io::Error::new(
				io::ErrorKind::UnexpectedEof,
				"Page content extends past the end of the data",
			);
			return Err(err.into());
		}

		let content = &remaining[..len];
		self.cursor += len;

		match fragment {
			None => Ok(Cow::Borrowed(content)),
			Some(mut fragment) => {
				let owned = fragment.to_mut();
				owned.try_reserve(len)?;
				owned.extend_from_slice(content);

				Ok(fragment)
			},
		}
	}

	fn finish(&mut self, fragment: Self::Fragment) -> Self::Packet {
		fragment
	}

	fn position(&self) -> u64 {
		self.cursor as u64
	}

	fn release(&mut self) {
		self.data = &[];
		self.cursor = 0;
	}
}
