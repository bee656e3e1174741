//! Demuxing a stream read incrementally
//!
//! Page content is copied out of the reader into buffers taken from a [`BufferPool`]. Once every
//! copy of an [`OpusPacket`] is dropped (and the reader no longer holds it), its buffer goes back
//! to the pool.
//!
//! # Examples
//!
//! ```rust,no_run
//! use opus_demux::config::ParseOptions;
//! use opus_demux::pool::BufferPool;
//! use opus_demux::streamed::OpusStreamedFile;
//!
//! # fn main() -> opus_demux::error::Result<()> {
//! let pool = BufferPool::new();
//!
//! let file = std::fs::File::open("test.opus")?;
//! let mut reader = OpusStreamedFile::with_options(file, ParseOptions::new(), pool.clone());
//!
//! reader.preload(None)?;
//! println!("{} packets in {} buffers", reader.materialized(), pool.outstanding());
//!
//! reader.dispose();
//! assert_eq!(pool.outstanding(), 0);
//! # Ok(()) }
//! ```

use crate::config::ParseOptions;
use crate::error::Result;
use crate::macros::err;
use crate::pool::{BufferPool, PooledBuffer};
use crate::reader::OpusReader;
use crate::source::PageSource;

use std::fmt::{Debug, Formatter};
use std::fs::File;
use std::io::{BufReader, Read};
use std::ops::Deref;
use std::path::Path;
use std::rc::Rc;

use ogg_pager::PageHeader;

const FILE_BUFFER_SIZE: usize = 64 * 1024;

/// A reader over a [`Read`]er
pub type OpusStreamedFile<R> = OpusReader<StreamedSource<R>>;

impl<R: Read> OpusReader<StreamedSource<R>> {
	/// Create a reader over `reader`, with the default [`ParseOptions`] and a new [`BufferPool`]
	///
	/// NOTE: Page headers are read in small chunks, it is best to wrap `reader` in a [`BufReader`].
	pub fn new(reader: R) -> Self {
		Self::with_options(reader, ParseOptions::new(), BufferPool::new())
	}

	/// Create a reader over `reader`, taking packet buffers from `pool`
	pub fn with_options(reader: R, parse_options: ParseOptions, pool: BufferPool) -> Self {
		OpusReader::from_source(StreamedSource::new(reader, pool), parse_options)
	}

	/// The pool packet buffers are taken from
	pub fn pool(&self) -> &BufferPool {
		&self.source.pool
	}
}

impl OpusReader<StreamedSource<BufReader<File>>> {
	/// Open the file at `path` for streaming
	///
	/// # Errors
	///
	/// The file could not be opened
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let file = File::open(path)?;
		Ok(Self::new(BufReader::with_capacity(FILE_BUFFER_SIZE, file)))
	}
}

/// A [`PageSource`] copying out of a [`Read`]er
pub struct StreamedSource<R> {
	// `None` once released
	reader: Option<R>,
	pool: BufferPool,
	position: u64,
}

impl<R: Read> StreamedSource<R> {
	/// Create a source starting at the current position of `reader`
	pub fn new(reader: R, pool: BufferPool) -> Self {
		Self {
			reader: Some(reader),
			pool,
			position: 0,
		}
	}

	/// Consume the source, returning the inner reader
	///
	/// This returns `None` if the source was released.
	pub fn into_inner(self) -> Option<R> {
		self.reader
	}

	fn reader(&mut self) -> Result<&mut R> {
		match self.reader {
			Some(ref mut reader) => Ok(reader),
			None => err!(Disposed),
		}
	}
}

impl<R: Read> PageSource for StreamedSource<R> {
	type Fragment = PooledBuffer;
	type Packet = OpusPacket;

	fn next_header(&mut self) -> Result<Option<PageHeader>> {
		let header = PageHeader::read_next(self.reader()?)?;
		if let Some(ref header) = header {
			self.position += (header.page_size() - header.content_size()) as u64;
		}

		Ok(header)
	}

	fn append(&mut self, fragment: Option<Self::Fragment>, len: usize) -> Result<Self::Fragment> {
		let reader = match self.reader {
			Some(ref mut reader) => reader,
			None => err!(Disposed),
		};

		let mut buffer = match fragment {
			Some(buffer) => buffer,
			None => self.pool.acquire(len)?,
		};

		reader.read_exact(buffer.extend_zeroed(len)?)?;
		self.position += len as u64;

		Ok(buffer)
	}

	fn finish(&mut self, fragment: Self::Fragment) -> Self::Packet {
		OpusPacket {
			buffer: Rc::new(fragment),
		}
	}

	fn position(&self) -> u64 {
		self.position
	}

	fn release(&mut self) {
		self.reader = None;
	}
}

impl<R> Debug for StreamedSource<R> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("StreamedSource")
			.field("pool", &self.pool)
			.field("position", &self.position)
			.field("released", &self.reader.is_none())
			.finish_non_exhaustive()
	}
}

/// A packet read by an [`OpusStreamedFile`]
///
/// Packets are cheap to clone, all clones share the same buffer.
#[derive(Clone)]
pub struct OpusPacket {
	buffer: Rc<PooledBuffer>,
}

impl Deref for OpusPacket {
	type Target = [u8];

	fn deref(&self) -> &Self::Target {
		&self.buffer
	}
}

impl AsRef<[u8]> for OpusPacket {
	fn as_ref(&self) -> &[u8] {
		&self.buffer
	}
}

impl PartialEq<[u8]> for OpusPacket {
	fn eq(&self, other: &[u8]) -> bool {
		**self == *other
	}
}

impl Debug for OpusPacket {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("OpusPacket").field(&&**self).finish()
	}
}
