//! The demuxer shared by every page source
//!
//! An [`OpusReader`] is lazy. Nothing is read from its source until the headers or a packet are
//! requested, and pages are only read until the requested packet is complete.
//!
//! Once a page is found to be invalid, the reader enters a failed state and never yields another
//! packet. See [`error`](crate::error) for details.

use crate::config::ParseOptions;
use crate::error::{Result, StreamError};
use crate::header::{OpusHead, OpusTags, PacketSignature};
use crate::macros::{decode_err, err};
use crate::source::PageSource;

use std::fmt::{Debug, Formatter};
use std::iter::FusedIterator;

use ogg_pager::PageType;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
	Active,
	Failed,
	Disposed,
}

struct Headers {
	head: OpusHead,
	tags: OpusTags,
}

/// A demuxer for a single Ogg Opus logical bitstream
///
/// Readers are normally created through one of the source specific aliases:
///
/// * [`OpusMappedFile`](crate::mapped::OpusMappedFile), for a stream that is entirely in memory
/// * [`OpusStreamedFile`](crate::streamed::OpusStreamedFile), for a stream read incrementally
///
/// Packets are handed out in stream order, and are retained by the reader until it is
/// [disposed](OpusReader::dispose) (or dropped), so they can be visited any number of times.
pub struct OpusReader<S: PageSource> {
	pub(crate) source: S,
	parse_options: ParseOptions,
	state: State,
	headers: Option<Headers>,
	packets: Vec<S::Packet>,
	// The unfinished packet and its length so far
	partial: Option<(S::Fragment, usize)>,
	stream_serial: Option<u32>,
	next_sequence_number: u32,
	end_of_stream: bool,
}

impl<S: PageSource> OpusReader<S> {
	/// Create a reader over an arbitrary [`PageSource`]
	pub fn from_source(source: S, parse_options: ParseOptions) -> Self {
		Self {
			source,
			parse_options,
			state: State::Active,
			headers: None,
			packets: Vec::new(),
			partial: None,
			stream_serial: None,
			next_sequence_number: 0,
			end_of_stream: false,
		}
	}

	/// The [`ParseOptions`] the reader was created with
	pub fn parse_options(&self) -> ParseOptions {
		self.parse_options
	}

	/// The identification header
	///
	/// # Errors
	///
	/// * The reader is disposed or failed
	/// * The headers could not be read, see [`OpusReader::tags`]
	pub fn head(&mut self) -> Result<&OpusHead> {
		self.headers().map(|headers| &headers.head)
	}

	/// The channel count from the identification header
	///
	/// # Errors
	///
	/// See [`OpusReader::head`]
	pub fn channel_count(&mut self) -> Result<u8> {
		self.head().map(OpusHead::channel_count)
	}

	/// The comment header
	///
	/// The first call reads both headers, along with any audio packets that share their pages.
	///
	/// # Errors
	///
	/// * The reader is disposed or failed
	/// * The first page isn't a beginning of stream page holding a single identification header
	/// * The identification header is invalid, see [`OpusHead::parse`]
	/// * The comment header is invalid, see [`OpusTags::parse`]
	/// * The stream ends before the comment header is complete
	/// * Any of the pages are invalid
	pub fn tags(&mut self) -> Result<&OpusTags> {
		self.headers().map(|headers| &headers.tags)
	}

	/// The vendor string from the comment header
	///
	/// # Errors
	///
	/// See [`OpusReader::tags`]
	pub fn vendor(&mut self) -> Result<&str> {
		self.tags().map(OpusTags::vendor)
	}

	/// The comments following the tags in the comment header
	///
	/// # Errors
	///
	/// See [`OpusReader::tags`]
	pub fn comments(&mut self) -> Result<&[String]> {
		self.tags().map(OpusTags::comments)
	}

	/// Get the audio packet at `index`, reading pages until it is available
	///
	/// This returns `None` once the index is past the end of the stream.
	///
	/// # Errors
	///
	/// * The reader is disposed or failed
	/// * The headers could not be read, see [`OpusReader::tags`]
	/// * Any page up to and including the one completing the packet is invalid
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// use opus_demux::OpusStreamedFile;
	///
	/// # fn main() -> opus_demux::error::Result<()> {
	/// let mut file = OpusStreamedFile::open("test.opus")?;
	///
	/// if let Some(packet) = file.packet(0)? {
	/// 	println!("The first packet has {} bytes", packet.len());
	/// }
	/// # Ok(()) }
	/// ```
	pub fn packet(&mut self, index: usize) -> Result<Option<S::Packet>> {
		self.headers()?;

		let result = self.read_until(Some(index));
		self.poison(result)?;

		Ok(self.packets.get(index).cloned())
	}

	/// Read ahead until the packet at `index` is available, or until the end of the stream if `None`
	///
	/// # Errors
	///
	/// See [`OpusReader::packet`]
	pub fn preload(&mut self, index: Option<usize>) -> Result<()> {
		self.headers()?;

		let result = self.read_until(index);
		self.poison(result)
	}

	/// Iterate over the audio packets, starting from the first
	///
	/// Packets already read are yielded from memory, so this can be called any number of times.
	/// After yielding an error, the iterator ends.
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// use opus_demux::OpusStreamedFile;
	///
	/// # fn main() -> opus_demux::error::Result<()> {
	/// let mut file = OpusStreamedFile::open("test.opus")?;
	///
	/// let mut total = 0;
	/// for packet in file.packets() {
	/// 	total += packet?.len();
	/// }
	///
	/// println!("{total} bytes of audio");
	/// # Ok(()) }
	/// ```
	pub fn packets(&mut self) -> Packets<'_, S> {
		Packets {
			reader: self,
			index: 0,
			done: false,
		}
	}

	/// The number of audio packets read so far
	pub fn materialized(&self) -> usize {
		self.packets.len()
	}

	/// Whether the end of the stream has been reached
	pub fn is_complete(&self) -> bool {
		self.end_of_stream
	}

	/// Whether the reader has previously encountered an error
	pub fn is_failed(&self) -> bool {
		self.state == State::Failed
	}

	/// Whether the reader has been disposed
	pub fn is_disposed(&self) -> bool {
		self.state == State::Disposed
	}

	/// Release every packet held by the reader, along with its source
	///
	/// All further calls will return [`ErrorKind::Disposed`](crate::error::ErrorKind::Disposed).
	/// Disposing more than once does nothing.
	///
	/// Packets handed out before disposal remain valid. For streamed readers, their buffers go back
	/// to the pool once the last copy is dropped.
	pub fn dispose(&mut self) {
		if self.state == State::Disposed {
			return;
		}

		log::debug!("Disposing reader, releasing {} packets", self.packets.len());

		self.state = State::Disposed;
		self.headers = None;
		self.packets = Vec::new();
		self.partial = None;
		self.source.release();
	}

	fn check_state(&self) -> Result<()> {
		match self.state {
			State::Active => Ok(()),
			State::Failed => err!(Failed),
			State::Disposed => err!(Disposed),
		}
	}

	fn poison<T>(&mut self, result: Result<T>) -> Result<T> {
		if let Err(ref e) = result {
			log::debug!("Reader failed at offset {}: {e}", self.source.position());

			self.state = State::Failed;
			self.packets = Vec::new();
			self.partial = None;
		}

		result
	}

	fn headers(&mut self) -> Result<&Headers> {
		self.check_state()?;

		let headers = match self.headers.take() {
			Some(headers) => headers,
			None => {
				let result = self.read_headers();
				self.poison(result)?
			},
		};

		Ok(self.headers.insert(headers))
	}

	fn read_headers(&mut self) -> Result<Headers> {
		let mut completed = Vec::new();

		// The identification header is alone on the first page
		let Some(page_type) = self.read_page(&mut completed)? else {
			return Err(StreamError::EarlyEndOfStream.into());
		};

		let head = match completed.as_slice() {
			[packet] if self.partial.is_none() => match PacketSignature::of(packet.as_ref()) {
				PacketSignature::Tags => {
					decode_err!(@BAIL "Found the comment header before the identification header")
				},
				_ => OpusHead::parse(packet.as_ref())?,
			},
			_ => decode_err!(@BAIL "The identification header must be alone on the first page"),
		};

		if page_type.is_eos() {
			return Err(StreamError::EarlyEndOfStream.into());
		}

		completed.clear();

		// The comment header starts on the second page, and may span any number of pages.
		// Audio packets can begin on the page it ends on.
		let mut tags = None;
		while tags.is_none() {
			let Some(page_type) = self.read_page(&mut completed)? else {
				return Err(StreamError::EarlyEndOfStream.into());
			};

			let mut packets = completed.drain(..);
			if let Some(packet) = packets.next() {
				match PacketSignature::of(packet.as_ref()) {
					PacketSignature::Tags => {
						tags = Some(OpusTags::parse(packet.as_ref(), self.parse_options)?)
					},
					PacketSignature::Head => {
						decode_err!(@BAIL "Found a second identification header")
					},
					PacketSignature::Other => {
						decode_err!(@BAIL "Expected a comment header after the identification header")
					},
				}
			}

			for packet in packets {
				match PacketSignature::of(packet.as_ref()) {
					PacketSignature::Head => {
						decode_err!(@BAIL "Found a second identification header")
					},
					PacketSignature::Tags => decode_err!(@BAIL "Found a second comment header"),
					PacketSignature::Other => self.packets.push(packet),
				}
			}

			if tags.is_none() && page_type.is_eos() {
				return Err(StreamError::EarlyEndOfStream.into());
			}
		}

		let Some(tags) = tags else {
			return Err(StreamError::EarlyEndOfStream.into());
		};

		log::debug!(
			"Opus: Headers complete, {} audio packets share their pages",
			self.packets.len()
		);

		Ok(Headers { head, tags })
	}

	fn read_until(&mut self, index: Option<usize>) -> Result<()> {
		let mut completed = Vec::new();

		while !self.end_of_stream && index.is_none_or(|index| index >= self.packets.len()) {
			self.read_page(&mut completed)?;
			self.packets.append(&mut completed);
		}

		Ok(())
	}

	// Reads a single page, pushing every packet it completes onto `completed`.
	// Returns `None` if there are no more pages.
	fn read_page(&mut self, completed: &mut Vec<S::Packet>) -> Result<Option<PageType>> {
		if self.end_of_stream {
			return Ok(None);
		}

		let Some(header) = self.source.next_header()? else {
			if self.partial.is_some() {
				return Err(StreamError::TruncatedPacket.into());
			}

			log::warn!("OGG: Source ended without an end of stream page");
			self.end_of_stream = true;
			return Ok(None);
		};

		let page_type = header.page_type();
		match self.stream_serial {
			None if !page_type.is_bos() => {
				return Err(StreamError::MissingBeginningOfStream.into());
			},
			None => self.stream_serial = Some(header.stream_serial),
			Some(_) if page_type.is_bos() => {
				return Err(StreamError::UnexpectedBeginningOfStream.into());
			},
			Some(serial) if serial != header.stream_serial => {
				return Err(StreamError::UnexpectedSerial(header.stream_serial).into());
			},
			Some(_) => {},
		}

		if header.sequence_number != self.next_sequence_number {
			return Err(StreamError::BadSequenceNumber {
				expected: self.next_sequence_number,
				found: header.sequence_number,
			}
			.into());
		}

		self.next_sequence_number = self.next_sequence_number.wrapping_add(1);

		match (page_type.is_continuation(), self.partial.is_some()) {
			(true, false) => return Err(StreamError::UnexpectedContinuation.into()),
			(false, true) => return Err(StreamError::MissingContinuation.into()),
			_ => {},
		}

		log::trace!(
			"OGG: Page {} ({:?}), {} segments, {} bytes of content",
			header.sequence_number,
			page_type,
			header.segment_count(),
			header.content_size()
		);

		let allocation_limit = self.parse_options.allocation_limit;
		for span in header.packet_spans().spans() {
			let (fragment, len) = match self.partial.take() {
				Some((fragment, len)) => (Some(fragment), len),
				None => (None, 0),
			};

			let len = len + span.len;
			if len > allocation_limit {
				err!(TooMuchData);
			}

			let fragment = self.source.append(fragment, span.len)?;
			if span.terminated {
				completed.push(self.source.finish(fragment));
			} else {
				self.partial = Some((fragment, len));
			}
		}

		if page_type.is_eos() {
			if self.partial.is_some() {
				return Err(StreamError::TruncatedPacket.into());
			}

			log::debug!("OGG: End of stream at page {}", header.sequence_number);
			self.end_of_stream = true;
		}

		Ok(Some(page_type))
	}
}

impl<S: PageSource> Debug for OpusReader<S> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("OpusReader")
			.field("state", &self.state)
			.field("head", &self.headers.as_ref().map(|headers| headers.head))
			.field("packets", &self.packets.len())
			.field("end_of_stream", &self.end_of_stream)
			.field("position", &self.source.position())
			.finish_non_exhaustive()
	}
}

/// An iterator over the audio packets of an [`OpusReader`]
///
/// See [`OpusReader::packets`]
pub struct Packets<'r, S: PageSource> {
	reader: &'r mut OpusReader<S>,
	index: usize,
	done: bool,
}

impl<S: PageSource> Iterator for Packets<'_, S> {
	type Item = Result<S::Packet>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.done {
			return None;
		}

		match self.reader.packet(self.index) {
			Ok(Some(packet)) => {
				self.index += 1;
				Some(Ok(packet))
			},
			Ok(None) => {
				self.done = true;
				None
			},
			Err(e) => {
				self.done = true;
				Some(Err(e))
			},
		}
	}
}

impl<S: PageSource> FusedIterator for Packets<'_, S> {}

// Iteration needs to read from the source, so there is no `iter()` over a shared reference
#[allow(clippy::into_iter_without_iter)]
impl<'r, S: PageSource> IntoIterator for &'r mut OpusReader<S> {
	type Item = Result<S::Packet>;
	type IntoIter = Packets<'r, S>;

	fn into_iter(self) -> Self::IntoIter {
		self.packets()
	}
}
