use opus_demux::OpusReader;
use opus_demux::error::{DemuxError, ErrorKind, StreamError};
use opus_demux::source::PageSource;

use ogg_pager::{
	CONTAINS_FIRST_PAGE_OF_BITSTREAM, CONTAINS_LAST_PAGE_OF_BITSTREAM, CONTINUED_PACKET,
	segment_table,
};

pub const BOS: u8 = CONTAINS_FIRST_PAGE_OF_BITSTREAM;
pub const EOS: u8 = CONTAINS_LAST_PAGE_OF_BITSTREAM;
pub const CONTINUED: u8 = CONTINUED_PACKET;

pub const SERIAL: u32 = 0x1DE2_5AA5;

/// Encode a single page
pub fn page(flags: u8, serial: u32, sequence: u32, segments: &[u8], content: &[u8]) -> Vec<u8> {
	let mut page = b"OggS".to_vec();
	page.push(0); // Version
	page.push(flags);
	page.extend(0_u64.to_le_bytes()); // Granule position
	page.extend(serial.to_le_bytes());
	page.extend(sequence.to_le_bytes());
	page.extend(0_u32.to_le_bytes()); // Checksum
	page.push(segments.len() as u8);
	page.extend(segments);
	page.extend(content);
	page
}

/// An identification header at 48 kHz
pub fn opus_head(channels: u8, family: u8) -> Vec<u8> {
	let mut packet = b"OpusHead".to_vec();
	packet.push(1); // Version
	packet.push(channels);
	packet.extend(312_u16.to_le_bytes()); // Pre-skip
	packet.extend(48000_u32.to_le_bytes());
	packet.extend(0_i16.to_le_bytes()); // Output gain
	packet.push(family);
	packet
}

/// A comment header, the comment count is only written if there are comments
pub fn opus_tags(vendor: &str, tags: &[&str], comments: &[&str]) -> Vec<u8> {
	fn string(packet: &mut Vec<u8>, value: &str) {
		packet.extend((value.len() as u32).to_le_bytes());
		packet.extend(value.as_bytes());
	}

	let mut packet = b"OpusTags".to_vec();
	string(&mut packet, vendor);

	packet.extend((tags.len() as u32).to_le_bytes());
	for tag in tags {
		string(&mut packet, tag);
	}

	if !comments.is_empty() {
		packet.extend((comments.len() as u32).to_le_bytes());
		for comment in comments {
			string(&mut packet, comment);
		}
	}

	packet
}

/// The comment header written by most libopus based encoders
pub fn libopus_tags() -> Vec<u8> {
	opus_tags("libopus 1.3.1", &[], &[])
}

/// Builds a stream one page at a time, numbering the pages automatically
pub struct StreamBuilder {
	data: Vec<u8>,
	serial: u32,
	sequence: u32,
}

impl Default for StreamBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl StreamBuilder {
	pub fn new() -> Self {
		Self {
			data: Vec::new(),
			serial: SERIAL,
			sequence: 0,
		}
	}

	/// A stereo identification header, and the libopus comment header followed by `audio`
	pub fn headers(self, audio: &[&[u8]]) -> Self {
		let tags = libopus_tags();

		let mut second_page = vec![&tags[..]];
		second_page.extend_from_slice(audio);

		self.packets(BOS, &[&opus_head(2, 0)])
			.packets(0, &second_page)
	}

	/// A page holding whole packets
	pub fn packets(self, flags: u8, packets: &[&[u8]]) -> Self {
		let mut segments = Vec::new();
		let mut content = Vec::new();
		for packet in packets {
			segments.extend(segment_table(packet.len()).unwrap());
			content.extend_from_slice(packet);
		}

		self.raw(flags, &segments, &content)
	}

	/// A page with an explicit segment table
	pub fn raw(mut self, flags: u8, segments: &[u8], content: &[u8]) -> Self {
		self.data.extend(page(flags, self.serial, self.sequence, segments, content));
		self.sequence += 1;
		self
	}

	/// An empty end of stream page
	pub fn eos(self) -> Self {
		self.raw(EOS, &[], &[])
	}

	/// Override the sequence number of the next page
	pub fn sequence(mut self, sequence: u32) -> Self {
		self.sequence = sequence;
		self
	}

	/// Override the serial number of all following pages
	pub fn serial(mut self, serial: u32) -> Self {
		self.serial = serial;
		self
	}

	/// Append arbitrary bytes
	pub fn bytes(mut self, bytes: &[u8]) -> Self {
		self.data.extend_from_slice(bytes);
		self
	}

	pub fn build(self) -> Vec<u8> {
		self.data
	}
}

/// Stereo headers, a single 3 byte packet sharing the comment header's page, and an empty end of
/// stream page
pub fn minimal_stream() -> Vec<u8> {
	StreamBuilder::new().headers(&[&[0xFC, 0xFF, 0xFE]]).eos().build()
}

/// Read every packet, panicking on errors
pub fn collect<S: PageSource>(reader: &mut OpusReader<S>) -> Vec<Vec<u8>> {
	reader
		.packets()
		.map(|packet| packet.unwrap().as_ref().to_vec())
		.collect()
}

pub fn stream_error(err: &DemuxError) -> StreamError {
	match err.kind() {
		ErrorKind::StreamState(err) => *err,
		other => panic!("Expected a stream error, found {other:?}"),
	}
}

/// Verify that a reader refuses to do anything after failing
pub fn assert_failed<S: PageSource>(reader: &mut OpusReader<S>) {
	assert!(reader.is_failed());
	assert!(matches!(reader.channel_count().unwrap_err().kind(), ErrorKind::Failed));
	assert!(matches!(reader.tags().unwrap_err().kind(), ErrorKind::Failed));
	assert!(matches!(reader.packet(0), Err(ref e) if matches!(e.kind(), ErrorKind::Failed)));

	let mut packets = reader.packets();
	assert!(matches!(packets.next(), Some(Err(_))));
	assert!(packets.next().is_none());
}
