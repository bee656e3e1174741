use crate::util::{CONTINUED, EOS, StreamBuilder, collect, minimal_stream};
use opus_demux::config::ParseOptions;
use opus_demux::error::ErrorKind;
use opus_demux::mapped::map_file;
use opus_demux::pool::BufferPool;
use opus_demux::{OpusMappedFile, OpusStreamedFile};

use std::borrow::Cow;
use std::cell::Cell;
use std::io::{Read, Write as _};
use std::rc::Rc;

// Flags when it is dropped
struct TrackedReader<'a> {
	data: &'a [u8],
	dropped: Rc<Cell<bool>>,
}

impl Read for TrackedReader<'_> {
	fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
		self.data.read(buf)
	}
}

impl Drop for TrackedReader<'_> {
	fn drop(&mut self) {
		self.dropped.set(true);
	}
}

fn three_pages() -> Vec<u8> {
	StreamBuilder::new()
		.headers(&[&[1]])
		.packets(0, &[&[2, 2]])
		.packets(0, &[&[3, 3, 3]])
		.eos()
		.build()
}

#[test_log::test]
fn reads_lazily() {
	let data = three_pages();
	let mut reader = OpusStreamedFile::new(&data[..]);

	assert_eq!(reader.materialized(), 0);

	// Reading the headers also picks up the audio packet on the comment header's page
	assert_eq!(reader.channel_count().unwrap(), 2);
	assert_eq!(reader.materialized(), 1);

	assert_eq!(reader.packet(1).unwrap().unwrap(), [2, 2][..]);
	assert_eq!(reader.materialized(), 2);
	assert!(!reader.is_complete());

	assert!(reader.packet(3).unwrap().is_none());
	assert_eq!(reader.materialized(), 3);
	assert!(reader.is_complete());
}

#[test_log::test]
fn preload() {
	let data = three_pages();

	let mut reader = OpusMappedFile::new(&data);
	reader.preload(Some(1)).unwrap();
	assert_eq!(reader.materialized(), 2);

	// Already available, nothing more is read
	reader.preload(Some(0)).unwrap();
	assert_eq!(reader.materialized(), 2);

	reader.preload(None).unwrap();
	assert_eq!(reader.materialized(), 3);
	assert!(reader.is_complete());

	// Past the end is not an error
	reader.preload(Some(100)).unwrap();
}

#[test_log::test]
fn packets_past_the_end() {
	let data = minimal_stream();
	let mut reader = OpusMappedFile::new(&data);

	for index in [1, 2, usize::MAX] {
		assert!(reader.packet(index).unwrap().is_none());
	}

	assert!(reader.packet(0).unwrap().is_some());
}

#[test_log::test]
fn iteration_is_restartable() {
	let data = three_pages();
	let mut reader = OpusStreamedFile::new(&data[..]);

	// Stop partway through the first time
	let first: Vec<_> = reader.packets().take(2).map(Result::unwrap).collect();
	assert_eq!(first.len(), 2);
	assert_eq!(reader.materialized(), 2);

	let expected = vec![vec![1], vec![2, 2], vec![3, 3, 3]];
	assert_eq!(collect(&mut reader), expected);
	assert_eq!(collect(&mut reader), expected);

	let mut count = 0;
	for packet in &mut reader {
		assert!(!packet.unwrap().is_empty());
		count += 1;
	}

	assert_eq!(count, 3);
}

#[test_log::test]
fn mapped_packets_borrow() {
	let packet: Vec<u8> = (0..=u8::MAX).cycle().take(300).collect();

	let data = StreamBuilder::new()
		.headers(&[&[1, 2, 3]])
		.raw(0, &[255], &packet[..255])
		.raw(CONTINUED | EOS, &[45], &packet[255..])
		.build();

	let mut reader = OpusMappedFile::new(&data);

	let Cow::Borrowed(single) = reader.packet(0).unwrap().unwrap() else {
		panic!("Expected a packet within one page to be borrowed");
	};
	assert!(data.as_ptr_range().contains(&single.as_ptr()));

	let spanning = reader.packet(1).unwrap().unwrap();
	assert!(matches!(spanning, Cow::Owned(_)));
	assert_eq!(spanning, packet);
}

#[test_log::test]
fn allocation_limit() {
	let data = StreamBuilder::new()
		.headers(&[])
		.packets(EOS, &[&[0; 300]])
		.build();

	let parse_options = ParseOptions::new().allocation_limit(256);

	let mut reader = OpusMappedFile::with_options(&data, parse_options);
	let err = reader.packet(0).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::TooMuchData));

	let mut reader = OpusStreamedFile::with_options(&data[..], parse_options, BufferPool::new());
	let err = reader.packet(0).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::TooMuchData));
}

#[test_log::test]
fn dispose_returns_buffers() {
	let pool = BufferPool::new();
	let data = three_pages();

	let mut reader = OpusStreamedFile::with_options(&data[..], ParseOptions::new(), pool.clone());
	reader.preload(None).unwrap();

	// The header packets have already been returned
	assert_eq!(pool.outstanding(), 3);

	let kept = reader.packet(2).unwrap().unwrap();

	reader.dispose();
	assert!(reader.is_disposed());
	assert_eq!(pool.outstanding(), 1);

	// Still valid after disposal
	assert_eq!(kept, [3, 3, 3][..]);
	drop(kept);
	assert_eq!(pool.outstanding(), 0);

	// Disposing again does nothing
	reader.dispose();

	assert!(matches!(reader.channel_count().unwrap_err().kind(), ErrorKind::Disposed));
	assert!(matches!(reader.tags().unwrap_err().kind(), ErrorKind::Disposed));
	assert!(matches!(reader.packet(0).unwrap_err().kind(), ErrorKind::Disposed));
	assert!(matches!(reader.preload(None).unwrap_err().kind(), ErrorKind::Disposed));
	assert!(matches!(reader.packets().next(), Some(Err(_))));
}

#[test_log::test]
fn dispose_closes_reader() {
	let data = three_pages();
	let dropped = Rc::new(Cell::new(false));

	let mut reader = OpusStreamedFile::new(TrackedReader {
		data: &data,
		dropped: Rc::clone(&dropped),
	});
	assert_eq!(reader.channel_count().unwrap(), 2);
	assert!(!dropped.get());

	reader.dispose();
	assert!(dropped.get());
	assert!(matches!(reader.packet(1).unwrap_err().kind(), ErrorKind::Disposed));
}

#[test_log::test]
fn dispose_after_failure() {
	let data = StreamBuilder::new()
		.headers(&[])
		.sequence(7)
		.packets(EOS, &[&[1]])
		.build();

	let mut reader = OpusMappedFile::new(&data);
	assert!(reader.packet(0).is_err());
	assert!(reader.is_failed());

	reader.dispose();
	assert!(matches!(reader.packet(0).unwrap_err().kind(), ErrorKind::Disposed));
}

#[test_log::test]
fn pool_shared_between_readers() {
	let pool = BufferPool::new();
	let data = three_pages();

	let mut first = OpusStreamedFile::with_options(&data[..], ParseOptions::new(), pool.clone());
	first.preload(None).unwrap();
	drop(first);

	assert_eq!(pool.outstanding(), 0);
	let available = pool.available();
	assert!(available > 0);

	let mut second = OpusStreamedFile::with_options(&data[..], ParseOptions::new(), pool.clone());
	assert_eq!(collect(&mut second), [vec![1], vec![2, 2], vec![3, 3, 3]]);
	assert_eq!(second.pool().outstanding(), 3);
}

#[test_log::test]
fn from_file() {
	let data = minimal_stream();

	let mut file = tempfile::NamedTempFile::new().unwrap();
	file.write_all(&data).unwrap();
	file.flush().unwrap();

	let map = map_file(file.path()).unwrap();
	let mut mapped = OpusMappedFile::new(&map);
	assert_eq!(mapped.channel_count().unwrap(), 2);
	assert_eq!(collect(&mut mapped), [vec![0xFC, 0xFF, 0xFE]]);

	let mut streamed = OpusStreamedFile::open(file.path()).unwrap();
	assert_eq!(streamed.channel_count().unwrap(), 2);
	assert_eq!(collect(&mut streamed), [vec![0xFC, 0xFF, 0xFE]]);
}

#[test_log::test]
fn missing_file() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("missing.opus");

	let err = OpusStreamedFile::open(&path).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::Io(_)));

	let err = map_file(&path).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::Io(_)));
}
