use crate::error::{PageError, Result};

/// The maximum number of entries in a segment table
pub const MAX_SEGMENT_COUNT: usize = 255;
/// The maximum page content size
pub const MAX_CONTENT_SIZE: usize = MAX_SEGMENT_COUNT * 255;

/// A run of page content belonging to a single packet
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PacketSpan {
	/// The offset of the span from the start of the page's content
	pub offset: usize,
	/// The length of the span
	pub len: usize,
	/// Whether the packet ends with this span
	///
	/// This is only `false` for the final span of a page whose segment table ends in a 255 entry,
	/// in which case the packet continues on the next page.
	pub terminated: bool,
}

/// The packet layout of a single page, as described by its segment table
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Lacing {
	spans: Vec<PacketSpan>,
	consumed: usize,
}

impl Lacing {
	/// Returns the packet spans, in page order
	pub fn spans(&self) -> &[PacketSpan] {
		&self.spans
	}

	/// Returns the total number of content bytes described by the segment table
	///
	/// The next page header begins this many bytes after the end of the segment table.
	pub fn consumed(&self) -> usize {
		self.consumed
	}

	/// Whether the page's final packet ends on this page
	///
	/// A page without any segments is considered terminated.
	pub fn is_terminated(&self) -> bool {
		self.spans.last().is_none_or(|span| span.terminated)
	}
}

/// Split a segment table into packet spans
///
/// Consecutive 255 entries are joined with the first entry below 255, which ends the packet. A packet
/// whose length is a multiple of 255 is therefore ended by a 0 entry. If the table ends on a 255 entry,
/// the final span is left unterminated, and must be joined with the start of the next page.
///
/// # Examples
///
/// ```rust
/// use ogg_pager::lace;
///
/// let lacing = lace(&[255, 255, 10, 3, 255]);
///
/// let lengths: Vec<_> = lacing.spans().iter().map(|span| span.len).collect();
/// assert_eq!(lengths, [520, 3, 255]);
/// assert_eq!(lacing.consumed(), 778);
/// assert!(!lacing.is_terminated());
/// ```
pub fn lace(segments: &[u8]) -> Lacing {
	let mut spans = Vec::new();

	let mut offset = 0;
	let mut packet_len = 0;
	for &segment in segments {
		packet_len += usize::from(segment);

		if segment == 255 {
			continue;
		}

		spans.push(PacketSpan {
			offset,
			len: packet_len,
			terminated: true,
		});

		offset += packet_len;
		packet_len = 0;
	}

	// The packet continues on the next page
	if packet_len != 0 {
		spans.push(PacketSpan {
			offset,
			len: packet_len,
			terminated: false,
		});

		offset += packet_len;
	}

	Lacing {
		spans,
		consumed: offset,
	}
}

/// Creates a segment table for a single packet of `length` bytes
///
/// # Errors
///
/// The packet would need more than [`MAX_SEGMENT_COUNT`] segments
///
/// # Examples
///
/// ```rust
/// use ogg_pager::segment_table;
///
/// # fn main() -> ogg_pager::Result<()> {
/// assert_eq!(segment_table(19)?, [19]);
/// assert_eq!(segment_table(300)?, [255, 45]);
///
/// // A multiple of 255 needs an explicit 0 to end the packet
/// assert_eq!(segment_table(510)?, [255, 255, 0]);
/// # Ok(()) }
/// ```
pub fn segment_table(length: usize) -> Result<Vec<u8>> {
	let needed = length / 255 + 1;
	if needed > MAX_SEGMENT_COUNT {
		return Err(PageError::TooMuchData);
	}

	let mut segments = vec![255; needed - 1];
	segments.push((length % 255) as u8);

	Ok(segments)
}
