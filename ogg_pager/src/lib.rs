//! A simple OGG page header reader
//!
//! This crate reads page headers and splits their content into packets. It does not read the page
//! content itself, that is left to the caller, which may either copy it out of a stream or borrow it
//! from a buffer that holds the entire file.
//!
//! # Examples
//!
//! ```rust
//! use ogg_pager::{PageHeader, PageType};
//!
//! # fn main() -> ogg_pager::Result<()> {
//! # let mut page = Vec::new();
//! # page.extend(b"OggS\0\x02");
//! # page.extend([0; 8]);
//! # page.extend(1234_u32.to_le_bytes());
//! # page.extend([0; 8]);
//! # page.extend([2, 3, 4]);
//! # page.extend([1, 2, 3, 4, 5, 6, 7]);
//! let mut reader = &page[..];
//!
//! let header = PageHeader::read(&mut reader)?;
//! assert_eq!(header.page_type(), PageType::BeginningOfStream);
//!
//! // The reader is now positioned at the page content
//! for span in header.packet_spans().spans() {
//! 	let packet = &reader[span.offset..span.offset + span.len];
//! 	println!("Packet of {} bytes", packet.len());
//! }
//! # Ok(()) }
//! ```

mod error;
mod header;
mod lacing;
mod page_type;

pub use error::{PageError, Result};
pub use header::{PAGE_HEADER_SIZE, PageHeader};
pub use lacing::{Lacing, MAX_CONTENT_SIZE, MAX_SEGMENT_COUNT, PacketSpan, lace, segment_table};
pub use page_type::{
	CONTAINS_FIRST_PAGE_OF_BITSTREAM, CONTAINS_LAST_PAGE_OF_BITSTREAM, CONTINUED_PACKET, PageType,
};
