//! Read the packets of Ogg Opus streams.
//!
//! This crate demuxes a single Opus logical bitstream, validating its page flow and decoding its
//! identification and comment headers. The audio packets themselves are handed out as-is, decoding
//! them is left to an Opus decoder.
//!
//! # Readers
//!
//! There are two readers, which differ only in how they get at the stream:
//!
//! * [`OpusMappedFile`] reads from a byte slice (such as a [mapped file](mapped::map_file)), and
//!   borrows packets from it wherever possible.
//! * [`OpusStreamedFile`] reads from any [`Read`](std::io::Read)er, copying packets into buffers
//!   from a [`BufferPool`](pool::BufferPool).
//!
//! Both are lazy, only reading as many pages as needed to answer a request.
//!
//! # Examples
//!
//! ## Reading the headers
//!
//! ```rust,no_run
//! # fn main() -> opus_demux::error::Result<()> {
//! use opus_demux::OpusStreamedFile;
//!
//! let mut file = OpusStreamedFile::open("test.opus")?;
//!
//! let head = file.head()?;
//! println!("Channels: {}", head.channel_count());
//! println!("Pre-skip: {}", head.pre_skip());
//!
//! let tags = file.tags()?;
//! println!("Vendor: {}", tags.vendor());
//!
//! if let Some(title) = tags.get("TITLE").and_then(|item| item.value()) {
//! 	println!("Title: {title}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Reading packets from memory
//!
//! ```rust,no_run
//! # fn main() -> opus_demux::error::Result<()> {
//! use opus_demux::OpusMappedFile;
//!
//! let data = std::fs::read("test.opus")?;
//! let mut file = OpusMappedFile::new(&data);
//!
//! // Packets that fit on a single page borrow from `data`
//! while let Some(packet) = file.packet(file.materialized())? {
//! 	println!("Packet: {} bytes", packet.len());
//! }
//!
//! // Everything has been read, so this only visits packets held by the reader
//! assert_eq!(file.packets().count(), file.materialized());
//! # Ok(())
//! # }
//! ```
//!
//! ## Accepting other encoders
//!
//! By default, only streams written by libopus are accepted. This can be disabled with
//! [`ParseOptions::require_libopus_vendor`](config::ParseOptions::require_libopus_vendor).
//!
//! ```rust,no_run
//! # fn main() -> opus_demux::error::Result<()> {
//! use opus_demux::OpusMappedFile;
//! use opus_demux::config::ParseOptions;
//!
//! let data = std::fs::read("test.opus")?;
//!
//! let parse_options = ParseOptions::new().require_libopus_vendor(false);
//! let mut file = OpusMappedFile::with_options(&data, parse_options);
//!
//! println!("Vendor: {}", file.vendor()?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod header;
pub(crate) mod macros;
pub mod mapped;
pub mod pool;
pub mod reader;
pub mod source;
pub mod streamed;

pub use crate::mapped::OpusMappedFile;
pub use crate::reader::OpusReader;
pub use crate::streamed::{OpusPacket, OpusStreamedFile};
