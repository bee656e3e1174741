use super::OPUSTAGS;
use crate::config::ParseOptions;
use crate::error::Result;
use crate::macros::{decode_err, err};

use byteorder::{LittleEndian, ReadBytesExt};

/// A single `KEY=value` entry of an [`OpusTags`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagItem {
	pub(crate) key: String,
	pub(crate) value: Option<String>,
}

impl TagItem {
	/// The item's key, exactly as it was written
	pub fn key(&self) -> &str {
		&self.key
	}

	/// The item's value
	///
	/// This is `None` when the entry had no `=` separator at all, and is distinct from an empty value
	/// (`KEY=`).
	pub fn value(&self) -> Option<&str> {
		self.value.as_deref()
	}
}

/// An Opus comment header
///
/// Tags keep the order they were read in, and keys may repeat.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OpusTags {
	pub(crate) vendor: String,
	pub(crate) items: Vec<TagItem>,
	pub(crate) comments: Vec<String>,
}

impl OpusTags {
	/// Decode a comment header packet
	///
	/// # Errors
	///
	/// * The packet doesn't start with `OpusTags`
	/// * Any length or count exceeds the remaining data
	/// * A tag or comment has a length of 0
	/// * A string isn't valid UTF-8
	/// * [`ErrorKind::UnsupportedVendor`](crate::error::ErrorKind::UnsupportedVendor), if
	///   [`ParseOptions::require_libopus_vendor`] is enabled
	/// * Nonzero data remains after the comments
	///
	/// # Examples
	///
	/// ```rust
	/// use opus_demux::config::ParseOptions;
	/// use opus_demux::header::OpusTags;
	///
	/// # fn main() -> opus_demux::error::Result<()> {
	/// let mut packet = b"OpusTags".to_vec();
	/// packet.extend(13_u32.to_le_bytes());
	/// packet.extend(b"libopus 1.3.1");
	/// packet.extend(1_u32.to_le_bytes());
	/// packet.extend(11_u32.to_le_bytes());
	/// packet.extend(b"TITLE=Opus!");
	///
	/// let tags = OpusTags::parse(&packet, ParseOptions::new())?;
	/// assert_eq!(tags.vendor(), "libopus 1.3.1");
	/// assert_eq!(tags.get("title").and_then(|item| item.value()), Some("Opus!"));
	/// # Ok(()) }
	/// ```
	pub fn parse(packet: &[u8], parse_options: ParseOptions) -> Result<Self> {
		if !packet.starts_with(OPUSTAGS) {
			decode_err!(@BAIL "Expected a comment header");
		}

		let reader = &mut &packet[OPUSTAGS.len()..];

		let vendor_len = read_len(reader)?;
		let vendor = String::from_utf8(take(reader, vendor_len)?.to_vec())?;

		if parse_options.require_libopus_vendor
			&& !vendor.starts_with(ParseOptions::LIBOPUS_VENDOR_PREFIX)
		{
			err!(UnsupportedVendor(vendor));
		}

		if reader.is_empty() {
			decode_err!(@BAIL "Comment header is missing a tag count");
		}

		let number_of_items = read_len(reader)?;
		if number_of_items > reader.len() >> 2 {
			err!(SizeMismatch);
		}

		let mut tag = Self {
			vendor,
			items: Vec::with_capacity(number_of_items),
			comments: Vec::new(),
		};

		for _ in 0..number_of_items {
			let item = read_string(reader)?.ok_or_else(|| decode_err!("Null tag in comment header"))?;

			// KEY=VALUE, or a bare KEY
			let item = match item.split_once('=') {
				Some((key, value)) => TagItem {
					key: key.to_owned(),
					value: Some(value.to_owned()),
				},
				None => TagItem {
					key: item,
					value: None,
				},
			};

			tag.items.push(item);
		}

		// The comment list is optional, anything shorter than a count must be padding
		if reader.len() >= 4 {
			let number_of_comments = read_len(reader)?;
			if number_of_comments > reader.len() >> 2 {
				err!(SizeMismatch);
			}

			tag.comments.reserve(number_of_comments);
			for _ in 0..number_of_comments {
				let comment = read_string(reader)?
					.ok_or_else(|| decode_err!("Null comment in comment header"))?;
				tag.comments.push(comment);
			}
		}

		if let Some(pos) = reader.iter().position(|b| *b != 0) {
			log::debug!(
				"Opus: Found unhandled data in comment header at offset {}",
				packet.len() - reader.len() + pos
			);
			decode_err!(@BAIL "Unhandled data after the comments in comment header");
		}

		log::debug!(
			"Opus: Found comment header (vendor: {:?}, tags: {}, comments: {})",
			tag.vendor,
			tag.items.len(),
			tag.comments.len()
		);

		Ok(tag)
	}

	/// The vendor string, identifying the encoder that wrote the stream
	pub fn vendor(&self) -> &str {
		&self.vendor
	}

	/// All tag items, in the order they were read
	pub fn items(&self) -> &[TagItem] {
		&self.items
	}

	/// Returns the first item with a key matching `key`
	///
	/// Keys are compared case-insensitively (ASCII).
	pub fn get(&self, key: &str) -> Option<&TagItem> {
		self.items.iter().find(|item| item.key.eq_ignore_ascii_case(key))
	}

	/// Returns all items with a key matching `key`, in the order they were read
	///
	/// Keys are compared case-insensitively (ASCII).
	pub fn get_all<'a, 'k>(
		&'a self,
		key: &'k str,
	) -> impl Iterator<Item = &'a TagItem> + use<'a, 'k> {
		self.items
			.iter()
			.filter(move |item| item.key.eq_ignore_ascii_case(key))
	}

	/// Freeform comments, in the order they were read
	pub fn comments(&self) -> &[String] {
		&self.comments
	}

	/// Returns the number of tag items
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Whether there are no tag items
	///
	/// NOTE: This doesn't take comments into account.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}
}

fn read_len(reader: &mut &[u8]) -> Result<usize> {
	if reader.len() < 4 {
		err!(SizeMismatch);
	}

	Ok(reader.read_u32::<LittleEndian>()? as usize)
}

fn take<'a>(reader: &mut &'a [u8], len: usize) -> Result<&'a [u8]> {
	if len > reader.len() {
		err!(SizeMismatch);
	}

	let (taken, remaining) = reader.split_at(len);
	*reader = remaining;

	Ok(taken)
}

// Returns `None` for a zero-length string
fn read_string(reader: &mut &[u8]) -> Result<Option<String>> {
	let len = read_len(reader)?;
	if len == 0 {
		return Ok(None);
	}

	let bytes = take(reader, len)?;
	Ok(Some(String::from_utf8(bytes.to_vec())?))
}
