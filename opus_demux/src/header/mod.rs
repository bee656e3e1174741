//! Opus identification and comment headers
//!
//! Every Ogg Opus stream starts with two header packets, the identification header ([`OpusHead`])
//! alone on the first page, followed by the comment header ([`OpusTags`]) starting on the second.
//!
//! See <https://datatracker.ietf.org/doc/html/rfc7845#section-5>

mod head;
mod tags;

pub use head::OpusHead;
pub use tags::{OpusTags, TagItem};

// https://datatracker.ietf.org/doc/pdf/rfc7845.pdf#section-5.1
pub(crate) const OPUSHEAD: &[u8] = &[79, 112, 117, 115, 72, 101, 97, 100];
pub(crate) const OPUSTAGS: &[u8] = &[79, 112, 117, 115, 84, 97, 103, 115];

/// What a packet claims to be, judged by its signature
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum PacketSignature {
	Head,
	Tags,
	Other,
}

impl PacketSignature {
	pub(crate) fn of(packet: &[u8]) -> Self {
		if packet.starts_with(OPUSHEAD) {
			Self::Head
		} else if packet.starts_with(OPUSTAGS) {
			Self::Tags
		} else {
			Self::Other
		}
	}
}
