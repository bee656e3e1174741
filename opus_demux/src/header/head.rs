use super::OPUSHEAD;
use crate::error::Result;
use crate::macros::{decode_err, err};

use byteorder::{LittleEndian, ReadBytesExt};

// Signature + version + channels + pre-skip + sample rate + gain + mapping family
const SINGLE_STREAM_HEAD_SIZE: usize = 19;

/// An Opus identification header
///
/// Only channel mapping family 0 (mono or stereo in a single Opus stream) is supported.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct OpusHead {
	pub(crate) version: u8,
	pub(crate) channel_count: u8,
	pub(crate) pre_skip: u16,
	pub(crate) input_sample_rate: u32,
	pub(crate) output_gain: i16,
	pub(crate) mapping_family: u8,
}

impl OpusHead {
	/// Decode an identification header packet
	///
	/// Only channel mapping family 0 is supported, which limits the stream to 1 or 2 channels. A
	/// family 0 header claiming more channels is rejected, even though the field itself could hold
	/// up to 255.
	///
	/// # Errors
	///
	/// * The packet doesn't start with `OpusHead`
	/// * The packet is too short, or has data after the header
	/// * [`ErrorKind::UnsupportedVersion`](crate::error::ErrorKind::UnsupportedVersion)
	/// * [`ErrorKind::UnsupportedMappingFamily`](crate::error::ErrorKind::UnsupportedMappingFamily)
	/// * [`ErrorKind::InvalidChannelCount`](crate::error::ErrorKind::InvalidChannelCount)
	///
	/// # Examples
	///
	/// ```rust
	/// use opus_demux::header::OpusHead;
	///
	/// # fn main() -> opus_demux::error::Result<()> {
	/// let packet = [
	/// 	b'O', b'p', b'u', b's', b'H', b'e', b'a', b'd', // Signature
	/// 	0x01, // Version
	/// 	0x02, // Channel count
	/// 	0x38, 0x01, // Pre-skip
	/// 	0x80, 0xBB, 0x00, 0x00, // Input sample rate
	/// 	0x00, 0x00, // Output gain
	/// 	0x00, // Channel mapping family
	/// ];
	///
	/// let head = OpusHead::parse(&packet)?;
	/// assert_eq!(head.channel_count(), 2);
	/// assert_eq!(head.input_sample_rate(), 48000);
	/// # Ok(()) }
	/// ```
	pub fn parse(packet: &[u8]) -> Result<Self> {
		if !packet.starts_with(OPUSHEAD) {
			decode_err!(@BAIL "Expected an identification header");
		}

		if packet.len() < SINGLE_STREAM_HEAD_SIZE {
			err!(SizeMismatch);
		}

		let reader = &mut &packet[OPUSHEAD.len()..];

		let version = reader.read_u8()?;
		if version != 1 {
			err!(UnsupportedVersion(version));
		}

		let channel_count = reader.read_u8()?;
		let pre_skip = reader.read_u16::<LittleEndian>()?;
		let input_sample_rate = reader.read_u32::<LittleEndian>()?;
		let output_gain = reader.read_i16::<LittleEndian>()?;
		let mapping_family = reader.read_u8()?;

		// Family 1 and 255 are followed by a stream count, coupled count and channel mapping table.
		// We don't attempt to read any of that.
		if mapping_family != 0 {
			err!(UnsupportedMappingFamily(mapping_family));
		}

		// https://datatracker.ietf.org/doc/html/rfc7845.html#section-5.1.1
		if channel_count == 0 || channel_count > 2 {
			err!(InvalidChannelCount(channel_count));
		}

		if !reader.is_empty() {
			decode_err!(@BAIL "Extraneous data exists after the identification header");
		}

		log::debug!(
			"Opus: Found identification header (version: {version}, channels: {channel_count}, \
			 input sample rate: {input_sample_rate})"
		);

		Ok(Self {
			version,
			channel_count,
			pre_skip,
			input_sample_rate,
			output_gain,
			mapping_family,
		})
	}

	/// Opus version
	///
	/// This is currently always 1.
	pub fn version(&self) -> u8 {
		self.version
	}

	/// Channel count
	pub fn channel_count(&self) -> u8 {
		self.channel_count
	}

	/// The number of samples (at 48 kHz) to discard from the start of the decoded output
	pub fn pre_skip(&self) -> u16 {
		self.pre_skip
	}

	/// The sample rate of the original input
	///
	/// This is informational only, Opus is always decoded at 48 kHz unless the output device
	/// doesn't support it.
	pub fn input_sample_rate(&self) -> u32 {
		self.input_sample_rate
	}

	/// The gain to apply to the decoded output, as a Q7.8 value in dB
	pub fn output_gain(&self) -> i16 {
		self.output_gain
	}

	/// The output gain in dB
	pub fn output_gain_db(&self) -> f32 {
		f32::from(self.output_gain) / 256.0
	}

	/// The linear factor to scale decoded samples by to apply the output gain
	///
	/// NOTE: Readers never apply this on their own.
	pub fn output_gain_factor(&self) -> f32 {
		10_f32.powf(f32::from(self.output_gain) / (20.0 * 256.0))
	}

	/// The channel mapping family
	///
	/// This is currently always 0 (a single mono or stereo stream).
	pub fn mapping_family(&self) -> u8 {
		self.mapping_family
	}
}
