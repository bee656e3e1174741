//! Options to control how a reader parses a stream

/// Options to control how a reader parses a stream
///
/// These are handed to a reader when it is opened, and can't be changed afterwards.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct ParseOptions {
	pub(crate) allocation_limit: usize,
	pub(crate) require_libopus_vendor: bool,
}

impl Default for ParseOptions {
	/// The default implementation for `ParseOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// ParseOptions {
	/// 	allocation_limit: Self::DEFAULT_ALLOCATION_LIMIT,
	/// 	require_libopus_vendor: true,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}

impl ParseOptions {
	/// Default allocation limit for any single packet
	pub const DEFAULT_ALLOCATION_LIMIT: usize = 16 * 1024 * 1024;

	/// The vendor string prefix required by [`ParseOptions::require_libopus_vendor`]
	pub const LIBOPUS_VENDOR_PREFIX: &'static str = "libopus 1.";

	/// Creates a new `ParseOptions`, alias for `Default` implementation
	///
	/// See also: [`ParseOptions::default`]
	///
	/// # Examples
	///
	/// ```rust
	/// use opus_demux::config::ParseOptions;
	///
	/// let parsing_options = ParseOptions::new();
	/// ```
	#[must_use]
	pub const fn new() -> Self {
		Self {
			allocation_limit: Self::DEFAULT_ALLOCATION_LIMIT,
			require_libopus_vendor: true,
		}
	}

	/// The maximum number of bytes to allocate for any single packet
	///
	/// This is a safety measure to prevent a corrupt stream from assembling one enormous packet out of
	/// endlessly continued pages. If a packet exceeds this limit, the reader will return
	/// [`ErrorKind::TooMuchData`](crate::error::ErrorKind::TooMuchData).
	///
	/// This also bounds the comment header.
	///
	/// # Examples
	///
	/// ```rust
	/// use opus_demux::config::ParseOptions;
	///
	/// // My files have gigantic comment headers, I'll double the allocation limit!
	/// let parsing_options = ParseOptions::new().allocation_limit(32 * 1024 * 1024);
	/// ```
	pub fn allocation_limit(&mut self, allocation_limit: usize) -> Self {
		self.allocation_limit = allocation_limit;
		*self
	}

	/// Whether to require the comment header's vendor string to start with `"libopus 1."`
	///
	/// Streams written by other encoders are rejected with
	/// [`ErrorKind::UnsupportedVendor`](crate::error::ErrorKind::UnsupportedVendor) when enabled.
	///
	/// # Examples
	///
	/// ```rust
	/// use opus_demux::config::ParseOptions;
	///
	/// // By default, `require_libopus_vendor` is enabled. Here, we'll accept any encoder.
	/// let parsing_options = ParseOptions::new().require_libopus_vendor(false);
	/// ```
	pub fn require_libopus_vendor(&mut self, require_libopus_vendor: bool) -> Self {
		self.require_libopus_vendor = require_libopus_vendor;
		*self
	}
}
