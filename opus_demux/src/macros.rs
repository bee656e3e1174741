// Shorthand for return Err(DemuxError::new(ErrorKind::Foo))
//
// Usage:
// - err!(Variant)         -> return Err(DemuxError::new(ErrorKind::Variant))
// - err!(Variant(Value))  -> return Err(DemuxError::new(ErrorKind::Variant(Value)))
macro_rules! err {
	($variant:ident) => {
		return Err(crate::error::DemuxError::new(
			crate::error::ErrorKind::$variant,
		))
	};
	($variant:ident($value:expr)) => {
		return Err(crate::error::DemuxError::new(
			crate::error::ErrorKind::$variant($value),
		))
	};
}

// Shorthand for HeaderError::new("Message")
//
// Usage:
//
// - decode_err!(Message)
//
// or bail:
//
// - decode_err!(@BAIL Message)
macro_rules! decode_err {
	($reason:literal) => {
		Into::<crate::error::DemuxError>::into(crate::error::HeaderError::new($reason))
	};
	(@BAIL $reason:literal) => {
		return Err(decode_err!($reason))
	};
}

pub(crate) use {decode_err, err};
