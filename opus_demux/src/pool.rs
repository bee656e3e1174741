//! Reusable packet buffers for streamed readers
//!
//! A [`BufferPool`] hands out [`PooledBuffer`]s, which return themselves to the pool when dropped.
//! Since a buffer can only be dropped once, it can only be returned once.
//!
//! Pools are cheap to clone, and clones share the same buffers. They are not thread safe, matching
//! the readers that use them.

use crate::error::Result;

use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::ops::Deref;
use std::rc::{Rc, Weak};

#[derive(Default)]
struct PoolInner {
	free: Vec<Vec<u8>>,
	max_retained: usize,
	outstanding: usize,
}

/// A pool of byte buffers
///
/// # Examples
///
/// ```rust
/// use opus_demux::pool::BufferPool;
///
/// # fn main() -> opus_demux::error::Result<()> {
/// let pool = BufferPool::new();
///
/// let buffer = pool.acquire(1024)?;
/// assert_eq!(pool.outstanding(), 1);
///
/// drop(buffer);
/// assert_eq!(pool.outstanding(), 0);
/// assert_eq!(pool.available(), 1);
/// # Ok(()) }
/// ```
#[derive(Clone)]
pub struct BufferPool {
	inner: Rc<RefCell<PoolInner>>,
}

impl Default for BufferPool {
	fn default() -> Self {
		Self::new()
	}
}

impl BufferPool {
	/// The default number of free buffers a pool holds on to
	pub const DEFAULT_MAX_RETAINED: usize = 64;

	/// Create a new, empty pool
	///
	/// This retains up to [`BufferPool::DEFAULT_MAX_RETAINED`] free buffers.
	pub fn new() -> Self {
		Self::with_capacity(Self::DEFAULT_MAX_RETAINED)
	}

	/// Create a new, empty pool that retains up to `max_retained` free buffers
	///
	/// Buffers returned while the pool is full are freed.
	pub fn with_capacity(max_retained: usize) -> Self {
		Self {
			inner: Rc::new(RefCell::new(PoolInner {
				free: Vec::new(),
				max_retained,
				outstanding: 0,
			})),
		}
	}

	/// Take a buffer from the pool, with room for at least `capacity` bytes
	///
	/// The buffer is always empty.
	///
	/// # Errors
	///
	/// Unable to allocate `capacity` bytes
	pub fn acquire(&self, capacity: usize) -> Result<PooledBuffer> {
		let mut inner = self.inner.borrow_mut();

		let mut data = inner.free.pop().unwrap_or_default();
		data.try_reserve(capacity)?;

		inner.outstanding += 1;

		Ok(PooledBuffer {
			data,
			pool: Rc::downgrade(&self.inner),
		})
	}

	/// The number of buffers handed out that have yet to be returned
	pub fn outstanding(&self) -> usize {
		self.inner.borrow().outstanding
	}

	/// The number of free buffers held by the pool
	pub fn available(&self) -> usize {
		self.inner.borrow().free.len()
	}
}

impl Debug for BufferPool {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let inner = self.inner.borrow();
		f.debug_struct("BufferPool")
			.field("available", &inner.free.len())
			.field("max_retained", &inner.max_retained)
			.field("outstanding", &inner.outstanding)
			.finish()
	}
}

/// A buffer borrowed from a [`BufferPool`]
///
/// The buffer goes back to its pool when dropped. If the pool no longer exists, it is simply freed.
pub struct PooledBuffer {
	data: Vec<u8>,
	pool: Weak<RefCell<PoolInner>>,
}

impl PooledBuffer {
	/// Append `len` zeroed bytes, returning them for the caller to fill
	pub(crate) fn extend_zeroed(&mut self, len: usize) -> Result<&mut [u8]> {
		let start = self.data.len();
		self.data.try_reserve(len)?;
		self.data.resize(start + len, 0);

		Ok(&mut self.data[start..])
	}
}

impl Deref for PooledBuffer {
	type Target = [u8];

	fn deref(&self) -> &Self::Target {
		&self.data
	}
}

impl AsRef<[u8]> for PooledBuffer {
	fn as_ref(&self) -> &[u8] {
		&self.data
	}
}

impl Drop for PooledBuffer {
	fn drop(&mut self) {
		let Some(pool) = self.pool.upgrade() else {
			return;
		};

		let mut inner = pool.borrow_mut();
		inner.outstanding -= 1;

		if inner.free.len() < inner.max_retained {
			let mut data = std::mem::take(&mut self.data);
			data.clear();
			inner.free.push(data);
		}
	}
}

impl Debug for PooledBuffer {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PooledBuffer")
			.field("len", &self.data.len())
			.field("capacity", &self.data.capacity())
			.finish_non_exhaustive()
	}
}
