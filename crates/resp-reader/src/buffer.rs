//! Byte intake buffer with an explicit read cursor.

use bytes::Buf;
use bytes::BytesMut;

/// Consumed-prefix size above which [`IntakeBuffer::append`] compacts
/// eagerly instead of waiting for the next completed reply.
const COMPACT_THRESHOLD: usize = 16 * 1024;

/// Accumulates fed bytes and tracks how far decoding has progressed.
///
/// Consuming only moves a cursor; bytes stay in place until
/// [`IntakeBuffer::compact`] discards the consumed prefix. Keeping those
/// two steps separate is what lets the decoder consume nothing at all for
/// a token that is not wholly buffered yet.
#[derive(Debug)]
pub(crate) struct IntakeBuffer {
	buf: BytesMut,
	pos: usize,
}

impl IntakeBuffer {
	pub fn new() -> Self {
		Self {
			buf: BytesMut::with_capacity(4096),
			pos: 0,
		}
	}

	/// Append fed bytes behind any not-yet-consumed input.
	pub fn append(&mut self, bytes: &[u8]) {
		if self.pos >= COMPACT_THRESHOLD {
			self.compact();
		}
		self.buf.extend_from_slice(bytes);
	}

	/// The unread suffix.
	pub fn remaining(&self) -> &[u8] {
		&self.buf[self.pos..]
	}

	/// Number of unread bytes.
	pub fn unread(&self) -> usize {
		self.buf.len() - self.pos
	}

	/// Advance the cursor past `n` recognized bytes.
	pub fn consume(&mut self, n: usize) {
		debug_assert!(self.pos + n <= self.buf.len());
		self.pos += n;
	}

	/// Discard the consumed prefix.
	pub fn compact(&mut self) {
		if self.pos > 0 {
			self.buf.advance(self.pos);
			self.pos = 0;
		}
	}

	/// Drop everything, consumed or not.
	pub fn clear(&mut self) {
		self.buf.clear();
		self.pos = 0;
	}

	#[cfg(test)]
	pub fn consumed(&self) -> usize {
		self.pos
	}
}
