//! Pooled backing store for short string payloads.

use bytes::Bytes;
use bytes::BytesMut;

/// Size of one shared pool chunk.
pub(crate) const CHUNK_SIZE: usize = 8 * 1024;

/// Packs successive short payloads into shared chunks so that decoding many
/// small bulk strings does not cost one allocation each.
///
/// Views returned by [`BufferPool::materialize`] co-own their chunk: the
/// chunk's allocation is freed when the pool has moved on *and* the last
/// view into it is dropped. Turning the pool off changes only allocation
/// counts, never decoded content.
#[derive(Debug)]
pub(crate) struct BufferPool {
	chunk: BytesMut,
}

impl BufferPool {
	pub fn new() -> Self {
		Self {
			chunk: BytesMut::new(),
		}
	}

	/// Copy `src` into pooled storage and return a view of it.
	///
	/// Payloads larger than [`CHUNK_SIZE`] get a dedicated allocation and
	/// are never pooled. When the active chunk cannot fit `src`, a fresh
	/// chunk takes its place.
	pub fn materialize(&mut self, src: &[u8]) -> Bytes {
		if src.len() > CHUNK_SIZE {
			return Bytes::copy_from_slice(src);
		}
		if self.chunk.capacity() < src.len() {
			self.chunk = BytesMut::with_capacity(CHUNK_SIZE);
		}
		self.chunk.extend_from_slice(src);
		self.chunk.split_to(src.len()).freeze()
	}
}
