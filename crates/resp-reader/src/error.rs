//! Error types for reply decoding.
//!
//! Allocation failure has no variant here: growing a buffer or an array
//! goes through the global allocator, and exhausting it aborts the
//! process rather than unwinding back through the decoder.

use thiserror::Error;

/// Fatal decode failures.
///
/// Running out of buffered bytes is not an error; it is the
/// [`ReadResult::Incomplete`](crate::ReadResult::Incomplete) outcome. Every
/// variant here is terminal: once surfaced, the reader refuses further work
/// until [`Reader::reset`](crate::Reader::reset) is called, because the
/// protocol has no marker to resynchronize on once framing is lost.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
	/// The byte stream violates the reply grammar.
	#[error("protocol error: {0}")]
	Protocol(#[from] ProtocolError),

	/// Arrays nest deeper than the supported bound. Reported separately
	/// from [`ReadError::Protocol`] so callers can tell an unsupported
	/// reply shape from a corrupt stream.
	#[error("nesting depth {depth} exceeds supported maximum {max}")]
	DepthExceeded { depth: usize, max: usize },
}

/// Malformed-input cases behind [`ReadError::Protocol`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
	/// The leading byte of a token is not a known type marker.
	#[error("invalid type marker: {0:?}")]
	InvalidTypeMarker(char),

	/// An integer or length line is not a well-formed ASCII decimal.
	#[error("invalid integer: {0:?}")]
	InvalidInteger(String),

	/// A bulk string declared a negative length other than the nil
	/// marker, or one beyond the supported maximum.
	#[error("invalid bulk string length: {0}")]
	InvalidBulkLength(i64),

	/// An array declared a negative length other than the nil marker, or
	/// one beyond the supported maximum.
	#[error("invalid array length: {0}")]
	InvalidArrayLength(i64),

	/// A bulk payload was not followed by CRLF.
	#[error("missing CRLF after bulk payload")]
	MissingTerminator,
}
