//! Reply value tree.

use bytes::Bytes;

/// A single decoded reply value.
///
/// Array elements appear in the order they arrived on the wire and are
/// never rewritten once set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyValue {
	/// Simple string: `+OK\r\n`
	SimpleString(Bytes),

	/// Error reply: `-ERR message\r\n`
	Error(Bytes),

	/// Integer: `:1000\r\n`
	Integer(i64),

	/// Bulk string: `$6\r\nfoobar\r\n`
	BulkString(Bytes),

	/// Array: `*2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n`
	Array(Vec<ReplyValue>),

	/// Nil reply: `$-1\r\n` or `*-1\r\n`
	Nil,
}

impl ReplyValue {
	/// Check if the value is an error reply
	pub fn is_error(&self) -> bool {
		matches!(self, ReplyValue::Error(_))
	}

	/// Check if the value is nil
	pub fn is_nil(&self) -> bool {
		matches!(self, ReplyValue::Nil)
	}

	/// Try to view a string payload as UTF-8 text
	pub fn as_str(&self) -> Option<&str> {
		match self {
			ReplyValue::SimpleString(s) | ReplyValue::BulkString(s) | ReplyValue::Error(s) => {
				std::str::from_utf8(s).ok()
			}
			_ => None,
		}
	}

	/// Try to view a string payload as raw bytes
	pub fn as_bytes(&self) -> Option<&Bytes> {
		match self {
			ReplyValue::SimpleString(b) | ReplyValue::BulkString(b) | ReplyValue::Error(b) => {
				Some(b)
			}
			_ => None,
		}
	}

	/// Try to convert to integer
	pub fn as_integer(&self) -> Option<i64> {
		match self {
			ReplyValue::Integer(i) => Some(*i),
			_ => None,
		}
	}

	/// Try to view as an array
	pub fn as_array(&self) -> Option<&Vec<ReplyValue>> {
		match self {
			ReplyValue::Array(a) => Some(a),
			_ => None,
		}
	}

	/// Try to consume and convert to `Vec<ReplyValue>`
	pub fn into_vec(self) -> Option<Vec<ReplyValue>> {
		match self {
			ReplyValue::Array(a) => Some(a),
			_ => None,
		}
	}

	/// Convert a string payload to `String` with lossy UTF-8 conversion
	pub fn to_string_lossy(&self) -> Option<String> {
		match self {
			ReplyValue::SimpleString(s) | ReplyValue::BulkString(s) | ReplyValue::Error(s) => {
				Some(String::from_utf8_lossy(s).into_owned())
			}
			_ => None,
		}
	}

	// Convenience constructors

	/// Create a simple string value
	pub fn simple_string(s: impl Into<Bytes>) -> Self {
		ReplyValue::SimpleString(s.into())
	}

	/// Create a bulk string value
	pub fn bulk_string(s: impl Into<Bytes>) -> Self {
		ReplyValue::BulkString(s.into())
	}

	/// Create an error value
	pub fn error(e: impl Into<Bytes>) -> Self {
		ReplyValue::Error(e.into())
	}

	/// Create an integer value
	pub fn integer(i: i64) -> Self {
		ReplyValue::Integer(i)
	}

	/// Create an array value from an iterator
	pub fn array(items: impl IntoIterator<Item = ReplyValue>) -> Self {
		ReplyValue::Array(items.into_iter().collect())
	}

	/// Create a nil value
	pub fn nil() -> Self {
		ReplyValue::Nil
	}
}

// Convenient From implementations
impl From<&str> for ReplyValue {
	fn from(s: &str) -> Self {
		ReplyValue::BulkString(Bytes::from(s.to_string()))
	}
}

impl From<String> for ReplyValue {
	fn from(s: String) -> Self {
		ReplyValue::BulkString(Bytes::from(s))
	}
}

impl From<&[u8]> for ReplyValue {
	fn from(b: &[u8]) -> Self {
		ReplyValue::BulkString(Bytes::copy_from_slice(b))
	}
}

impl From<Vec<u8>> for ReplyValue {
	fn from(v: Vec<u8>) -> Self {
		ReplyValue::BulkString(Bytes::from(v))
	}
}

impl From<i64> for ReplyValue {
	fn from(i: i64) -> Self {
		ReplyValue::Integer(i)
	}
}

impl From<i32> for ReplyValue {
	fn from(i: i32) -> Self {
		ReplyValue::Integer(i as i64)
	}
}

impl From<Bytes> for ReplyValue {
	fn from(b: Bytes) -> Self {
		ReplyValue::BulkString(b)
	}
}

impl<T: Into<ReplyValue>> From<Vec<T>> for ReplyValue {
	fn from(v: Vec<T>) -> Self {
		ReplyValue::Array(v.into_iter().map(|x| x.into()).collect())
	}
}

impl<T: Into<ReplyValue>> From<Option<T>> for ReplyValue {
	fn from(o: Option<T>) -> Self {
		match o {
			Some(v) => v.into(),
			None => ReplyValue::Nil,
		}
	}
}
