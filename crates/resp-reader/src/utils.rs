//! Wire-level helpers and constants for the RESP reply grammar.

use crate::error::ProtocolError;

/// CRLF line terminator.
pub const CRLF: &[u8] = b"\r\n";

/// Type markers for RESP2 replies.
pub const SIMPLE_STRING: u8 = b'+';
pub const ERROR: u8 = b'-';
pub const INTEGER: u8 = b':';
pub const BULK_STRING: u8 = b'$';
pub const ARRAY: u8 = b'*';

/// Largest accepted bulk payload, matching the server-side
/// `proto-max-bulk-len` default of 512 MB.
pub const MAX_BULK_LEN: i64 = 512 * 1024 * 1024;

/// Largest accepted element count for a single array header.
pub const MAX_ARRAY_LEN: i64 = 1024 * 1024;

/// Find the position of the first CRLF in a byte slice.
#[inline]
pub fn find_crlf(buf: &[u8]) -> Option<usize> {
	let mut offset = 0;
	while let Some(i) = memchr::memchr(b'\r', &buf[offset..]) {
		let pos = offset + i;
		match buf.get(pos + 1) {
			Some(&b'\n') => return Some(pos),
			Some(_) => offset = pos + 1,
			None => return None,
		}
	}
	None
}

/// Peek a CRLF-terminated line at the start of `buf` without consuming it.
/// Returns the line content and the total span including the terminator.
#[inline]
pub fn peek_line(buf: &[u8]) -> Option<(&[u8], usize)> {
	find_crlf(buf).map(|pos| (&buf[..pos], pos + 2))
}

/// Parse a signed ASCII decimal from a line.
#[inline]
pub fn parse_integer(line: &[u8]) -> Result<i64, ProtocolError> {
	let s = std::str::from_utf8(line)
		.map_err(|_| ProtocolError::InvalidInteger(String::from_utf8_lossy(line).into_owned()))?;
	s.parse::<i64>()
		.map_err(|_| ProtocolError::InvalidInteger(s.to_string()))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_find_crlf() {
		assert_eq!(find_crlf(b"hello\r\n"), Some(5));
		assert_eq!(find_crlf(b"hello"), None);
		assert_eq!(find_crlf(b"\r\n"), Some(0));
		// A stray CR not followed by LF is ordinary line content.
		assert_eq!(find_crlf(b"a\rb\r\n"), Some(3));
		// A trailing CR might still become a terminator once LF arrives.
		assert_eq!(find_crlf(b"hello\r"), None);
	}

	#[test]
	fn test_peek_line() {
		let (line, span) = peek_line(b"hello\r\nworld").unwrap();
		assert_eq!(line, b"hello");
		assert_eq!(span, 7);
		assert!(peek_line(b"partial").is_none());
	}

	#[test]
	fn test_parse_integer() {
		assert_eq!(parse_integer(b"123").unwrap(), 123);
		assert_eq!(parse_integer(b"-456").unwrap(), -456);
		assert!(parse_integer(b"abc").is_err());
		assert!(parse_integer(b"").is_err());
		assert!(parse_integer(b"12a").is_err());
	}
}
