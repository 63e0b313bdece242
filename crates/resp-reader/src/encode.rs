//! Wire encoding for reply values.

use bytes::BufMut;
use bytes::Bytes;
use bytes::BytesMut;

use crate::utils::ARRAY;
use crate::utils::BULK_STRING;
use crate::utils::CRLF;
use crate::utils::ERROR;
use crate::utils::INTEGER;
use crate::utils::SIMPLE_STRING;
use crate::value::ReplyValue;

/// Trait for encoding reply values back into their wire representation.
pub trait ReplyEncoder {
	fn encode_to(&self, buf: &mut BytesMut);

	fn encode(&self) -> Bytes {
		let mut buf = BytesMut::new();
		self.encode_to(&mut buf);
		buf.freeze()
	}
}

impl ReplyEncoder for ReplyValue {
	fn encode_to(&self, buf: &mut BytesMut) {
		match self {
			ReplyValue::SimpleString(s) => encode_line(buf, SIMPLE_STRING, s),
			ReplyValue::Error(e) => encode_line(buf, ERROR, e),
			ReplyValue::Integer(i) => encode_integer(buf, *i),
			ReplyValue::BulkString(s) => encode_bulk_string(buf, s),
			ReplyValue::Array(arr) => encode_array(buf, arr),
			ReplyValue::Nil => encode_nil(buf),
		}
	}
}

#[inline]
fn encode_line(buf: &mut BytesMut, marker: u8, payload: &Bytes) {
	buf.put_u8(marker);
	buf.put_slice(payload);
	buf.put_slice(CRLF);
}

#[inline]
fn encode_integer(buf: &mut BytesMut, value: i64) {
	buf.put_u8(INTEGER);
	buf.put_slice(value.to_string().as_bytes());
	buf.put_slice(CRLF);
}

#[inline]
fn encode_length(buf: &mut BytesMut, marker: u8, length: usize) {
	buf.put_u8(marker);
	buf.put_slice(length.to_string().as_bytes());
	buf.put_slice(CRLF);
}

#[inline]
fn encode_bulk_string(buf: &mut BytesMut, payload: &Bytes) {
	encode_length(buf, BULK_STRING, payload.len());
	buf.put_slice(payload);
	buf.put_slice(CRLF);
}

fn encode_array(buf: &mut BytesMut, elements: &[ReplyValue]) {
	encode_length(buf, ARRAY, elements.len());
	for value in elements {
		value.encode_to(buf);
	}
}

/// RESP2 has no standalone null token; nil round-trips as a null bulk.
#[inline]
fn encode_nil(buf: &mut BytesMut) {
	buf.put_slice(b"$-1\r\n");
}
