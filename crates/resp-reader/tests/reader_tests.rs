//! Integration tests for the reply reader

use bytes::Bytes;
use resp_reader::MAX_DEPTH;
use resp_reader::ProtocolError;
use resp_reader::ReadError;
use resp_reader::ReadResult;
use resp_reader::Reader;
use resp_reader::ReaderOptions;
use resp_reader::ReplyValue;
use rstest::rstest;

/// Decode exactly one reply from a fully buffered byte sequence.
fn decode_one(bytes: &[u8]) -> ReplyValue {
    let mut reader = Reader::new();
    reader.feed(bytes).unwrap();
    match reader.get_reply() {
        ReadResult::Complete(value) => value,
        other => panic!("expected a complete reply, got {other:?}"),
    }
}

fn decode_error(bytes: &[u8]) -> ReadError {
    let mut reader = Reader::new();
    reader.feed(bytes).unwrap();
    match reader.get_reply() {
        ReadResult::Error(error) => error,
        other => panic!("expected an error, got {other:?}"),
    }
}

#[test]
fn test_decode_simple_string() {
    assert_eq!(
        decode_one(b"+OK\r\n"),
        ReplyValue::SimpleString(Bytes::from("OK"))
    );
}

#[test]
fn test_decode_error_reply() {
    let value = decode_one(b"-ERR unknown command\r\n");
    assert!(value.is_error());
    assert_eq!(value.as_str(), Some("ERR unknown command"));
}

#[rstest]
#[case(b":0\r\n", 0)]
#[case(b":1000\r\n", 1000)]
#[case(b":-42\r\n", -42)]
#[case(b":9223372036854775807\r\n", i64::MAX)]
fn test_decode_integer(#[case] input: &[u8], #[case] expected: i64) {
    assert_eq!(decode_one(input), ReplyValue::Integer(expected));
}

#[test]
fn test_decode_bulk_string() {
    assert_eq!(
        decode_one(b"$6\r\nfoobar\r\n"),
        ReplyValue::BulkString(Bytes::from("foobar"))
    );
}

#[test]
fn test_bulk_string_may_contain_terminator_bytes() {
    assert_eq!(
        decode_one(b"$12\r\nhello\r\nworld\r\n"),
        ReplyValue::BulkString(Bytes::from("hello\r\nworld"))
    );
}

#[rstest]
#[case(b"$-1\r\n", ReplyValue::Nil)]
#[case(b"*-1\r\n", ReplyValue::Nil)]
#[case(b"*0\r\n", ReplyValue::Array(vec![]))]
#[case(b"$0\r\n\r\n", ReplyValue::BulkString(Bytes::new()))]
fn test_nil_and_empty_are_distinct(#[case] input: &[u8], #[case] expected: ReplyValue) {
    assert_eq!(decode_one(input), expected);
}

#[test]
fn test_order_preservation() {
    assert_eq!(
        decode_one(b"*3\r\n:1\r\n:2\r\n:3\r\n"),
        ReplyValue::Array(vec![
            ReplyValue::Integer(1),
            ReplyValue::Integer(2),
            ReplyValue::Integer(3),
        ])
    );
}

#[test]
fn test_nested_arrays() {
    assert_eq!(
        decode_one(b"*2\r\n*2\r\n:1\r\n:2\r\n*1\r\n+ok\r\n"),
        ReplyValue::Array(vec![
            ReplyValue::Array(vec![ReplyValue::Integer(1), ReplyValue::Integer(2)]),
            ReplyValue::Array(vec![ReplyValue::SimpleString(Bytes::from("ok"))]),
        ])
    );
}

#[test]
fn test_nil_counts_toward_parent_fill() {
    assert_eq!(
        decode_one(b"*3\r\n:1\r\n$-1\r\n:3\r\n"),
        ReplyValue::Array(vec![
            ReplyValue::Integer(1),
            ReplyValue::Nil,
            ReplyValue::Integer(3),
        ])
    );
}

#[test]
fn test_mixed_types_in_one_array() {
    assert_eq!(
        decode_one(b"*5\r\n+status\r\n-oops\r\n:7\r\n$3\r\nraw\r\n*-1\r\n"),
        ReplyValue::Array(vec![
            ReplyValue::SimpleString(Bytes::from("status")),
            ReplyValue::Error(Bytes::from("oops")),
            ReplyValue::Integer(7),
            ReplyValue::BulkString(Bytes::from("raw")),
            ReplyValue::Nil,
        ])
    );
}

#[test]
fn test_pipelined_replies_drain_in_fifo_order() {
    let mut reader = Reader::new();
    reader.feed(b"+one\r\n+two\r\n:3\r\n").unwrap();

    for expected in [
        ReplyValue::SimpleString(Bytes::from("one")),
        ReplyValue::SimpleString(Bytes::from("two")),
        ReplyValue::Integer(3),
    ] {
        match reader.get_reply() {
            ReadResult::Complete(value) => assert_eq!(value, expected),
            other => panic!("expected {expected:?}, got {other:?}"),
        }
    }
    assert!(matches!(reader.get_reply(), ReadResult::Incomplete));
}

/// An array nested to exactly the supported depth decodes; one level
/// deeper is refused with the dedicated error kind.
#[test]
fn test_depth_bound() {
    let mut at_limit = Vec::new();
    for _ in 0..MAX_DEPTH {
        at_limit.extend_from_slice(b"*1\r\n");
    }
    at_limit.extend_from_slice(b":7\r\n");

    let mut value = decode_one(&at_limit);
    for _ in 0..MAX_DEPTH {
        let mut items = value.into_vec().expect("nested array");
        assert_eq!(items.len(), 1);
        value = items.pop().unwrap();
    }
    assert_eq!(value, ReplyValue::Integer(7));

    let mut too_deep = Vec::new();
    for _ in 0..=MAX_DEPTH {
        too_deep.extend_from_slice(b"*1\r\n");
    }
    assert_eq!(
        decode_error(&too_deep),
        ReadError::DepthExceeded {
            depth: MAX_DEPTH + 1,
            max: MAX_DEPTH,
        }
    );
}

#[rstest]
#[case(b"!3\r\nfoo\r\n", ProtocolError::InvalidTypeMarker('!'))]
#[case(b":abc\r\n", ProtocolError::InvalidInteger("abc".to_string()))]
#[case(b"$abc\r\n", ProtocolError::InvalidInteger("abc".to_string()))]
#[case(b"$-2\r\n", ProtocolError::InvalidBulkLength(-2))]
#[case(b"*-2\r\n", ProtocolError::InvalidArrayLength(-2))]
#[case(b"$3\r\nabcX\r\n", ProtocolError::MissingTerminator)]
fn test_malformed_input_is_fatal(#[case] input: &[u8], #[case] expected: ProtocolError) {
    assert_eq!(decode_error(input), ReadError::Protocol(expected));
}

#[test]
fn test_terminal_after_error() {
    let mut reader = Reader::new();
    reader.feed(b"*2\r\n").unwrap();
    reader.feed(b"!bad\r\n").unwrap();

    let first = match reader.get_reply() {
        ReadResult::Error(error) => error,
        other => panic!("expected an error, got {other:?}"),
    };
    assert!(matches!(first, ReadError::Protocol(_)));

    // Every later call surfaces the same sticky error, never a fresh
    // decode attempt.
    assert_eq!(reader.feed(b"+OK\r\n"), Err(first.clone()));
    match reader.get_reply() {
        ReadResult::Error(error) => assert_eq!(error, first),
        other => panic!("expected the sticky error, got {other:?}"),
    }
}

#[test]
fn test_reset_rearms_a_terminal_reader() {
    let mut reader = Reader::new();
    reader.feed(b"!bad\r\n").unwrap();
    assert!(matches!(reader.get_reply(), ReadResult::Error(_)));

    reader.reset();
    reader.feed(b"+OK\r\n").unwrap();
    match reader.get_reply() {
        ReadResult::Complete(value) => assert_eq!(value.as_str(), Some("OK")),
        other => panic!("expected a complete reply, got {other:?}"),
    }
}

#[test]
fn test_return_buffers_mode_preserves_invalid_utf8() {
    let mut reader = Reader::with_options(ReaderOptions {
        return_buffers: true,
        ..ReaderOptions::default()
    });
    reader.feed(b"$2\r\n\xff\xfe\r\n").unwrap();
    match reader.get_reply() {
        ReadResult::Complete(value) => {
            assert_eq!(value.as_bytes().unwrap().as_ref(), &[0xff, 0xfe]);
        }
        other => panic!("expected a complete reply, got {other:?}"),
    }
}

#[test]
fn test_text_mode_decodes_lossily() {
    let value = decode_one(b"$2\r\n\xff\xfe\r\n");
    assert_eq!(value.as_str(), Some("\u{fffd}\u{fffd}"));
}

/// Decoding many short bulk strings with pooling on and off yields
/// identical trees; the pool is invisible in everything but allocations.
#[test]
fn test_pool_transparency() {
    let mut stream = Vec::new();
    for i in 0..10_000 {
        stream.extend_from_slice(format!("$5\r\nv{i:04}\r\n").as_bytes());
    }

    let drain = |use_buffer_pool: bool| -> Vec<ReplyValue> {
        let mut reader = Reader::with_options(ReaderOptions {
            return_buffers: true,
            use_buffer_pool,
        });
        reader.feed(&stream).unwrap();
        let mut values = Vec::new();
        loop {
            match reader.get_reply() {
                ReadResult::Complete(value) => values.push(value),
                ReadResult::Incomplete => return values,
                ReadResult::Error(error) => panic!("unexpected error: {error}"),
            }
        }
    };

    let pooled = drain(true);
    let unpooled = drain(false);
    assert_eq!(pooled.len(), 10_000);
    assert_eq!(pooled, unpooled);
    assert_eq!(pooled[9_999], ReplyValue::BulkString(Bytes::from("v9999")));
}
