//! # resp-reader — incremental RESP reply decoder
//!
//! A pull-based decoder that turns a stream of RESP (Redis Serialization
//! Protocol) reply bytes into [`ReplyValue`] trees, one whole reply at a
//! time, no matter how the stream is chunked.
//!
//! ## Features
//!
//! - **Chunking invariant**: bytes may arrive one at a time or all at
//!   once; the decoded trees are byte-identical either way
//! - **No recursion**: nested arrays are driven by an explicit task stack
//!   and a fixed-depth slot arena, so decoding can suspend at any byte
//!   boundary and resume later
//! - **Pooled strings**: short bulk payloads can share allocation chunks
//!   instead of costing one allocation each
//!
//! ## Example
//!
//! ```rust
//! use resp_reader::ReadResult;
//! use resp_reader::Reader;
//!
//! let mut reader = Reader::new();
//! reader.feed(b"*2\r\n$5\r\nhello\r\n:42\r\n").unwrap();
//!
//! match reader.get_reply() {
//!     ReadResult::Complete(reply) => {
//!         let items = reply.into_vec().unwrap();
//!         assert_eq!(items[0].as_str(), Some("hello"));
//!         assert_eq!(items[1].as_integer(), Some(42));
//!     }
//!     other => panic!("expected a complete reply, got {other:?}"),
//! }
//! ```

mod arena;
mod buffer;
mod encode;
mod error;
mod pool;
mod reader;
mod utils;
mod value;

pub use arena::MAX_DEPTH;
pub use encode::ReplyEncoder;
pub use error::ProtocolError;
pub use error::ReadError;
pub use reader::ReadResult;
pub use reader::Reader;
pub use reader::ReaderOptions;
pub use value::ReplyValue;
