//! Incremental reply decoding: the token state machine, the value builder,
//! and the pull-based session façade.

use std::borrow::Cow;

use bytes::Bytes;
use log::debug;
use log::trace;

use crate::arena::MAX_DEPTH;
use crate::arena::ROOT_SLOT;
use crate::arena::SlotArena;
use crate::buffer::IntakeBuffer;
use crate::error::ProtocolError;
use crate::error::ReadError;
use crate::pool::BufferPool;
use crate::utils;
use crate::utils::ARRAY;
use crate::utils::BULK_STRING;
use crate::utils::CRLF;
use crate::utils::ERROR;
use crate::utils::INTEGER;
use crate::utils::MAX_ARRAY_LEN;
use crate::utils::MAX_BULK_LEN;
use crate::utils::SIMPLE_STRING;
use crate::utils::peek_line;
use crate::value::ReplyValue;

/// Outcome of a [`Reader::get_reply`] call.
#[derive(Debug)]
pub enum ReadResult {
	/// A whole reply was decoded.
	Complete(ReplyValue),
	/// Not enough bytes are buffered for the next token; feed more and
	/// call again.
	Incomplete,
	/// Decoding failed. The reader is terminal until [`Reader::reset`].
	Error(ReadError),
}

/// Configuration resolved once when the reader is built.
#[derive(Debug, Clone)]
pub struct ReaderOptions {
	/// Surface string payloads as the raw bytes received instead of
	/// lossily decoded UTF-8 text. Parsing is unaffected either way.
	pub return_buffers: bool,
	/// Pack short raw-mode payloads into shared chunks instead of one
	/// allocation per string. Strictly an optimization; decoded content
	/// is identical with it disabled.
	pub use_buffer_pool: bool,
}

impl Default for ReaderOptions {
	fn default() -> Self {
		Self {
			return_buffers: false,
			use_buffer_pool: true,
		}
	}
}

/// One in-progress array production.
#[derive(Debug)]
struct ParseTask {
	/// Declared element count.
	expected: usize,
	/// Elements delivered so far.
	filled: usize,
	/// Arena slot holding this task's array. The enclosing array, if any,
	/// sits at `slot - 1`.
	slot: usize,
}

/// What one `consume_one` call did.
enum Step {
	/// Recognized and consumed exactly one token.
	Token,
	/// The current token is not wholly buffered; nothing was consumed.
	NeedMore,
}

/// An incremental reply decoder.
///
/// Bytes go in through [`Reader::feed`]; decoded values come out of
/// [`Reader::get_reply`], strictly in the order their terminating bytes
/// were fed. Decoding suspends at any byte boundary and resumes on the
/// next call, so how the stream is chunked never affects the decoded
/// result.
///
/// A `Reader` is one mutable cursor over buffered stream state. Confine it
/// to a single logical consumer, or wrap it in external mutual exclusion.
pub struct Reader {
	intake: IntakeBuffer,
	stack: Vec<ParseTask>,
	arena: SlotArena,
	pool: BufferPool,
	options: ReaderOptions,
	error: Option<ReadError>,
}

impl Default for Reader {
	fn default() -> Self {
		Self::new()
	}
}

impl Reader {
	pub fn new() -> Self {
		Self::with_options(ReaderOptions::default())
	}

	pub fn with_options(options: ReaderOptions) -> Self {
		Self {
			intake: IntakeBuffer::new(),
			stack: Vec::new(),
			arena: SlotArena::new(),
			pool: BufferPool::new(),
			options,
			error: None,
		}
	}

	/// Append stream bytes to the intake buffer.
	///
	/// No decoding happens here; replies are decoded lazily by
	/// [`Reader::get_reply`]. Fails only when the reader is already
	/// terminal, in which case the sticky error is surfaced again.
	pub fn feed(&mut self, bytes: &[u8]) -> Result<(), ReadError> {
		if let Some(error) = &self.error {
			return Err(error.clone());
		}
		self.intake.append(bytes);
		trace!("fed {} bytes ({} unread)", bytes.len(), self.intake.unread());
		Ok(())
	}

	/// Decode and return the next whole reply, if the buffered bytes
	/// contain one.
	///
	/// On [`ReadResult::Incomplete`] all in-progress state is left
	/// untouched, ready to resume after more [`Reader::feed`]. On
	/// [`ReadResult::Error`] the reader becomes terminal: in-progress
	/// values and buffered bytes are released immediately, and every
	/// later call surfaces the same error until [`Reader::reset`].
	pub fn get_reply(&mut self) -> ReadResult {
		if let Some(error) = &self.error {
			return ReadResult::Error(error.clone());
		}
		loop {
			match self.consume_one() {
				Ok(Step::Token) => {
					if self.stack.is_empty() {
						if let Some(value) = self.arena.take_root() {
							debug_assert!(self.arena.is_empty());
							self.intake.compact();
							trace!("decoded one reply");
							return ReadResult::Complete(value);
						}
					}
				}
				Ok(Step::NeedMore) => return ReadResult::Incomplete,
				Err(error) => return ReadResult::Error(self.fail(error)),
			}
		}
	}

	/// Return the reader to its freshly constructed state, dropping any
	/// sticky error, buffered bytes, and in-progress values. The options
	/// resolved at construction are retained.
	pub fn reset(&mut self) {
		self.intake.clear();
		self.stack.clear();
		self.arena.clear();
		self.pool = BufferPool::new();
		self.error = None;
	}

	/// Transition to the terminal error state, releasing every
	/// in-progress value exactly once.
	fn fail(&mut self, error: ReadError) -> ReadError {
		debug!("reply stream failed: {error}");
		self.stack.clear();
		self.arena.clear();
		self.intake.clear();
		self.error = Some(error.clone());
		error
	}

	/// Recognize exactly one grammar token from the buffered bytes.
	///
	/// When the current token is incomplete this consumes nothing and
	/// mutates no arena or task state, so a later call with more bytes
	/// resumes from the identical position.
	fn consume_one(&mut self) -> Result<Step, ReadError> {
		let Some(&tag) = self.intake.remaining().first() else {
			return Ok(Step::NeedMore);
		};
		match tag {
			SIMPLE_STRING | ERROR => self.parse_line_string(tag),
			INTEGER => self.parse_integer_reply(),
			BULK_STRING => self.parse_bulk_string(),
			ARRAY => self.parse_array_header(),
			other => Err(ProtocolError::InvalidTypeMarker(other as char).into()),
		}
	}

	fn parse_line_string(&mut self, tag: u8) -> Result<Step, ReadError> {
		let Some((line, span)) = peek_line(&self.intake.remaining()[1..]) else {
			return Ok(Step::NeedMore);
		};
		let payload = materialize(&self.options, &mut self.pool, line);
		let value = if tag == ERROR {
			ReplyValue::Error(payload)
		} else {
			ReplyValue::SimpleString(payload)
		};
		self.intake.consume(1 + span);
		self.deliver(value);
		Ok(Step::Token)
	}

	fn parse_integer_reply(&mut self) -> Result<Step, ReadError> {
		let Some((line, span)) = peek_line(&self.intake.remaining()[1..]) else {
			return Ok(Step::NeedMore);
		};
		let value = utils::parse_integer(line)?;
		self.intake.consume(1 + span);
		self.deliver(ReplyValue::Integer(value));
		Ok(Step::Token)
	}

	fn parse_bulk_string(&mut self) -> Result<Step, ReadError> {
		let input = self.intake.remaining();
		let Some((line, span)) = peek_line(&input[1..]) else {
			return Ok(Step::NeedMore);
		};
		let declared = utils::parse_integer(line)?;

		if declared == -1 {
			self.intake.consume(1 + span);
			self.deliver(ReplyValue::Nil);
			return Ok(Step::Token);
		}
		if declared < -1 || declared > MAX_BULK_LEN {
			return Err(ProtocolError::InvalidBulkLength(declared).into());
		}

		let len = declared as usize;
		let header = 1 + span;
		let needed = header + len + 2;
		if input.len() < needed {
			return Ok(Step::NeedMore);
		}
		if &input[header + len..needed] != CRLF {
			return Err(ProtocolError::MissingTerminator.into());
		}

		let payload = materialize(&self.options, &mut self.pool, &input[header..header + len]);
		self.intake.consume(needed);
		self.deliver(ReplyValue::BulkString(payload));
		Ok(Step::Token)
	}

	fn parse_array_header(&mut self) -> Result<Step, ReadError> {
		let Some((line, span)) = peek_line(&self.intake.remaining()[1..]) else {
			return Ok(Step::NeedMore);
		};
		let declared = utils::parse_integer(line)?;

		if declared < -1 || declared > MAX_ARRAY_LEN {
			return Err(ProtocolError::InvalidArrayLength(declared).into());
		}
		if declared > 0 && self.stack.len() + 1 > MAX_DEPTH {
			return Err(ReadError::DepthExceeded {
				depth: self.stack.len() + 1,
				max: MAX_DEPTH,
			});
		}

		self.intake.consume(1 + span);
		match declared {
			-1 => self.deliver(ReplyValue::Nil),
			0 => self.deliver(ReplyValue::Array(Vec::new())),
			_ => {
				let expected = declared as usize;
				let slot = self.stack.len() + 1;
				self.arena
					.park(slot, ReplyValue::Array(Vec::with_capacity(expected)));
				self.stack.push(ParseTask {
					expected,
					filled: 0,
					slot,
				});
			}
		}
		Ok(Step::Token)
	}

	/// Hand a completed value to the builder.
	///
	/// The value is appended to the enclosing in-progress array, or parked
	/// in the root slot when no task encloses it. Each array that reaches
	/// its declared element count is popped and delivered to its own
	/// parent in turn.
	fn deliver(&mut self, value: ReplyValue) {
		let mut value = value;
		loop {
			let Some(task) = self.stack.last_mut() else {
				self.arena.park(ROOT_SLOT, value);
				return;
			};
			self.arena.push_element(task.slot, value);
			task.filled += 1;
			if task.filled < task.expected {
				return;
			}
			let slot = task.slot;
			self.stack.pop();
			value = match self.arena.take(slot) {
				Some(completed) => completed,
				None => unreachable!("completed task slot {slot} is empty"),
			};
		}
	}
}

/// Build the byte payload for a string value according to the session's
/// representation mode. Raw mode hands short payloads to the pool; text
/// mode decodes lossily so consumers always observe valid UTF-8.
fn materialize(options: &ReaderOptions, pool: &mut BufferPool, src: &[u8]) -> Bytes {
	if options.return_buffers {
		if options.use_buffer_pool {
			pool.materialize(src)
		} else {
			Bytes::copy_from_slice(src)
		}
	} else {
		match String::from_utf8_lossy(src) {
			Cow::Borrowed(_) => Bytes::copy_from_slice(src),
			Cow::Owned(owned) => Bytes::from(owned),
		}
	}
}
