//! Fixed-header message framing and argument marshaling for sockrpc.
//!
//! Every request and response starts with a fixed 44-byte header: method id,
//! argument count, one size slot per argument, total payload size. The sizes
//! travel ahead of the payload so each side allocates exact buffers without
//! a streaming parser. Argument segments follow the header in declared
//! order and are written as one scatter/gather operation.
//!
//! Two argument kinds exist on the wire:
//! - text: NUL-terminated bytes, `len + 1` on the wire, zero bytes when
//!   absent
//! - fixed-width values: scalars in little-endian byte order, by-value
//!   aggregates as raw bytes

pub mod error;
pub mod header;
pub mod message;

pub use error::{Result, WireError};
pub use header::{MessageHeader, HEADER_SIZE, MAX_ARGUMENT_SIZE, MAX_ARG_COUNT};
pub use message::{Message, MessageBuilder};
