use std::io::{IoSlice, Read, Write};

use bytes::BytesMut;
use tracing::trace;

use crate::error::{Result, WireError};
use crate::header::{read_exact_or_closed, MessageHeader, HEADER_SIZE};

/// Builds one request or response and writes it in a single gather I/O.
///
/// Arguments are pushed in declared order; their position index is their
/// place in the segment list, and the header's size slots are filled as a
/// side effect of each push.
pub struct MessageBuilder {
    header: MessageHeader,
    segments: Vec<Vec<u8>>,
}

impl MessageBuilder {
    /// Start a message for `method`.
    pub fn new(method: u32) -> Self {
        Self {
            header: MessageHeader::new(method),
            segments: Vec::new(),
        }
    }

    /// Append a text argument: `len + 1` bytes including the terminating
    /// NUL, or a zero-size segment for `None`.
    pub fn push_text(&mut self, value: Option<&str>) -> Result<()> {
        match value {
            Some(text) => {
                let mut bytes = Vec::with_capacity(text.len() + 1);
                bytes.extend_from_slice(text.as_bytes());
                bytes.push(0);
                self.header.push_size(bytes.len())?;
                self.segments.push(bytes);
            }
            None => {
                self.header.push_size(0)?;
                self.segments.push(Vec::new());
            }
        }
        Ok(())
    }

    /// Append a fixed-width argument already in wire byte order.
    pub fn push_scalar(&mut self, bytes: &[u8]) -> Result<()> {
        self.header.push_size(bytes.len())?;
        self.segments.push(bytes.to_vec());
        Ok(())
    }

    pub fn header(&self) -> &MessageHeader {
        &self.header
    }

    /// Write the header and all argument segments as one scatter/gather
    /// write.
    ///
    /// A short write is an error; the call is not retried.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut head = BytesMut::with_capacity(HEADER_SIZE);
        self.header.encode(&mut head);

        let mut iov = Vec::with_capacity(1 + self.segments.len());
        iov.push(IoSlice::new(&head));
        for segment in &self.segments {
            if !segment.is_empty() {
                iov.push(IoSlice::new(segment));
            }
        }

        let expected = HEADER_SIZE + self.header.payload_size();
        let written = writer.write_vectored(&iov)?;
        if written != expected {
            return Err(WireError::ShortWrite { written, expected });
        }
        writer.flush()?;

        trace!(
            method = self.header.method(),
            argc = self.header.argc(),
            bytes = expected,
            "sent message"
        );
        Ok(())
    }
}

/// A fully received message: validated header plus one buffer per argument.
#[derive(Debug)]
pub struct Message {
    header: MessageHeader,
    args: Vec<Vec<u8>>,
}

impl Message {
    /// Read the payload segments for an already validated header.
    ///
    /// Each segment is allocated to exactly its declared size.
    pub fn read_payload<R: Read>(header: MessageHeader, reader: &mut R) -> Result<Self> {
        let mut args = Vec::with_capacity(header.argc());
        for index in 0..header.argc() {
            let mut buf = vec![0u8; header.size(index)];
            read_exact_or_closed(reader, &mut buf)?;
            args.push(buf);
        }

        trace!(
            method = header.method(),
            argc = header.argc(),
            bytes = header.payload_size(),
            "received message"
        );
        Ok(Self { header, args })
    }

    /// Read header and payload in sequence (the client response path).
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let header = MessageHeader::read_from(reader)?;
        Self::read_payload(header, reader)
    }

    pub fn header(&self) -> &MessageHeader {
        &self.header
    }

    pub fn method(&self) -> u32 {
        self.header.method()
    }

    /// Require an exact argument count.
    pub fn expect_argc(&self, argc: usize) -> Result<()> {
        if self.args.len() != argc {
            return Err(WireError::ArgumentCountMismatch {
                expected: argc,
                actual: self.args.len(),
            });
        }
        Ok(())
    }

    /// Decode the text argument at `index`.
    ///
    /// The final byte is forced to NUL before scanning, matching the
    /// declared-size allocation rule on the receiving side; a zero-size
    /// argument decodes to `None`.
    pub fn text(&self, index: usize) -> Result<Option<String>> {
        let bytes = self.arg(index)?;
        if bytes.is_empty() {
            return Ok(None);
        }

        let mut bytes = bytes.to_vec();
        let last = bytes.len() - 1;
        bytes[last] = 0;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(last);

        let text = std::str::from_utf8(&bytes[..end])
            .map_err(|_| WireError::InvalidText { index })?;
        Ok(Some(text.to_string()))
    }

    /// Copy the fixed-width argument at `index` into a local value.
    pub fn scalar<const N: usize>(&self, index: usize) -> Result<[u8; N]> {
        let bytes = self.arg(index)?;
        if bytes.len() != N {
            return Err(WireError::ArgumentSizeMismatch {
                index,
                size: bytes.len(),
                expected: N,
            });
        }
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    fn arg(&self, index: usize) -> Result<&[u8]> {
        self.args
            .get(index)
            .map(Vec::as_slice)
            .ok_or(WireError::ArgumentIndexOutOfRange {
                index,
                argc: self.args.len(),
            })
    }
}
