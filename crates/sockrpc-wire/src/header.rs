use std::io::{ErrorKind, Read};

use bytes::{BufMut, BytesMut};

use crate::error::{Result, WireError};

/// Maximum number of arguments one message can carry.
pub const MAX_ARG_COUNT: usize = 8;

/// Maximum size of a single marshaled argument: 16 MiB.
pub const MAX_ARGUMENT_SIZE: usize = 16 * 1024 * 1024;

/// Wire size of the fixed message header.
pub const HEADER_SIZE: usize = 4 + 4 + 4 * MAX_ARG_COUNT + 4;

/// Fixed header carried by every request and response.
///
/// Layout, little-endian: method id (u32), argument count (u32),
/// [`MAX_ARG_COUNT`] size slots (u32 each), total payload size (u32).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    method: u32,
    argc: u32,
    argsz: [u32; MAX_ARG_COUNT],
    bufsz: u32,
}

impl MessageHeader {
    pub(crate) fn new(method: u32) -> Self {
        Self {
            method,
            argc: 0,
            argsz: [0; MAX_ARG_COUNT],
            bufsz: 0,
        }
    }

    /// Record the next argument's size, returning its position index.
    pub(crate) fn push_size(&mut self, size: usize) -> Result<usize> {
        let index = self.argc as usize;
        if index >= MAX_ARG_COUNT {
            return Err(WireError::TooManyArguments {
                argc: index + 1,
                max: MAX_ARG_COUNT,
            });
        }
        if size > MAX_ARGUMENT_SIZE {
            return Err(WireError::ArgumentTooLarge {
                index,
                size,
                max: MAX_ARGUMENT_SIZE,
            });
        }
        self.argsz[index] = size as u32;
        self.argc += 1;
        self.bufsz += size as u32;
        Ok(index)
    }

    pub fn method(&self) -> u32 {
        self.method
    }

    pub fn argc(&self) -> usize {
        self.argc as usize
    }

    /// Declared size of the argument at `index`; zero past the count.
    pub fn size(&self, index: usize) -> usize {
        self.argsz.get(index).copied().unwrap_or(0) as usize
    }

    /// Total declared payload size following the header.
    pub fn payload_size(&self) -> usize {
        self.bufsz as usize
    }

    /// Encode into the wire form.
    pub fn encode(&self, dst: &mut BytesMut) {
        dst.reserve(HEADER_SIZE);
        dst.put_u32_le(self.method);
        dst.put_u32_le(self.argc);
        for size in self.argsz {
            dst.put_u32_le(size);
        }
        dst.put_u32_le(self.bufsz);
    }

    /// Decode and validate the wire form.
    ///
    /// Every length the payload read will later trust is checked here:
    /// argument count within capacity, per-argument sizes within the cap,
    /// unused slots clear, and the declared total equal to the sum.
    pub fn decode(buf: &[u8; HEADER_SIZE]) -> Result<Self> {
        let word = |slot: usize| {
            u32::from_le_bytes(buf[slot * 4..slot * 4 + 4].try_into().unwrap())
        };

        let method = word(0);
        let argc = word(1);
        let mut argsz = [0u32; MAX_ARG_COUNT];
        for (index, slot) in argsz.iter_mut().enumerate() {
            *slot = word(2 + index);
        }
        let bufsz = word(2 + MAX_ARG_COUNT);

        if argc as usize > MAX_ARG_COUNT {
            return Err(WireError::TooManyArguments {
                argc: argc as usize,
                max: MAX_ARG_COUNT,
            });
        }
        let mut sum = 0u64;
        for (index, &size) in argsz.iter().enumerate() {
            if index < argc as usize {
                if size as usize > MAX_ARGUMENT_SIZE {
                    return Err(WireError::ArgumentTooLarge {
                        index,
                        size: size as usize,
                        max: MAX_ARGUMENT_SIZE,
                    });
                }
                sum += u64::from(size);
            } else if size != 0 {
                return Err(WireError::UnusedSizeSlot { index });
            }
        }
        if sum != u64::from(bufsz) {
            return Err(WireError::PayloadSizeMismatch { bufsz, sum });
        }

        Ok(Self {
            method,
            argc,
            argsz,
            bufsz,
        })
    }

    /// Read and validate one header from a stream.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buf = [0u8; HEADER_SIZE];
        read_exact_or_closed(reader, &mut buf)?;
        Self::decode(&buf)
    }

    /// Require a specific method id, for response validation.
    pub fn expect_method(&self, method: u32) -> Result<()> {
        if self.method != method {
            return Err(WireError::UnexpectedMethod {
                expected: method,
                actual: self.method,
            });
        }
        Ok(())
    }
}

/// `read_exact` with EOF reported as a closed connection.
pub(crate) fn read_exact_or_closed<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    match reader.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::UnexpectedEof => Err(WireError::ConnectionClosed),
        Err(err) => Err(WireError::Io(err)),
    }
}
