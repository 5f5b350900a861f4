use sockrpc_registry::code;

/// Errors from encoding, decoding, or transmitting wire messages.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// More arguments than the header has size slots for.
    #[error("message carries {argc} arguments, max {max}")]
    TooManyArguments { argc: usize, max: usize },

    /// One marshaled argument exceeds the per-argument cap.
    #[error("argument {index} size {size} exceeds maximum {max}")]
    ArgumentTooLarge {
        index: usize,
        size: usize,
        max: usize,
    },

    /// The declared total does not match the per-argument sizes.
    #[error("declared payload size {bufsz} does not match argument sizes totaling {sum}")]
    PayloadSizeMismatch { bufsz: u32, sum: u64 },

    /// A size slot beyond the argument count is set.
    #[error("argument size slot {index} is set beyond the argument count")]
    UnusedSizeSlot { index: usize },

    /// The scatter write transmitted fewer bytes than declared.
    #[error("short write ({written} of {expected} bytes)")]
    ShortWrite { written: usize, expected: usize },

    /// The peer closed the connection before a complete message arrived.
    #[error("connection closed before a complete message was received")]
    ConnectionClosed,

    /// A request named a method id this service does not implement.
    #[error("method {0} not recognized by this service")]
    MethodNotFound(u32),

    /// A response header carried a different method id than the request.
    #[error("response method id {actual} does not match request method id {expected}")]
    UnexpectedMethod { expected: u32, actual: u32 },

    /// The message carries a different number of arguments than declared.
    #[error("expected {expected} arguments, message carries {actual}")]
    ArgumentCountMismatch { expected: usize, actual: usize },

    /// A positional accessor reached past the received arguments.
    #[error("argument {index} out of range for {argc} arguments")]
    ArgumentIndexOutOfRange { index: usize, argc: usize },

    /// A fixed-width argument arrived with the wrong size.
    #[error("argument {index} has size {size}, expected {expected}")]
    ArgumentSizeMismatch {
        index: usize,
        size: usize,
        expected: usize,
    },

    /// A text argument is not valid UTF-8.
    #[error("argument {index} is not valid UTF-8 text")]
    InvalidText { index: usize },

    /// An I/O error occurred while reading or writing a message.
    #[error("wire I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WireError {
    /// Project into the shared numeric code space.
    pub fn code(&self) -> i32 {
        match self {
            Self::MethodNotFound(_) => code::METHOD_NOT_FOUND,
            Self::ConnectionClosed | Self::ShortWrite { .. } => code::CONNECTION_FAILED,
            Self::Io(err) => err
                .raw_os_error()
                .map(code::capture_os)
                .unwrap_or(code::CONNECTION_FAILED),
            _ => code::ARGUMENT_INVALID,
        }
    }
}

pub type Result<T> = std::result::Result<T, WireError>;
