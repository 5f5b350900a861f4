use std::path::PathBuf;

use crate::code;

/// Errors from registry operations.
///
/// Two disjoint tiers: semantic errors detected before any side-effecting
/// syscall, and captured OS errors from syscalls that failed. Both project
/// into the numeric space of [`crate::code`] via [`RegistryError::code`].
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The service name exceeds [`crate::name::SERVICE_NAME_MAX`].
    #[error("service name too long ({len} bytes, max {max})")]
    NameTooLong { len: usize, max: usize },

    /// The service name contains a forbidden character.
    #[error("invalid service name: {reason}")]
    NameInvalid { reason: &'static str },

    /// A non-name argument to a transport operation is invalid.
    #[error("invalid argument: {0}")]
    ArgumentInvalid(&'static str),

    /// The constructed socket path does not fit `sockaddr_un.sun_path`.
    #[error("socket path too long ({len} bytes, max {max}): {path}")]
    PathTooLong {
        path: PathBuf,
        len: usize,
        max: usize,
    },

    /// A syscall failed; the raw OS error is preserved.
    #[error("{context}: {source}")]
    Os {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl RegistryError {
    /// Project into the shared numeric code space.
    pub fn code(&self) -> i32 {
        match self {
            Self::NameTooLong { .. } | Self::PathTooLong { .. } => code::NAME_TOO_LONG,
            Self::NameInvalid { .. } => code::NAME_INVALID,
            Self::ArgumentInvalid(_) => code::ARGUMENT_INVALID,
            Self::Os { source, .. } => source
                .raw_os_error()
                .map(code::capture_os)
                .unwrap_or(code::CONNECTION_FAILED),
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
