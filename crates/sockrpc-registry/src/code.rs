//! Numeric error code space shared across the public transport surface.
//!
//! Semantic errors detected before any side-effecting syscall occupy small
//! negative integers. Captured OS errors are shifted into a reserved band so
//! the two spaces never collide and the raw OS error number stays
//! recoverable.

/// A service name does not fit in a buffer.
pub const NAME_TOO_LONG: i32 = -1;
/// A service name contains invalid characters.
pub const NAME_INVALID: i32 = -2;
/// An argument to a transport operation is invalid.
pub const ARGUMENT_INVALID: i32 = -3;
/// Memory allocation failed.
pub const NO_MEMORY: i32 = -4;
/// A connection could not be established or was lost mid-call.
pub const CONNECTION_FAILED: i32 = -5;
/// A request named a method id the service does not implement.
pub const METHOD_NOT_FOUND: i32 = -6;

/// Offset applied to raw OS error numbers when captured into the code space.
pub const OS_ERROR_OFFSET: i32 = 1000;

/// Capture a raw OS error number into the reserved band.
pub fn capture_os(errno: i32) -> i32 {
    -(errno + OS_ERROR_OFFSET)
}

/// Recover the raw OS error number from a captured code, if it is one.
pub fn os_errno(code: i32) -> Option<i32> {
    if code < -OS_ERROR_OFFSET {
        Some(-code - OS_ERROR_OFFSET)
    } else {
        None
    }
}

/// Map any code in the space to a descriptive string.
pub fn describe(code: i32) -> String {
    match code {
        NAME_TOO_LONG => "service name is too long to fit in a buffer".to_string(),
        NAME_INVALID => "invalid characters in a service name".to_string(),
        ARGUMENT_INVALID => "invalid argument".to_string(),
        NO_MEMORY => "memory allocation failed".to_string(),
        CONNECTION_FAILED => "connection failed".to_string(),
        METHOD_NOT_FOUND => "method not found".to_string(),
        _ => match os_errno(code) {
            Some(errno) => std::io::Error::from_raw_os_error(errno).to_string(),
            None => "unknown error".to_string(),
        },
    }
}
