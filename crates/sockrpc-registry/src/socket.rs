use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{RegistryError, Result};
use crate::name::validate_service_name;
use crate::statedir::{service_path, statedir, Domain};
use crate::stream::ServiceStream;

/// Listen backlog for bound service sockets.
pub const LISTEN_BACKLOG: i32 = 1024;

/// A service socket bound into the registry namespace.
///
/// Holds the listening descriptor and the filesystem node it owns. Closing
/// (or dropping) unlinks the node so the name can be bound again.
#[derive(Debug)]
pub struct ServiceSocket {
    listener: UnixListener,
    path: PathBuf,
    cleanup_on_drop: bool,
}

/// Bind a stream socket for `name` at `version` within `domain` and start
/// listening with [`LISTEN_BACKLOG`].
///
/// The name is validated and the socket path checked against the platform's
/// `sockaddr_un` capacity before any socket syscall runs.
pub fn bind(domain: Domain, name: &str, version: u32) -> Result<ServiceSocket> {
    validate_service_name(name)?;
    let dir = statedir(domain)?;
    let path = service_path(&dir, name, version);
    let addr = sockaddr_for(&path)?;

    let fd = new_stream_socket()?;
    // SAFETY: `fd` is an open socket owned here and `addr` is a fully
    // initialized sockaddr_un with a NUL-terminated path.
    let rc = unsafe {
        libc::bind(
            fd.as_raw_fd(),
            (&addr as *const libc::sockaddr_un).cast::<libc::sockaddr>(),
            sun_len(&addr),
        )
    };
    if rc < 0 {
        return Err(os_error("bind(2)"));
    }

    // SAFETY: `fd` is a bound stream socket.
    let rc = unsafe { libc::listen(fd.as_raw_fd(), LISTEN_BACKLOG) };
    if rc < 0 {
        return Err(os_error("listen(2)"));
    }

    info!(name, version, path = %path.display(), "bound service socket");

    Ok(ServiceSocket {
        listener: UnixListener::from(fd),
        path,
        cleanup_on_drop: true,
    })
}

/// Connect to the service bound as `name` at `version` within `domain`.
pub fn connect(domain: Domain, name: &str, version: u32) -> Result<ServiceStream> {
    validate_service_name(name)?;
    let dir = statedir(domain)?;
    let path = service_path(&dir, name, version);
    // Same deterministic length check as bind, before the syscall.
    let _ = sockaddr_for(&path)?;

    let stream = UnixStream::connect(&path).map_err(|source| RegistryError::Os {
        context: "connect(2)",
        source,
    })?;

    debug!(name, version, "connected to service");

    Ok(ServiceStream::from_unix(stream))
}

impl ServiceSocket {
    /// Accept one peer connection (blocking).
    pub fn accept(&self) -> Result<ServiceStream> {
        let (stream, _addr) = self.listener.accept().map_err(|source| RegistryError::Os {
            context: "accept(2)",
            source,
        })?;
        debug!("accepted peer connection");
        Ok(ServiceStream::from_unix(stream))
    }

    /// The filesystem path this socket is bound to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the socket and unlink its filesystem node.
    ///
    /// The bound path is recovered from the descriptor rather than trusted
    /// from construction; a socket with no bound pathname closes cleanly and
    /// an already missing node is not an error.
    pub fn close(mut self) -> Result<()> {
        self.cleanup_on_drop = false;
        let bound = self.listener.local_addr().map_err(|source| RegistryError::Os {
            context: "getsockname(2)",
            source,
        })?;
        if let Some(path) = bound.as_pathname() {
            match std::fs::remove_file(path) {
                Ok(()) => debug!(?path, "unlinked service socket"),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(RegistryError::Os {
                        context: "unlink(2)",
                        source,
                    })
                }
            }
        }
        Ok(())
    }
}

impl Drop for ServiceSocket {
    fn drop(&mut self) {
        if self.cleanup_on_drop {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

fn new_stream_socket() -> Result<OwnedFd> {
    // SAFETY: socket(2) allocates a new descriptor; no memory is shared.
    let raw = unsafe { libc::socket(libc::AF_UNIX, libc::SOCK_STREAM, 0) };
    if raw < 0 {
        return Err(os_error("socket(2)"));
    }
    // SAFETY: `raw` is a freshly opened descriptor owned by no one else.
    Ok(unsafe { OwnedFd::from_raw_fd(raw) })
}

fn sockaddr_for(path: &Path) -> Result<libc::sockaddr_un> {
    let bytes = path.as_os_str().as_bytes();
    // SAFETY: sockaddr_un is a plain C struct; all-zero is a valid value.
    let mut addr: libc::sockaddr_un = unsafe { std::mem::zeroed() };

    let capacity = addr.sun_path.len() - 1;
    if bytes.len() > capacity {
        return Err(RegistryError::PathTooLong {
            path: path.to_path_buf(),
            len: bytes.len(),
            max: capacity,
        });
    }

    addr.sun_family = libc::AF_UNIX as libc::sa_family_t;
    for (dst, src) in addr.sun_path.iter_mut().zip(bytes) {
        *dst = *src as libc::c_char;
    }
    Ok(addr)
}

fn sun_len(addr: &libc::sockaddr_un) -> libc::socklen_t {
    let path_len = addr
        .sun_path
        .iter()
        .position(|&c| c == 0)
        .unwrap_or(addr.sun_path.len());
    let offset = std::mem::size_of::<libc::sockaddr_un>() - addr.sun_path.len();
    (offset + path_len + 1) as libc::socklen_t
}

fn os_error(context: &'static str) -> RegistryError {
    RegistryError::Os {
        context,
        source: std::io::Error::last_os_error(),
    }
}
