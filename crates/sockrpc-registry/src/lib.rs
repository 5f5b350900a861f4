//! Service name registry and Unix-socket transport for sockrpc.
//!
//! Resolves a (domain, service name, version) triple to a filesystem socket
//! path under a per-domain state directory, and owns the bind / connect /
//! accept / close lifecycle of the stream sockets living there.
//!
//! This is the lowest layer of sockrpc. Everything else builds on the
//! [`ServiceSocket`] and [`ServiceStream`] types provided here.

pub mod code;
pub mod error;
pub mod name;
pub mod socket;
pub mod statedir;
pub mod stream;

pub use error::{RegistryError, Result};
pub use name::{validate_service_name, SERVICE_NAME_MAX};
pub use socket::{bind, connect, ServiceSocket, LISTEN_BACKLOG};
pub use statedir::{statedir, Domain, SYSTEM_STATEDIR};
pub use stream::ServiceStream;
