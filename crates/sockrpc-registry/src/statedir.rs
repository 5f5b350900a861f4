use std::os::unix::fs::DirBuilderExt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{RegistryError, Result};

/// Scope of a service's namespace.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Domain {
    /// System-wide services under a fixed state directory.
    System,
    /// Per-user services under `$HOME/.ipc`.
    User,
}

impl Domain {
    pub fn as_str(self) -> &'static str {
        match self {
            Domain::System => "system",
            Domain::User => "user",
        }
    }
}

impl std::str::FromStr for Domain {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "system" => Ok(Domain::System),
            "user" => Ok(Domain::User),
            _ => Err(RegistryError::ArgumentInvalid("unsupported domain")),
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed state directory for [`Domain::System`].
pub const SYSTEM_STATEDIR: &str = "/var/run/ipc";

const STATEDIR_MODE: u32 = 0o755;

/// Resolve the state directory for a domain, creating it when appropriate.
///
/// SYSTEM resolves to [`SYSTEM_STATEDIR`] and is only created when running
/// as root; an unprivileged process expects it to pre-exist and surfaces the
/// OS error from the subsequent bind or connect if it does not. USER
/// resolves to `$HOME/.ipc` and is created on demand.
pub fn statedir(domain: Domain) -> Result<PathBuf> {
    match domain {
        Domain::System => {
            let dir = PathBuf::from(SYSTEM_STATEDIR);
            // SAFETY: getuid(2) cannot fail and touches no memory.
            if unsafe { libc::getuid() } == 0 {
                setup_directories(&dir)?;
            }
            Ok(dir)
        }
        Domain::User => {
            let home = std::env::var_os("HOME")
                .ok_or(RegistryError::ArgumentInvalid("HOME is not set"))?;
            let dir = PathBuf::from(home).join(".ipc");
            setup_directories(&dir)?;
            Ok(dir)
        }
    }
}

/// Create the state directory and its `services/` and `pidfiles/` children.
///
/// Creation is idempotent: an already existing directory is success, so
/// concurrent first-time setup from multiple processes cannot race into a
/// hard error.
fn setup_directories(statedir: &Path) -> Result<()> {
    mkdir_p(statedir)?;
    mkdir_p(&statedir.join("services"))?;
    // Reserved for pidfile bookkeeping.
    mkdir_p(&statedir.join("pidfiles"))?;
    Ok(())
}

fn mkdir_p(path: &Path) -> Result<()> {
    let mut builder = std::fs::DirBuilder::new();
    builder.mode(STATEDIR_MODE);
    match builder.create(path) {
        Ok(()) => {
            debug!(?path, "created registry directory");
            Ok(())
        }
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => Ok(()),
        Err(err) => Err(RegistryError::Os {
            context: "mkdir(2)",
            source: err,
        }),
    }
}

/// Socket path for a service within a state directory:
/// `statedir/services/<name>,<version>`.
pub(crate) fn service_path(statedir: &Path, name: &str, version: u32) -> PathBuf {
    statedir.join("services").join(format!("{name},{version}"))
}
