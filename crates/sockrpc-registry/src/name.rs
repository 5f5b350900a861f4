use crate::error::{RegistryError, Result};

/// Maximum service name length in bytes.
pub const SERVICE_NAME_MAX: usize = 255;

/// Validate a service name against the registry naming rules.
///
/// Empty names are allowed. A name must be at most [`SERVICE_NAME_MAX`]
/// bytes, must not start with `.`, and must not contain `/`. Violations are
/// reported with distinct errors, never silently truncated.
pub fn validate_service_name(name: &str) -> Result<()> {
    if name.len() > SERVICE_NAME_MAX {
        return Err(RegistryError::NameTooLong {
            len: name.len(),
            max: SERVICE_NAME_MAX,
        });
    }
    if name.starts_with('.') {
        return Err(RegistryError::NameInvalid {
            reason: "leading '.'",
        });
    }
    if name.contains('/') {
        return Err(RegistryError::NameInvalid {
            reason: "'/' in name",
        });
    }
    Ok(())
}
