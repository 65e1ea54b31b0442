//! Manifest-driven module registration.

use std::path::Path;

use crate::config::props;
use crate::error::SmvError;
use crate::module::{ModuleKind, ModuleRegistry};

/// Populate a registry from a module manifest file.
///
/// The manifest reuses `.properties` syntax, one entry per module with the
/// FQN as key and the kind as value: `output` for runnable entry points,
/// `module` for intermediates. Declaration order becomes registry order. A
/// missing manifest yields an empty registry, matching the optional-file
/// policy of the config chain; a malformed entry or a duplicate FQN is
/// fatal.
pub fn load_manifest(path: &Path) -> Result<ModuleRegistry, SmvError> {
    let mut registry = ModuleRegistry::new();
    for (fqn, kind) in props::load_entries(path)? {
        let kind = match kind.as_str() {
            "output" => ModuleKind::Output,
            "module" => ModuleKind::Intermediate,
            other => {
                return Err(SmvError::InvalidManifest {
                    path: path.to_path_buf(),
                    reason: format!(
                        "module \"{fqn}\" has unknown kind \"{other}\" (expected \"output\" or \"module\")"
                    ),
                })
            }
        };
        registry.register(fqn, kind)?;
    }
    if !registry.is_empty() {
        tracing::debug!("registered {} modules from {}", registry.len(), path.display());
    }
    Ok(registry)
}
