//! Module identity and the process-wide module registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::error::SmvError;

pub mod manifest;

pub use manifest::load_manifest;

/// Whether a module is a directly runnable entry point or an intermediate
/// dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    Output,
    Intermediate,
}

/// A registered pipeline module, identified by its fully-qualified name.
///
/// The name is dot-separated, namespace first, leaf last
/// (`etl.accounts.AccountSummary`). Identity is the FQN string and nothing
/// else.
#[derive(Debug)]
pub struct ModuleDescriptor {
    fqn: String,
    kind: ModuleKind,
}

impl ModuleDescriptor {
    pub fn fqn(&self) -> &str {
        &self.fqn
    }

    pub fn kind(&self) -> ModuleKind {
        self.kind
    }

    pub fn is_output(&self) -> bool {
        self.kind == ModuleKind::Output
    }

    /// Namespace portion of the FQN: everything before the leaf name, or
    /// empty for an undotted name.
    pub fn namespace(&self) -> &str {
        self.fqn.rsplit_once('.').map(|(ns, _)| ns).unwrap_or("")
    }
}

/// Declaration-ordered registry of every module known to the application.
///
/// Populated once at startup, programmatically or from a manifest file, and
/// read-only afterwards. FQNs are unique process-wide; registering a
/// duplicate is an error, not a replacement.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: Vec<Arc<ModuleDescriptor>>,
    by_fqn: BTreeMap<String, usize>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, fqn: impl Into<String>, kind: ModuleKind) -> Result<(), SmvError> {
        let fqn = fqn.into();
        if self.by_fqn.contains_key(&fqn) {
            return Err(SmvError::DuplicateModule { fqn });
        }
        let descriptor = Arc::new(ModuleDescriptor { fqn: fqn.clone(), kind });
        self.by_fqn.insert(fqn, self.modules.len());
        self.modules.push(descriptor);
        Ok(())
    }

    /// Look up a module by exact fully-qualified name.
    pub fn get(&self, fqn: &str) -> Option<&Arc<ModuleDescriptor>> {
        self.by_fqn.get(fqn).map(|&idx| &self.modules[idx])
    }

    /// All modules in declaration order.
    pub fn modules(&self) -> &[Arc<ModuleDescriptor>] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_is_everything_before_the_leaf() {
        let mut registry = ModuleRegistry::new();
        registry.register("etl.accounts.Summary", ModuleKind::Output).expect("register");
        let module = registry.get("etl.accounts.Summary").expect("registered");
        assert_eq!(module.namespace(), "etl.accounts");
        assert!(module.is_output());
    }

    #[test]
    fn undotted_fqn_has_empty_namespace() {
        let mut registry = ModuleRegistry::new();
        registry.register("Standalone", ModuleKind::Intermediate).expect("register");
        let module = registry.get("Standalone").expect("registered");
        assert_eq!(module.namespace(), "");
    }

    #[test]
    fn rejects_duplicate_fqns() {
        let mut registry = ModuleRegistry::new();
        registry.register("a.Foo", ModuleKind::Output).expect("first");
        let err = registry.register("a.Foo", ModuleKind::Intermediate).expect_err("dup");
        assert!(matches!(err, SmvError::DuplicateModule { fqn } if fqn == "a.Foo"));
    }

    #[test]
    fn preserves_declaration_order() {
        let mut registry = ModuleRegistry::new();
        registry.register("z.Last", ModuleKind::Output).expect("register");
        registry.register("a.First", ModuleKind::Output).expect("register");
        let fqns: Vec<&str> = registry.modules().iter().map(|m| m.fqn()).collect();
        assert_eq!(fqns, ["z.Last", "a.First"]);
    }
}
