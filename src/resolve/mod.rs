//! Short-name resolution across stage namespaces.

use std::sync::Arc;

use crate::error::SmvError;
use crate::module::{ModuleDescriptor, ModuleRegistry};
use crate::stage::StageRegistry;

/// Resolves user-supplied module names to unique module identities.
///
/// The search runs in two levels. Within each stage, candidate FQNs are
/// generated by prefixing the name with successively shorter dotted suffixes
/// of the stage name, most specific first, ending with the bare name; the
/// first candidate registered anywhere wins for that stage. Across stages,
/// the distinct modules found must collapse to exactly one. The resolver
/// never guesses between stages: zero distinct matches is an error and so is
/// more than one.
pub struct ModuleResolver<'a> {
    registry: &'a ModuleRegistry,
    stages: &'a StageRegistry,
}

impl<'a> ModuleResolver<'a> {
    pub fn new(registry: &'a ModuleRegistry, stages: &'a StageRegistry) -> Self {
        Self { registry, stages }
    }

    /// Resolve `name`, short or fully qualified, to a unique module.
    pub fn resolve(&self, name: &str) -> Result<Arc<ModuleDescriptor>, SmvError> {
        let mut matched_stages: Vec<&str> = Vec::new();
        let mut distinct: Vec<&Arc<ModuleDescriptor>> = Vec::new();
        for stage in self.stages.stages() {
            let Some(module) = self.find_in_stage(stage.name(), name) else {
                continue;
            };
            matched_stages.push(stage.name());
            if !distinct.iter().any(|m| m.fqn() == module.fqn()) {
                distinct.push(module);
            }
        }
        match distinct.as_slice() {
            [] => Err(SmvError::ModuleNotFound {
                name: name.to_string(),
                stages: self.stages.stage_names(),
            }),
            [module] => Ok(Arc::clone(module)),
            _ => Err(SmvError::AmbiguousModule {
                name: name.to_string(),
                stages: matched_stages.iter().map(|s| s.to_string()).collect(),
            }),
        }
    }

    /// Search one stage. Existence is checked against the whole registry,
    /// not stage membership, so a module registered under a shorter prefix
    /// of the stage name (`b.c.Foo` while searching stage `a.b.c`) still
    /// resolves.
    fn find_in_stage(&self, stage_name: &str, name: &str) -> Option<&Arc<ModuleDescriptor>> {
        candidate_fqns(stage_name, name).into_iter().find_map(|fqn| self.registry.get(&fqn))
    }
}

/// Candidate FQNs for `name` within `stage_name`, most specific first.
///
/// For stage `s1.s2.s3` the candidates are `s1.s2.s3.name`, `s2.s3.name`,
/// `s3.name`, then bare `name`.
fn candidate_fqns(stage_name: &str, name: &str) -> Vec<String> {
    let segments: Vec<&str> = stage_name.split('.').filter(|s| !s.is_empty()).collect();
    let mut candidates = Vec::with_capacity(segments.len() + 1);
    for start in 0..segments.len() {
        candidates.push(format!("{}.{}", segments[start..].join("."), name));
    }
    candidates.push(name.to_string());
    candidates
}
