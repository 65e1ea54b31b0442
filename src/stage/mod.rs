//! Stage namespaces and the stage registry.

use std::sync::Arc;

use crate::config::{EffectiveConfig, STAGES_KEY};
use crate::error::SmvError;
use crate::module::{ModuleDescriptor, ModuleRegistry};

/// A namespace grouping of modules, identified by its dotted name.
#[derive(Debug)]
pub struct Stage {
    name: String,
    modules: Vec<Arc<ModuleDescriptor>>,
}

impl Stage {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member modules in declaration order.
    pub fn modules(&self) -> &[Arc<ModuleDescriptor>] {
        &self.modules
    }

    /// Member modules flagged as output, declaration order preserved.
    pub fn output_modules(&self) -> Vec<Arc<ModuleDescriptor>> {
        self.modules.iter().filter(|m| m.is_output()).cloned().collect()
    }
}

/// Whether `namespace` sits inside the stage named `stage_name`.
///
/// Containment is by dot-separated segments, never by string prefix: stage
/// `a.b` contains namespaces `a.b` and `a.b.input`, but not `a.bc`.
fn namespace_within(namespace: &str, stage_name: &str) -> bool {
    if namespace == stage_name {
        return true;
    }
    match namespace.strip_prefix(stage_name) {
        Some(rest) => rest.starts_with('.'),
        None => false,
    }
}

/// The application's stages in configuration order.
///
/// Derived once from `smv.stages` and the module registry: each module is
/// assigned to the most specific stage whose name contains its namespace.
/// Modules outside every stage stay reachable by exact FQN but belong to no
/// stage.
#[derive(Debug)]
pub struct StageRegistry {
    stages: Vec<Stage>,
}

impl StageRegistry {
    /// Build the registry from the `smv.stages` property.
    pub fn from_config(config: &EffectiveConfig, modules: &ModuleRegistry) -> Self {
        Self::from_stage_names(config.get_list(STAGES_KEY), modules)
    }

    /// Build the registry from an explicit stage-name list. Duplicate names
    /// collapse to their first occurrence.
    pub fn from_stage_names(names: Vec<String>, modules: &ModuleRegistry) -> Self {
        let mut stages: Vec<Stage> = Vec::with_capacity(names.len());
        for name in names {
            if stages.iter().any(|s| s.name == name) {
                continue;
            }
            stages.push(Stage { name, modules: Vec::new() });
        }
        for module in modules.modules() {
            let namespace = module.namespace();
            // When stage names nest (a and a.b), the most specific one owns
            // the module.
            let owner = stages
                .iter_mut()
                .filter(|stage| namespace_within(namespace, &stage.name))
                .max_by_key(|stage| stage.name.len());
            if let Some(stage) = owner {
                stage.modules.push(Arc::clone(module));
            }
        }
        Self { stages }
    }

    /// Stages in configuration order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Configured stage names, in order.
    pub fn stage_names(&self) -> Vec<String> {
        self.stages.iter().map(|s| s.name.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Find a stage by exact name.
    pub fn find_stage(&self, name: &str) -> Result<&Stage, SmvError> {
        self.stages.iter().find(|s| s.name == name).ok_or_else(|| SmvError::UnknownStage {
            name: name.to_string(),
            stages: self.stage_names(),
        })
    }

    /// Output modules across every stage: stage order first, declaration
    /// order within each stage.
    pub fn all_output_modules(&self) -> Vec<Arc<ModuleDescriptor>> {
        self.stages.iter().flat_map(Stage::output_modules).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::ModuleKind;

    fn registry(entries: &[(&str, ModuleKind)]) -> ModuleRegistry {
        let mut modules = ModuleRegistry::new();
        for (fqn, kind) in entries {
            modules.register(*fqn, *kind).expect("register");
        }
        modules
    }

    fn names(stage: &Stage) -> Vec<&str> {
        stage.modules().iter().map(|m| m.fqn()).collect()
    }

    #[test]
    fn containment_is_segment_wise_not_string_prefix() {
        assert!(namespace_within("a.b", "a.b"));
        assert!(namespace_within("a.b.input", "a.b"));
        assert!(!namespace_within("a.bc", "a.b"));
        assert!(!namespace_within("a", "a.b"));
    }

    #[test]
    fn assigns_modules_to_their_stage() {
        let modules = registry(&[
            ("etl.Raw", ModuleKind::Intermediate),
            ("etl.input.Csv", ModuleKind::Intermediate),
            ("mart.Report", ModuleKind::Output),
            ("orphan.Other", ModuleKind::Output),
        ]);
        let stages = StageRegistry::from_stage_names(
            vec!["etl".to_string(), "mart".to_string()],
            &modules,
        );
        assert_eq!(names(stages.find_stage("etl").expect("stage")), ["etl.Raw", "etl.input.Csv"]);
        assert_eq!(names(stages.find_stage("mart").expect("stage")), ["mart.Report"]);
    }

    #[test]
    fn sibling_stage_with_common_prefix_is_not_confused() {
        let modules = registry(&[
            ("a.b.Foo", ModuleKind::Output),
            ("a.bc.Foo", ModuleKind::Output),
        ]);
        let stages =
            StageRegistry::from_stage_names(vec!["a.b".to_string(), "a.bc".to_string()], &modules);
        assert_eq!(names(stages.find_stage("a.b").expect("stage")), ["a.b.Foo"]);
        assert_eq!(names(stages.find_stage("a.bc").expect("stage")), ["a.bc.Foo"]);
    }

    #[test]
    fn nested_stage_names_give_ownership_to_the_most_specific() {
        let modules = registry(&[
            ("a.Top", ModuleKind::Output),
            ("a.b.Deep", ModuleKind::Output),
        ]);
        let stages =
            StageRegistry::from_stage_names(vec!["a".to_string(), "a.b".to_string()], &modules);
        assert_eq!(names(stages.find_stage("a").expect("stage")), ["a.Top"]);
        assert_eq!(names(stages.find_stage("a.b").expect("stage")), ["a.b.Deep"]);
    }

    #[test]
    fn unknown_stage_lookup_reports_configured_names() {
        let modules = registry(&[]);
        let stages = StageRegistry::from_stage_names(vec!["etl".to_string()], &modules);
        let err = stages.find_stage("nope").expect_err("unknown");
        assert_eq!(err.to_string(), "unknown stage \"nope\" (configured stages: etl)");
    }

    #[test]
    fn all_output_modules_follow_stage_then_declaration_order() {
        let modules = registry(&[
            ("mart.B", ModuleKind::Output),
            ("etl.A", ModuleKind::Output),
            ("etl.Mid", ModuleKind::Intermediate),
            ("etl.C", ModuleKind::Output),
        ]);
        let stages = StageRegistry::from_stage_names(
            vec!["etl".to_string(), "mart".to_string()],
            &modules,
        );
        let outputs = stages.all_output_modules();
        let fqns: Vec<&str> = outputs.iter().map(|m| m.fqn()).collect();
        assert_eq!(fqns, ["etl.A", "etl.C", "mart.B"]);
    }

    #[test]
    fn empty_stage_list_builds_an_empty_registry() {
        let modules = registry(&[("a.Foo", ModuleKind::Output)]);
        let stages = StageRegistry::from_stage_names(Vec::new(), &modules);
        assert!(stages.is_empty());
        assert!(stages.all_output_modules().is_empty());
    }
}
