//! Run-plan construction from module and stage selections.

use std::sync::Arc;

use crate::error::SmvError;
use crate::module::ModuleDescriptor;
use crate::resolve::ModuleResolver;
use crate::stage::StageRegistry;

/// The ordered set of modules selected for one invocation.
///
/// Order is the concatenation order of the selection groups; a module
/// selected more than once keeps its first position only.
#[derive(Debug, Default)]
pub struct RunPlan {
    modules: Vec<Arc<ModuleDescriptor>>,
}

impl RunPlan {
    pub fn modules(&self) -> &[Arc<ModuleDescriptor>] {
        &self.modules
    }

    pub fn fqns(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.fqn()).collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    fn push_unique(&mut self, module: Arc<ModuleDescriptor>) {
        if !self.modules.iter().any(|m| m.fqn() == module.fqn()) {
            self.modules.push(module);
        }
    }
}

/// Build the run plan from the three selection groups, concatenated in
/// order: explicitly named modules, output modules of each selected stage,
/// then (with `run_all`) every output module in the application.
///
/// Any resolution failure aborts the whole plan; there is no partial result.
pub fn build_plan(
    resolver: &ModuleResolver<'_>,
    stages: &StageRegistry,
    module_names: &[String],
    stage_names: &[String],
    run_all: bool,
) -> Result<RunPlan, SmvError> {
    let mut plan = RunPlan::default();
    for name in module_names {
        plan.push_unique(resolver.resolve(name)?);
    }
    for stage_name in stage_names {
        for module in stages.find_stage(stage_name)?.output_modules() {
            plan.push_unique(module);
        }
    }
    if run_all {
        for module in stages.all_output_modules() {
            plan.push_unique(module);
        }
    }
    Ok(plan)
}
