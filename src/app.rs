//! Per-invocation application assembly.

use std::sync::Arc;

use crate::config::{EffectiveConfig, APP_NAME_KEY};
use crate::error::SmvError;
use crate::module::{ModuleDescriptor, ModuleRegistry};
use crate::plan::{build_plan, RunPlan};
use crate::resolve::ModuleResolver;
use crate::stage::StageRegistry;

/// The immutable assembly for one invocation: effective configuration, the
/// module registry, and the stages derived from both.
///
/// Built once at startup and passed by reference to whatever needs it.
/// Nothing mutates after construction, so sharing across threads needs no
/// locking.
pub struct SmvApp {
    config: EffectiveConfig,
    modules: ModuleRegistry,
    stages: StageRegistry,
}

impl SmvApp {
    /// Derive the stage registry from `config` and `modules` and wrap the
    /// three into one assembly.
    pub fn new(config: EffectiveConfig, modules: ModuleRegistry) -> Self {
        let stages = StageRegistry::from_config(&config, &modules);
        Self { config, modules, stages }
    }

    pub fn app_name(&self) -> &str {
        self.config.get_or(APP_NAME_KEY, "Smv Application")
    }

    pub fn config(&self) -> &EffectiveConfig {
        &self.config
    }

    pub fn stages(&self) -> &StageRegistry {
        &self.stages
    }

    pub fn resolver(&self) -> ModuleResolver<'_> {
        ModuleResolver::new(&self.modules, &self.stages)
    }

    /// Resolve one module name against the configured stages.
    pub fn resolve_module(&self, name: &str) -> Result<Arc<ModuleDescriptor>, SmvError> {
        self.resolver().resolve(name)
    }

    /// Compose the run plan for the given selections.
    pub fn build_run_plan(
        &self,
        module_names: &[String],
        stage_names: &[String],
        run_all: bool,
    ) -> Result<RunPlan, SmvError> {
        build_plan(&self.resolver(), &self.stages, module_names, stage_names, run_all)
    }
}
