//! Configuration and run-plan resolution for modular data pipelines.
//!
//! An application is described by properties merged from ranked sources
//! (defaults, app config, per-user config, project config, command line),
//! a registry of modules identified by dot-separated fully-qualified names,
//! and the stage namespaces that group them. On top of those, this crate
//! resolves short module names to unique identities, composes ordered run
//! plans, and derives the data/input/output/publish directories handed to
//! the executor.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod module;
pub mod plan;
pub mod render;
pub mod resolve;
pub mod stage;

pub use app::SmvApp;
pub use config::{DirOverrides, DirResolver, EffectiveConfig};
pub use error::SmvError;
pub use module::{ModuleDescriptor, ModuleKind, ModuleRegistry};
pub use plan::RunPlan;
pub use resolve::ModuleResolver;
pub use stage::{Stage, StageRegistry};
