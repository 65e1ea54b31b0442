//! Error taxonomy for configuration and run-plan resolution.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by configuration merging, module resolution, and run-plan
/// construction.
///
/// Every variant is fatal to the current invocation: nothing is retried and
/// nothing is silently downgraded to a default. Missing optional config files
/// are policy, not errors, and never reach this type.
#[derive(Debug, Error)]
pub enum SmvError {
    /// A property file exists but is not UTF-8 `key=value` text.
    #[error("failed to read property file {}: {}", .path.display(), .reason)]
    ConfigRead { path: PathBuf, reason: String },

    /// A property value could not be coerced to an integer.
    #[error("property {key} is not a valid integer: \"{value}\"")]
    InvalidNumber { key: String, value: String },

    /// A short module name matched nothing in any configured stage.
    #[error("module \"{name}\" not found in any configured stage (searched: {})", join_names(.stages))]
    ModuleNotFound { name: String, stages: Vec<String> },

    /// A short module name matched distinct modules in two or more stages.
    #[error("module name \"{name}\" is ambiguous; found in stages: {}", join_names(.stages))]
    AmbiguousModule { name: String, stages: Vec<String> },

    /// A stage selection named a stage absent from `smv.stages`.
    #[error("unknown stage \"{name}\" (configured stages: {})", join_names(.stages))]
    UnknownStage { name: String, stages: Vec<String> },

    /// No data directory resolvable from the command line, the configuration,
    /// or the environment.
    #[error("no data directory specified; pass --data-dir or set smv.dataDir")]
    MissingDataDir,

    /// Two modules were registered under the same fully-qualified name.
    #[error("module \"{fqn}\" is already registered")]
    DuplicateModule { fqn: String },

    /// A module manifest entry could not be understood.
    #[error("invalid module manifest {}: {}", .path.display(), .reason)]
    InvalidManifest { path: PathBuf, reason: String },

    /// Malformed command-line input detected after flag parsing.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },
}

fn join_names(names: &[String]) -> String {
    if names.is_empty() {
        "<none>".to_string()
    } else {
        names.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_lists_searched_stages() {
        let err = SmvError::ModuleNotFound {
            name: "Foo".to_string(),
            stages: vec!["a.b".to_string(), "x".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "module \"Foo\" not found in any configured stage (searched: a.b, x)"
        );
    }

    #[test]
    fn not_found_message_with_no_stages_configured() {
        let err = SmvError::ModuleNotFound { name: "Foo".to_string(), stages: Vec::new() };
        assert!(err.to_string().contains("<none>"));
    }

    #[test]
    fn ambiguous_message_names_conflicting_stages() {
        let err = SmvError::AmbiguousModule {
            name: "Report".to_string(),
            stages: vec!["etl".to_string(), "mart".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "module name \"Report\" is ambiguous; found in stages: etl, mart"
        );
    }
}
