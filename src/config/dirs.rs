//! Derived resolution of the data, input, output, and publish directories.

use once_cell::sync::OnceCell;

use crate::config::merge::EffectiveConfig;
use crate::config::{DATA_DIR_KEY, INPUT_DIR_KEY, OUTPUT_DIR_KEY, PUBLISH_DIR_KEY};
use crate::error::SmvError;

/// Deprecated environment fallback for the data directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

static DATA_DIR_ENV_WARNED: OnceCell<()> = OnceCell::new();

/// Directory overrides taken from the command line. All optional; an unset
/// field falls through to the configuration and derivation chain.
#[derive(Debug, Clone, Default)]
pub struct DirOverrides {
    pub data_dir: Option<String>,
    pub input_dir: Option<String>,
    pub output_dir: Option<String>,
    pub publish_dir: Option<String>,
}

/// Resolves pipeline directories on demand.
///
/// Nothing is resolved at construction: an invocation that never touches
/// directories (graph or JSON output) must not fail for lack of a data
/// directory. Directory values stay plain strings because they are often
/// remote URIs (`hdfs://...`, `s3a://...`) that must not go through `Path`
/// normalization.
pub struct DirResolver<'a> {
    overrides: &'a DirOverrides,
    config: &'a EffectiveConfig,
    env_data_dir: Option<String>,
}

impl<'a> DirResolver<'a> {
    pub fn new(overrides: &'a DirOverrides, config: &'a EffectiveConfig) -> Self {
        Self::with_env(overrides, config, std::env::var(DATA_DIR_ENV).ok())
    }

    /// Injectable environment for tests; `new` captures the real variable.
    fn with_env(
        overrides: &'a DirOverrides,
        config: &'a EffectiveConfig,
        env_data_dir: Option<String>,
    ) -> Self {
        Self { overrides, config, env_data_dir }
    }

    /// The data directory: command-line override, else `smv.dataDir`, else
    /// the deprecated `DATA_DIR` environment variable. No further fallback.
    pub fn data_dir(&self) -> Result<String, SmvError> {
        if let Some(dir) = &self.overrides.data_dir {
            return Ok(dir.clone());
        }
        if let Some(dir) = self.config.get(DATA_DIR_KEY) {
            return Ok(dir.to_string());
        }
        if let Some(dir) = &self.env_data_dir {
            // Warn once per process, not once per lookup.
            DATA_DIR_ENV_WARNED.get_or_init(|| {
                tracing::warn!(
                    "the DATA_DIR environment variable is deprecated; set smv.dataDir or pass --data-dir instead"
                );
            });
            return Ok(dir.clone());
        }
        Err(SmvError::MissingDataDir)
    }

    /// The input directory: override, else `smv.inputDir`, else
    /// `<dataDir>/input`.
    pub fn input_dir(&self) -> Result<String, SmvError> {
        self.derived(&self.overrides.input_dir, INPUT_DIR_KEY, "input")
    }

    /// The output directory: override, else `smv.outputDir`, else
    /// `<dataDir>/output`.
    pub fn output_dir(&self) -> Result<String, SmvError> {
        self.derived(&self.overrides.output_dir, OUTPUT_DIR_KEY, "output")
    }

    /// The publish directory: override, else `smv.publishDir`, else
    /// `<dataDir>/publish`.
    pub fn publish_dir(&self) -> Result<String, SmvError> {
        self.derived(&self.overrides.publish_dir, PUBLISH_DIR_KEY, "publish")
    }

    fn derived(
        &self,
        override_value: &Option<String>,
        key: &str,
        leaf: &str,
    ) -> Result<String, SmvError> {
        if let Some(dir) = override_value {
            return Ok(dir.clone());
        }
        if let Some(dir) = self.config.get(key) {
            return Ok(dir.to_string());
        }
        Ok(format!("{}/{}", self.data_dir()?, leaf))
    }
}
