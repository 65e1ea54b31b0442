//! Configuration loading and merging
//!
//! Assembles the effective configuration from ranked property sources
//! (command line > project config > per-user config > app config > defaults)
//! and resolves the pipeline directories derived from it.

use std::path::{Path, PathBuf};

use crate::error::SmvError;

pub mod dirs;
pub mod merge;
pub mod props;

pub use dirs::{DirOverrides, DirResolver, DATA_DIR_ENV};
pub use merge::{merge, split_prop, ConfigSource, EffectiveConfig};
pub use props::{load_props, PropertyMap};

/// Property keys consulted by the resolvers.
pub const APP_NAME_KEY: &str = "smv.appName";
pub const STAGES_KEY: &str = "smv.stages";
pub const DATA_DIR_KEY: &str = "smv.dataDir";
pub const INPUT_DIR_KEY: &str = "smv.inputDir";
pub const OUTPUT_DIR_KEY: &str = "smv.outputDir";
pub const PUBLISH_DIR_KEY: &str = "smv.publishDir";
pub const MODULE_MANIFEST_KEY: &str = "smv.moduleManifest";

/// Application-level config file, relative to the app directory.
pub const APP_CONF_FILE: &str = "conf/smv-app-conf.props";
/// Project-level config file, relative to the user directory.
pub const USER_CONF_FILE: &str = "conf/smv-user-conf.props";
/// Per-user config file, relative to `$HOME`.
pub const HOME_CONF_FILE: &str = ".smv/smv-user-conf.props";
/// Default module manifest location, relative to the app directory.
pub const DEFAULT_MODULE_MANIFEST: &str = "conf/modules.props";

/// Built-in defaults, the lowest-ranked source. Every key here is
/// overridable by any file or command-line source.
pub fn default_props() -> PropertyMap {
    let mut props = PropertyMap::new();
    props.insert(APP_NAME_KEY.to_string(), "Smv Application".to_string());
    props.insert(STAGES_KEY.to_string(), String::new());
    props.insert(MODULE_MANIFEST_KEY.to_string(), DEFAULT_MODULE_MANIFEST.to_string());
    props.insert("smv.class_server.host".to_string(), String::new());
    props.insert("smv.class_server.port".to_string(), "9900".to_string());
    props.insert("smv.class_server.class_dir".to_string(), "./target/classes".to_string());
    props
}

/// Load the four file-or-default sources, append the command-line overrides,
/// and merge the lot in precedence order.
///
/// Each file in the chain is optional; a missing file contributes nothing.
/// A file that exists but cannot be parsed aborts with
/// [`SmvError::ConfigRead`].
pub fn resolve_config(
    app_dir: &Path,
    user_dir: &Path,
    cmdline: PropertyMap,
) -> Result<EffectiveConfig, SmvError> {
    let home_dir = std::env::var_os("HOME").map(PathBuf::from);
    resolve_config_with_home(app_dir, user_dir, cmdline, home_dir)
}

/// Injectable home directory for tests; `resolve_config` captures the real
/// `$HOME`.
fn resolve_config_with_home(
    app_dir: &Path,
    user_dir: &Path,
    cmdline: PropertyMap,
    home_dir: Option<PathBuf>,
) -> Result<EffectiveConfig, SmvError> {
    let app_conf = load_props(&app_dir.join(APP_CONF_FILE))?;
    let home_conf = match home_dir {
        Some(home) => load_props(&home.join(HOME_CONF_FILE))?,
        None => PropertyMap::new(),
    };
    let user_conf = load_props(&user_dir.join(USER_CONF_FILE))?;
    let sources = [
        ConfigSource::new("defaults", default_props()),
        ConfigSource::new("app config", app_conf),
        ConfigSource::new("home config", home_conf),
        ConfigSource::new("user config", user_conf),
        ConfigSource::new("command line", cmdline),
    ];
    Ok(merge(&sources))
}
