//! Command-line interface for smv
//!
//! A single flag-driven surface: property and directory overrides, the
//! module/stage/run-all selections, and the alternate `--graph`, `--json`,
//! and `--edd-compare` actions.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::app::SmvApp;
use crate::config::{self, DirOverrides, DirResolver, EffectiveConfig};
use crate::error::SmvError;
use crate::module::manifest;
use crate::render;

mod edd;
mod utils;

/// Resolve effective configuration and run plans for modular data pipelines
#[derive(Parser)]
#[command(name = "smv")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Property overrides as key=value pairs (highest precedence, repeatable)
    #[arg(long = "smv-props", value_name = "KEY=VALUE", num_args = 1..)]
    smv_props: Vec<String>,

    /// Application directory holding conf/smv-app-conf.props
    #[arg(long = "smv-app-dir", value_name = "DIR", default_value = ".")]
    smv_app_dir: PathBuf,

    /// Project directory holding conf/smv-user-conf.props
    #[arg(long = "smv-user-dir", value_name = "DIR", default_value = ".")]
    smv_user_dir: PathBuf,

    /// Data directory (overrides smv.dataDir)
    #[arg(long, value_name = "DIR")]
    data_dir: Option<String>,

    /// Input directory (overrides smv.inputDir)
    #[arg(long, value_name = "DIR")]
    input_dir: Option<String>,

    /// Output directory (overrides smv.outputDir)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Publish directory (overrides smv.publishDir)
    #[arg(long, value_name = "DIR")]
    publish_dir: Option<String>,

    /// Modules to run, by short or fully-qualified name
    #[arg(short = 'm', long = "run-module", value_name = "NAME", num_args = 1..)]
    run_modules: Vec<String>,

    /// Stages whose output modules should run
    #[arg(short = 's', long = "run-stage", value_name = "STAGE", num_args = 1..)]
    run_stages: Vec<String>,

    /// Run every output module in the application
    #[arg(long)]
    run_app: bool,

    /// Print the stage/module layout in DOT form instead of running
    #[arg(short = 'g', long)]
    graph: bool,

    /// Print a JSON description of the application instead of running
    #[arg(long)]
    json: bool,

    /// Compare two summary-statistics files (exactly two)
    #[arg(long = "edd-compare", value_name = "FILE", num_args = 1..)]
    edd_compare: Option<Vec<PathBuf>>,

    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL", value_enum)]
    completions: Option<Shell>,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long)]
    verbose: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Wire verbose flag to the tracing log level.
    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        clap_complete::generate(shell, &mut command, "smv", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(files) = &cli.edd_compare {
        // Arity is validated before any configuration work.
        if files.len() != 2 {
            return Err(SmvError::InvalidArgument {
                reason: format!("--edd-compare takes exactly two files, got {}", files.len()),
            }
            .into());
        }
        return edd::run(&files[0], &files[1]);
    }

    if !cli.graph
        && !cli.json
        && !cli.run_app
        && cli.run_modules.is_empty()
        && cli.run_stages.is_empty()
    {
        return Err(SmvError::InvalidArgument {
            reason: "nothing to do; pass --run-module, --run-stage, --run-app, --graph, --json, or --edd-compare"
                .to_string(),
        }
        .into());
    }

    let cmdline = utils::parse_prop_pairs(&cli.smv_props)?;
    let effective = config::resolve_config(&cli.smv_app_dir, &cli.smv_user_dir, cmdline)?;
    let modules = manifest::load_manifest(&manifest_path(&cli.smv_app_dir, &effective))?;
    let app = SmvApp::new(effective, modules);

    if cli.graph {
        print!("{}", render::render_dot(&app));
        return Ok(());
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&render::render_json(&app))?);
        return Ok(());
    }

    run_plan(&cli, &app)
}

/// The run action: compose the plan, resolve directories, and hand both to
/// the caller on stdout. Directories are only resolved here, never for the
/// graph or JSON actions.
fn run_plan(cli: &Cli, app: &SmvApp) -> Result<()> {
    let plan = app.build_run_plan(&cli.run_modules, &cli.run_stages, cli.run_app)?;
    if plan.is_empty() {
        println!("Run plan is empty: no output modules selected.");
        return Ok(());
    }

    let overrides = DirOverrides {
        data_dir: cli.data_dir.clone(),
        input_dir: cli.input_dir.clone(),
        output_dir: cli.output_dir.clone(),
        publish_dir: cli.publish_dir.clone(),
    };
    let dirs = DirResolver::new(&overrides, app.config());
    let data_dir = dirs.data_dir()?;
    let input_dir = dirs.input_dir()?;
    let output_dir = dirs.output_dir()?;
    let publish_dir = dirs.publish_dir()?;

    println!("App:         {}", app.app_name());
    println!("Data dir:    {data_dir}");
    println!("Input dir:   {input_dir}");
    println!("Output dir:  {output_dir}");
    println!("Publish dir: {publish_dir}");
    println!("Run plan ({} module(s)):", plan.len());
    for module in plan.modules() {
        println!("  {}", module.fqn());
    }
    Ok(())
}

/// Location of the module manifest: the `smv.moduleManifest` property,
/// resolved against the app directory when relative.
fn manifest_path(app_dir: &Path, config: &EffectiveConfig) -> PathBuf {
    let manifest =
        config.get_or(config::MODULE_MANIFEST_KEY, config::DEFAULT_MODULE_MANIFEST);
    let path = PathBuf::from(manifest);
    if path.is_absolute() {
        path
    } else {
        app_dir.join(path)
    }
}
