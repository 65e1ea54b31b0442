//! smv: configuration and run-plan resolution for modular data pipelines
//!
//! This tool merges ranked property sources into one effective configuration,
//! resolves short module names across stage namespaces, and prints the run
//! plan and resolved directories for the pipeline executor.

use anyhow::Result;

fn main() -> Result<()> {
    smv::cli::run()
}
