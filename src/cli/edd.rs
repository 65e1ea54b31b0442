//! Comparison of summary-statistics result files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

const MAX_REPORTED_DIFFS: usize = 20;

/// Compare two JSON summary-statistics files structurally.
///
/// Prints the paths at which the documents differ and fails when any exist,
/// so scripted comparisons can branch on the exit code. Identical documents
/// succeed quietly.
pub fn run(left: &Path, right: &Path) -> Result<()> {
    let left_doc = read_summary(left)?;
    let right_doc = read_summary(right)?;

    let mut diffs = Vec::new();
    collect_diffs(&left_doc, &right_doc, "$", &mut diffs);

    if diffs.is_empty() {
        println!("Summary statistics are identical.");
        return Ok(());
    }

    println!("Summary statistics differ at {} path(s):", diffs.len());
    for diff in diffs.iter().take(MAX_REPORTED_DIFFS) {
        println!("  {diff}");
    }
    if diffs.len() > MAX_REPORTED_DIFFS {
        println!("  ... and {} more", diffs.len() - MAX_REPORTED_DIFFS);
    }
    anyhow::bail!("summary statistics in {} and {} differ", left.display(), right.display())
}

fn read_summary(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed reading summary file: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("summary file is not valid JSON: {}", path.display()))
}

/// Record every JSON path at which `left` and `right` differ. Objects and
/// arrays recurse; anything else compares for equality.
fn collect_diffs(left: &Value, right: &Value, path: &str, diffs: &mut Vec<String>) {
    match (left, right) {
        (Value::Object(l), Value::Object(r)) => {
            for (key, lv) in l {
                match r.get(key) {
                    Some(rv) => collect_diffs(lv, rv, &format!("{path}.{key}"), diffs),
                    None => diffs.push(format!("{path}.{key}: missing on right")),
                }
            }
            for key in r.keys() {
                if !l.contains_key(key) {
                    diffs.push(format!("{path}.{key}: missing on left"));
                }
            }
        }
        (Value::Array(l), Value::Array(r)) => {
            for (idx, (lv, rv)) in l.iter().zip(r.iter()).enumerate() {
                collect_diffs(lv, rv, &format!("{path}[{idx}]"), diffs);
            }
            if l.len() != r.len() {
                diffs.push(format!("{path}: array length {} vs {}", l.len(), r.len()));
            }
        }
        _ if left != right => diffs.push(format!("{path}: {left} vs {right}")),
        _ => {}
    }
}
