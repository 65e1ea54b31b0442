//! DOT and JSON descriptions of the assembled application.

use serde_json::{json, Map, Value};

use crate::app::SmvApp;

/// Render the stage/module layout in DOT form: one cluster per stage, one
/// node per member module, output modules drawn as boxes. Membership only;
/// dependency edges belong to the executor, which owns the real graph.
pub fn render_dot(app: &SmvApp) -> String {
    let mut out = String::new();
    out.push_str(&format!("digraph \"{}\" {{\n", dot_escape(app.app_name())));
    out.push_str("  rankdir=LR;\n");
    out.push_str("  node [fontsize=10];\n");
    for (idx, stage) in app.stages().stages().iter().enumerate() {
        out.push_str(&format!("  subgraph cluster_{idx} {{\n"));
        out.push_str(&format!("    label=\"{}\";\n", dot_escape(stage.name())));
        for module in stage.modules() {
            let shape = if module.is_output() { "box" } else { "ellipse" };
            out.push_str(&format!(
                "    \"{}\" [shape={shape}];\n",
                dot_escape(module.fqn())
            ));
        }
        out.push_str("  }\n");
    }
    out.push_str("}\n");
    out
}

fn dot_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Render the JSON application description: app name, stages with their
/// member modules and kinds, the flattened output-module list, and the full
/// merged configuration. Key order is sorted, so equal inputs serialize to
/// equal bytes.
pub fn render_json(app: &SmvApp) -> Value {
    let stages: Vec<Value> = app
        .stages()
        .stages()
        .iter()
        .map(|stage| {
            let modules: Vec<Value> = stage
                .modules()
                .iter()
                .map(|m| json!({ "fqn": m.fqn(), "kind": m.kind() }))
                .collect();
            json!({ "name": stage.name(), "modules": modules })
        })
        .collect();
    let outputs = app.stages().all_output_modules();
    let output_modules: Vec<&str> = outputs.iter().map(|m| m.fqn()).collect();
    let mut config = Map::new();
    for (key, value) in app.config().props() {
        config.insert(key.clone(), Value::String(value.clone()));
    }
    json!({
        "app": app.app_name(),
        "stages": stages,
        "output_modules": output_modules,
        "config": Value::Object(config),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{merge, ConfigSource, PropertyMap};
    use crate::module::{ModuleKind, ModuleRegistry};

    fn sample_app() -> SmvApp {
        let props: PropertyMap = [
            ("smv.appName", "Demo"),
            ("smv.stages", "etl,mart"),
            ("smv.dataDir", "/data"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let mut registry = ModuleRegistry::new();
        registry.register("etl.Raw", ModuleKind::Intermediate).expect("register");
        registry.register("etl.Summary", ModuleKind::Output).expect("register");
        registry.register("mart.Report", ModuleKind::Output).expect("register");
        SmvApp::new(merge(&[ConfigSource::new("test", props)]), registry)
    }

    #[test]
    fn dot_clusters_stages_and_boxes_outputs() {
        let dot = render_dot(&sample_app());
        let expected = r#"digraph "Demo" {
  rankdir=LR;
  node [fontsize=10];
  subgraph cluster_0 {
    label="etl";
    "etl.Raw" [shape=ellipse];
    "etl.Summary" [shape=box];
  }
  subgraph cluster_1 {
    label="mart";
    "mart.Report" [shape=box];
  }
}
"#;
        similar_asserts::assert_eq!(dot, expected);
        // Membership only: no inter-module edges.
        assert!(!dot.contains("->"));
    }

    #[test]
    fn json_describes_stages_outputs_and_config() {
        let doc = render_json(&sample_app());
        assert_eq!(doc["app"], "Demo");
        assert_eq!(doc["stages"][0]["name"], "etl");
        assert_eq!(doc["stages"][0]["modules"][1]["fqn"], "etl.Summary");
        assert_eq!(doc["stages"][0]["modules"][1]["kind"], "output");
        assert_eq!(doc["output_modules"][0], "etl.Summary");
        assert_eq!(doc["output_modules"][1], "mart.Report");
        assert_eq!(doc["config"]["smv.dataDir"], "/data");
    }

    #[test]
    fn json_serialization_is_deterministic() {
        let a = serde_json::to_string(&render_json(&sample_app())).expect("serialize");
        let b = serde_json::to_string(&render_json(&sample_app())).expect("serialize");
        assert_eq!(a, b);
    }
}
