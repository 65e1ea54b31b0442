//! Property-based tests for configuration merging and name resolution.

use std::collections::BTreeSet;

use proptest::collection::{btree_map, vec};
use proptest::option;
use proptest::prelude::*;

use smv::config::{merge, split_prop, ConfigSource, PropertyMap};
use smv::module::{ModuleKind, ModuleRegistry};
use smv::resolve::ModuleResolver;
use smv::stage::StageRegistry;

const SOURCE_NAMES: [&str; 5] =
    ["defaults", "app config", "home config", "user config", "command line"];

fn props_strategy() -> impl Strategy<Value = PropertyMap> {
    btree_map("[a-z][a-z.]{0,9}", "[a-z0-9]{0,8}", 0..12)
}

proptest! {
    /// Whatever subset of sources defines a key, the value from the
    /// highest-ranked one wins exactly.
    #[test]
    fn merge_picks_the_highest_ranked_value(
        values in vec(option::of("[a-z0-9]{1,8}"), 1..=5),
    ) {
        let sources: Vec<ConfigSource> = values
            .iter()
            .enumerate()
            .map(|(rank, value)| {
                let mut props = PropertyMap::new();
                if let Some(value) = value {
                    props.insert("k".to_string(), value.clone());
                }
                ConfigSource::new(SOURCE_NAMES[rank], props)
            })
            .collect();
        let merged = merge(&sources);
        let expected = values.iter().rev().find_map(|v| v.clone());
        prop_assert_eq!(merged.get("k").map(str::to_string), expected);
    }

    /// Re-merging an already-merged configuration changes nothing.
    #[test]
    fn merging_a_merge_is_identity(props in props_strategy()) {
        let first = merge(&[ConfigSource::new("defaults", props)]);
        let again = merge(&[ConfigSource::new("defaults", first.props().clone())]);
        prop_assert_eq!(first, again);
    }

    /// The merged key set is exactly the union of the source key sets, and
    /// every overlapping key carries the higher-ranked value.
    #[test]
    fn merged_keys_are_the_union_of_sources(
        low in props_strategy(),
        high in props_strategy(),
    ) {
        let merged = merge(&[
            ConfigSource::new("app config", low.clone()),
            ConfigSource::new("user config", high.clone()),
        ]);
        let expected: BTreeSet<&String> = low.keys().chain(high.keys()).collect();
        let got: BTreeSet<&String> = merged.props().keys().collect();
        prop_assert_eq!(got, expected);
        for (key, value) in &high {
            prop_assert_eq!(merged.get(key), Some(value.as_str()));
        }
    }

    /// Splitting a comma-joined list of padded tokens recovers the tokens.
    #[test]
    fn split_prop_recovers_padded_tokens(
        tokens in vec("[A-Za-z0-9_.]{1,10}", 0..8),
        pad in "[ \t]{0,3}",
    ) {
        let joined =
            tokens.iter().map(|t| format!("{pad}{t}{pad}")).collect::<Vec<_>>().join(",");
        prop_assert_eq!(split_prop(&joined), tokens);
    }

    /// A registered fully-qualified name always resolves to itself as long
    /// as at least one stage is configured.
    #[test]
    fn registered_fqn_resolves_to_itself(
        segments in vec("[a-z][a-z0-9]{0,5}", 1..4),
        leaf in "[A-Z][a-zA-Z0-9]{0,7}",
        stage in "[a-z][a-z0-9]{0,5}",
    ) {
        let fqn = format!("{}.{}", segments.join("."), leaf);
        let mut registry = ModuleRegistry::new();
        registry.register(fqn.as_str(), ModuleKind::Output).expect("register");
        let stages = StageRegistry::from_stage_names(vec![stage], &registry);
        let resolver = ModuleResolver::new(&registry, &stages);
        let resolved = resolver.resolve(&fqn).expect("resolves");
        prop_assert_eq!(resolved.fqn(), fqn.as_str());
    }
}
