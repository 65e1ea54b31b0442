//! Precedence-ordered merging of configuration sources.

use crate::config::props::PropertyMap;
use crate::error::SmvError;

/// One named entry in the merge chain.
///
/// Rank comes from position in the slice handed to [`merge`]: later sources
/// override earlier ones key by key. The name exists only for diagnostics.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    name: &'static str,
    props: PropertyMap,
}

impl ConfigSource {
    pub fn new(name: &'static str, props: PropertyMap) -> Self {
        Self { name, props }
    }
}

/// The single authoritative property set for one invocation.
///
/// Produced once by [`merge`] and immutable afterwards. Values are opaque
/// strings at this layer; typed accessors coerce on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    props: PropertyMap,
}

/// Merge ranked sources into one [`EffectiveConfig`].
///
/// For every key defined by more than one source, the value from the
/// highest-ranked source wins exactly, never a blend. Keys absent from all
/// sources are absent from the result.
pub fn merge(sources: &[ConfigSource]) -> EffectiveConfig {
    let mut props = PropertyMap::new();
    for source in sources {
        for (key, value) in &source.props {
            if let Some(previous) = props.insert(key.clone(), value.clone()) {
                if previous != *value {
                    tracing::debug!("{} overrides {} = {}", source.name, key, value);
                }
            }
        }
    }
    EffectiveConfig { props }
}

impl EffectiveConfig {
    /// Value for `key`, if any source defined it.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.props.get(key).map(String::as_str)
    }

    /// Value for `key`, or `default` when no source defined it.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Integer value for `key`. An absent key is `Ok(None)`; a present value
    /// that does not parse as an integer is an error, never a default.
    pub fn get_int(&self, key: &str) -> Result<Option<i64>, SmvError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => {
                value.trim().parse::<i64>().map(Some).map_err(|_| SmvError::InvalidNumber {
                    key: key.to_string(),
                    value: value.to_string(),
                })
            }
        }
    }

    /// List value for `key`, split on `,` or `:`. An absent key yields an
    /// empty list.
    pub fn get_list(&self, key: &str) -> Vec<String> {
        split_prop(self.get(key).unwrap_or(""))
    }

    /// All merged properties in sorted key order.
    pub fn props(&self) -> &PropertyMap {
        &self.props
    }
}

/// Split a delimited property value on `,` or `:`, trimming whitespace and
/// dropping empty segments. An empty or all-whitespace value yields an empty
/// list rather than a single empty element.
pub fn split_prop(value: &str) -> Vec<String> {
    value
        .split([',', ':'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
