//! Shared CLI utilities.

use crate::config::PropertyMap;
use crate::error::SmvError;

/// Parse repeated `key=value` property overrides into a map, trimming
/// whitespace around both sides. A pair without `=` or with an empty key is
/// rejected; a later pair for the same key overrides an earlier one.
pub fn parse_prop_pairs(pairs: &[String]) -> Result<PropertyMap, SmvError> {
    let mut props = PropertyMap::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            return Err(SmvError::InvalidArgument {
                reason: format!("property override \"{pair}\" is not of the form key=value"),
            });
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(SmvError::InvalidArgument {
                reason: format!("property override \"{pair}\" has an empty key"),
            });
        }
        props.insert(key.to_string(), value.trim().to_string());
    }
    Ok(props)
}
