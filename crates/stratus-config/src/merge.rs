//! Recursive structural merge of configuration layers.
//!
//! Layers are merged as `serde_yaml::Value` trees, converted in memory with
//! `to_value`/`from_value`. Precedence is field-by-field: the override layer
//! wins wherever it defines a value, but an empty value never clobbers a
//! resolved one.

use crate::cloud::Cloud;
use crate::error::{ConfigError, Result};
use serde_yaml::Value;

/// Merge two value trees, `override_` taking precedence.
///
/// Rules:
/// - mapping + mapping: merged recursively key by key; keys present only in
///   `inferior` are carried through
/// - sequence + sequence: concatenated, override entries first
/// - an empty override (null, `""`, numeric zero) yields `inferior`
/// - anything else: override wins, including shape mismatches
///
/// Merge is total; malformed shapes never error.
pub fn merge_values(override_: Value, inferior: Value) -> Value {
    match (override_, inferior) {
        (Value::Mapping(mut override_map), Value::Mapping(inferior_map)) => {
            for (key, inferior_value) in inferior_map {
                match override_map.remove(&key) {
                    Some(override_value) => {
                        override_map.insert(key, merge_values(override_value, inferior_value));
                    }
                    None => {
                        override_map.insert(key, inferior_value);
                    }
                }
            }
            Value::Mapping(override_map)
        }
        (Value::Sequence(mut override_seq), Value::Sequence(inferior_seq)) => {
            override_seq.extend(inferior_seq);
            Value::Sequence(override_seq)
        }
        // An absent override layer must not erase lower layers.
        (Value::Null, inferior @ Value::Mapping(_)) => inferior,
        (override_, inferior) => {
            if is_empty_value(&override_) && !is_empty_value(&inferior) {
                inferior
            } else {
                override_
            }
        }
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

/// Merge two cloud entries recursively (the auth section included),
/// `override_` taking precedence field by field.
pub fn merge_clouds(override_: &Cloud, inferior: &Cloud) -> Result<Cloud> {
    let override_value = serde_yaml::to_value(override_).map_err(ConfigError::Merge)?;
    let inferior_value = serde_yaml::to_value(inferior).map_err(ConfigError::Merge)?;
    serde_yaml::from_value(merge_values(override_value, inferior_value)).map_err(ConfigError::Merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::AuthInfo;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn merge_is_idempotent_on_identical_trees() {
        let tree = yaml("{a: 1, b: {c: x, d: [1, 2]}}");
        let merged = merge_values(tree.clone(), tree.clone());
        // Sequences are the one exception: identical lists concatenate.
        let expected = yaml("{a: 1, b: {c: x, d: [1, 2, 1, 2]}}");
        assert_eq!(merged, expected);

        let scalar_only = yaml("{a: 1, b: {c: x}}");
        assert_eq!(
            merge_values(scalar_only.clone(), scalar_only.clone()),
            scalar_only
        );
    }

    #[test]
    fn empty_override_yields_inferior() {
        let inferior = yaml("{a: 1, b: {c: x}}");
        assert_eq!(merge_values(Value::Null, inferior.clone()), inferior);
        assert_eq!(
            merge_values(yaml("\"\""), yaml("\"value\"")),
            yaml("\"value\"")
        );
        assert_eq!(merge_values(yaml("0"), yaml("42")), yaml("42"));
    }

    #[test]
    fn override_scalars_win_where_defined() {
        let override_ = yaml("{a: 1, b: {c: over}}");
        let inferior = yaml("{a: 2, b: {c: under, d: kept}, e: carried}");
        let merged = merge_values(override_, inferior);
        assert_eq!(merged, yaml("{a: 1, b: {c: over, d: kept}, e: carried}"));
    }

    #[test]
    fn sequences_concatenate_override_first() {
        let merged = merge_values(yaml("[a, b]"), yaml("[c]"));
        assert_eq!(merged, yaml("[a, b, c]"));
    }

    #[test]
    fn shape_mismatch_falls_back_to_override() {
        assert_eq!(
            merge_values(yaml("{a: 1}"), yaml("\"scalar\"")),
            yaml("{a: 1}")
        );
        assert_eq!(merge_values(yaml("[1]"), yaml("{a: 1}")), yaml("[1]"));
    }

    #[test]
    fn cloud_merge_fills_gaps_without_clobbering() {
        let primary = Cloud {
            auth: Some(AuthInfo {
                username: "otc".to_string(),
                password: "Qwerty123!".to_string(),
                ..AuthInfo::default()
            }),
            region_name: "eu-de".to_string(),
            ..Cloud::default()
        };
        let profile = Cloud {
            auth: Some(AuthInfo {
                auth_url: "http://url-from-clouds-public.yaml".to_string(),
                ..AuthInfo::default()
            }),
            ..Cloud::default()
        };

        let merged = merge_clouds(&primary, &profile).unwrap();
        let auth = merged.auth.unwrap();
        assert_eq!(auth.auth_url, "http://url-from-clouds-public.yaml");
        assert_eq!(auth.username, "otc");
        assert_eq!(auth.password, "Qwerty123!");
        assert_eq!(merged.region_name, "eu-de");
    }
}
