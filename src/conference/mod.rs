// src/conference/mod.rs

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;

pub mod store;

pub use store::{load_conferences, save_conferences};

/// One entry of the persisted conference list.
///
/// Keys that this tool does not know about are kept in `extra` so that
/// records untouched by a merge are written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conference {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<Value>,
    #[serde(deserialize_with = "id_from_scalar")]
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub abstract_deadline: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    /// Usually a bool; older sheets wrote marks such as `x`.
    #[serde(default)]
    pub estimated: Option<Value>,
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub paperslink: Option<String>,
    #[serde(default)]
    pub pwclink: Option<String>,
    #[serde(default)]
    pub hindex: Option<Value>,
    #[serde(rename = "CORE", default)]
    pub core: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub sub: Vec<String>,
    #[serde(default)]
    pub note: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Conference {
    /// Empty record carrying only its identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            title: None,
            year: None,
            id: id.into(),
            full_name: None,
            link: None,
            deadline: None,
            abstract_deadline: None,
            timezone: None,
            estimated: None,
            place: None,
            date: None,
            start: None,
            end: None,
            paperslink: None,
            pwclink: None,
            hindex: None,
            core: None,
            sub: Vec::new(),
            note: None,
            extra: BTreeMap::new(),
        }
    }
}

/// Hand-edited files sometimes carry a numeric id; keep it as text.
fn id_from_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "conference id must be a scalar, got {:?}",
            other
        ))),
    }
}

/// `sub: ML` and `sub: [ML, IR]` both load as a list.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_lenient_fields() {
        let yaml = r#"
id: 42
title: FooConf
sub: ML
year: 2025
hindex: 31.5
custom_key: keep me
"#;
        let conf: Conference = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(conf.id, "42");
        assert_eq!(conf.sub, vec!["ML"]);
        assert_eq!(conf.year.as_ref().and_then(Value::as_u64), Some(2025));
        assert_eq!(
            conf.extra.get("custom_key"),
            Some(&Value::String("keep me".to_string()))
        );
        assert_eq!(conf.estimated, None);
    }

    #[test]
    fn test_non_boolean_estimated_loads() {
        let conf: Conference = serde_yaml::from_str("id: a\nestimated: x\n").unwrap();
        assert_eq!(conf.estimated, Some(Value::String("x".to_string())));

        let conf: Conference = serde_yaml::from_str("id: b\nestimated: true\n").unwrap();
        assert_eq!(conf.estimated, Some(Value::Bool(true)));
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let yaml = "title: NoId\n";
        assert!(serde_yaml::from_str::<Conference>(yaml).is_err());
    }

    #[test]
    fn test_serialize_writes_nulls_and_core_key() {
        let mut conf = Conference::new("c1");
        conf.core = Some("A".to_string());
        conf.sub = vec!["AI".to_string()];
        let out = serde_yaml::to_string(&conf).unwrap();
        assert!(out.contains("CORE: A"));
        assert!(out.contains("year: null"));
        assert!(out.contains("- AI"));
        assert!(!out.contains("extra"));
    }
}
