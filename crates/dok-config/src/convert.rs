/*
 * convert.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Conversion between `ConfigNode` and serialized formats.
//!
//! `ConfigNode` implements `Serialize`/`Deserialize` directly, so any serde
//! format can produce or consume it. Numbers are held as `f64`; integral
//! values that fit an `i64` serialize as integers so `{"w": 3}` round trips
//! as `3` rather than `3.0`.

use crate::types::{ConfigNode, Mapping, Result, Scalar};
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;

/// Largest magnitude at which every integer is exactly representable in `f64`.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn integral(n: f64) -> Option<i64> {
    if n.fract() == 0.0 && n.abs() <= MAX_EXACT_INTEGER {
        Some(n as i64)
    } else {
        None
    }
}

impl ConfigNode {
    /// Parse a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Render as pretty-printed JSON.
    pub fn to_json_string_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render as YAML.
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

impl Serialize for ConfigNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ConfigNode::Null => serializer.serialize_unit(),
            ConfigNode::Scalar(scalar) => scalar.serialize(serializer),
            ConfigNode::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ConfigNode::Mapping(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Scalar::String(s) => serializer.serialize_str(s),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Number(n) => match integral(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
        }
    }
}

struct ConfigNodeVisitor;

impl<'de> Visitor<'de> for ConfigNodeVisitor {
    type Value = ConfigNode;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any configuration value")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<ConfigNode, E> {
        Ok(ConfigNode::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<ConfigNode, E> {
        Ok(ConfigNode::Null)
    }

    fn visit_some<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> std::result::Result<ConfigNode, D::Error> {
        Deserialize::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<ConfigNode, E> {
        Ok(ConfigNode::bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<ConfigNode, E> {
        Ok(ConfigNode::number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<ConfigNode, E> {
        Ok(ConfigNode::number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<ConfigNode, E> {
        Ok(ConfigNode::number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<ConfigNode, E> {
        Ok(ConfigNode::string(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<ConfigNode, E> {
        Ok(ConfigNode::string(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<ConfigNode, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(ConfigNode::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<ConfigNode, A::Error> {
        let mut map = Mapping::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, ConfigNode>()? {
            map.insert(key, value);
        }
        Ok(ConfigNode::Mapping(map))
    }
}

impl<'de> Deserialize<'de> for ConfigNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(ConfigNodeVisitor)
    }
}

impl From<serde_json::Value> for ConfigNode {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ConfigNode::Null,
            serde_json::Value::Bool(b) => ConfigNode::bool(b),
            serde_json::Value::Number(n) => ConfigNode::number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => ConfigNode::string(s),
            serde_json::Value::Array(items) => {
                ConfigNode::Sequence(items.into_iter().map(ConfigNode::from).collect())
            }
            serde_json::Value::Object(fields) => ConfigNode::Mapping(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, ConfigNode::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<ConfigNode> for serde_json::Value {
    fn from(node: ConfigNode) -> Self {
        match node {
            ConfigNode::Null => serde_json::Value::Null,
            ConfigNode::Scalar(Scalar::Bool(b)) => serde_json::Value::Bool(b),
            ConfigNode::Scalar(Scalar::String(s)) => serde_json::Value::String(s),
            ConfigNode::Scalar(Scalar::Number(n)) => match integral(n) {
                Some(i) => serde_json::Value::from(i),
                // Non-finite numbers have no JSON form.
                None => serde_json::Number::from_f64(n)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null),
            },
            ConfigNode::Sequence(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            ConfigNode::Mapping(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}
