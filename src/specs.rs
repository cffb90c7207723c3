//! Record types shared by the kernel helpers
//!
//! These mirror the JSON emitted by `luet search -o json`.

use serde::de::value::SeqAccessDeserializer;
use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single package search result
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Stone {
    pub category: String,
    pub name: String,

    #[serde(default)]
    pub version: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub repository: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub license: String,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,

    /// Free-form annotations attached to the package definition
    #[serde(default)]
    pub annotations: HashMap<String, serde_json::Value>,
}

impl Stone {
    /// `category/name` form used in logs and tables
    pub fn package_name(&self) -> String {
        format!("{}/{}", self.category, self.name)
    }
}

/// Collection of stones returned by one search.
///
/// Decodes from a bare array of stones or from `{"stones": [...]}`,
/// where a `null` list counts as empty.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct StonesPack {
    pub stones: Vec<Stone>,
}

impl StonesPack {
    pub fn len(&self) -> usize {
        self.stones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stones.is_empty()
    }
}

impl<'de> Deserialize<'de> for StonesPack {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StonesPackVisitor)
    }
}

struct StonesPackVisitor;

impl<'de> Visitor<'de> for StonesPackVisitor {
    type Value = StonesPack;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array of stones or an object with a `stones` field")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<StonesPack, A::Error> {
        let stones = Vec::<Stone>::deserialize(SeqAccessDeserializer::new(seq))?;
        Ok(StonesPack { stones })
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<StonesPack, A::Error> {
        let mut stones: Option<Option<Vec<Stone>>> = None;

        while let Some(key) = map.next_key::<String>()? {
            if key == "stones" {
                if stones.is_some() {
                    return Err(de::Error::duplicate_field("stones"));
                }
                stones = Some(map.next_value()?);
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }

        let stones = stones.ok_or_else(|| de::Error::missing_field("stones"))?;
        Ok(StonesPack { stones: stones.unwrap_or_default() })
    }
}

/// Kernel metadata read from the `kernel` annotation
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct KernelAnnotation {
    /// End of life date
    pub eol: String,
    pub lts: bool,
    pub released: String,
    pub suffix: String,
    #[serde(rename = "type")]
    pub kernel_type: String,
}
