//! Structured keys for model entities
//!
//! Reference columns in the tree tables store the string form of a [`Key`].
//! A key is a chain of `(type, sub key)` segments from the outermost owner
//! down to the entity itself, rendered as `type/sub/type/sub/...`:
//!
//! ```
//! use reqmodel_core::model::{Key, KeyType};
//!
//! let key = Key::parse("domain/d1/class/c1/attribute/a1").unwrap();
//! assert_eq!(key.key_type(), KeyType::Attribute);
//! assert_eq!(key.sub_key(), "a1");
//! assert_eq!(key.to_string(), "domain/d1/class/c1/attribute/a1");
//! ```

use crate::errors::{Result, TreeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of entity a key segment names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyType {
    Domain,
    Subdomain,
    Class,
    Attribute,
    State,
    Event,
    Guard,
    Action,
    Query,
    Transition,
    GlobalFunction,
    Logic,
    UseCase,
    Scenario,
    Object,
    Actor,
    Association,
    Generalization,
    DataType,
}

impl KeyType {
    pub const ALL: [KeyType; 19] = [
        KeyType::Domain,
        KeyType::Subdomain,
        KeyType::Class,
        KeyType::Attribute,
        KeyType::State,
        KeyType::Event,
        KeyType::Guard,
        KeyType::Action,
        KeyType::Query,
        KeyType::Transition,
        KeyType::GlobalFunction,
        KeyType::Logic,
        KeyType::UseCase,
        KeyType::Scenario,
        KeyType::Object,
        KeyType::Actor,
        KeyType::Association,
        KeyType::Generalization,
        KeyType::DataType,
    ];

    /// Segment label used in the string form
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::Domain => "domain",
            KeyType::Subdomain => "subdomain",
            KeyType::Class => "class",
            KeyType::Attribute => "attribute",
            KeyType::State => "state",
            KeyType::Event => "event",
            KeyType::Guard => "guard",
            KeyType::Action => "action",
            KeyType::Query => "query",
            KeyType::Transition => "transition",
            KeyType::GlobalFunction => "gfunc",
            KeyType::Logic => "logic",
            KeyType::UseCase => "usecase",
            KeyType::Scenario => "scenario",
            KeyType::Object => "object",
            KeyType::Actor => "actor",
            KeyType::Association => "association",
            KeyType::Generalization => "generalization",
            KeyType::DataType => "datatype",
        }
    }

    fn from_label(label: &str) -> Option<KeyType> {
        KeyType::ALL.into_iter().find(|t| t.as_str() == label)
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `(type, sub key)` step of a key path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeySegment {
    pub key_type: KeyType,
    pub sub_key: String,
}

/// Structured identifier of a model entity
///
/// Sub keys are trimmed and lowercased on construction and may not be empty
/// or contain `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key {
    segments: Vec<KeySegment>,
}

impl Key {
    /// Create a top-level key
    pub fn new(key_type: KeyType, sub_key: &str) -> Result<Self> {
        Ok(Self {
            segments: vec![segment(key_type, sub_key)?],
        })
    }

    /// Create a key nested under this one
    pub fn child(&self, key_type: KeyType, sub_key: &str) -> Result<Self> {
        let mut segments = self.segments.clone();
        segments.push(segment(key_type, sub_key)?);
        Ok(Self { segments })
    }

    /// Parse the string form of a key
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = |reason: &str| TreeError::InvalidKey {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        if value.trim().is_empty() {
            return Err(invalid("key is empty"));
        }

        let parts: Vec<&str> = value.split('/').collect();
        if parts.len() % 2 != 0 {
            return Err(invalid("expected alternating type and sub key segments"));
        }

        let mut segments = Vec::with_capacity(parts.len() / 2);
        for pair in parts.chunks(2) {
            let key_type = KeyType::from_label(pair[0])
                .ok_or_else(|| invalid(&format!("unknown key type '{}'", pair[0])))?;
            segments.push(segment(key_type, pair[1]).map_err(|_| invalid("empty sub key"))?);
        }

        Ok(Self { segments })
    }

    /// Parse a key and require its leaf segment to be of `expected` type
    pub fn parse_as(value: &str, expected: KeyType) -> Result<Self> {
        let key = Self::parse(value)?;
        if key.key_type() != expected {
            return Err(TreeError::InvalidKey {
                value: value.to_string(),
                reason: format!("expected a {} key, found {}", expected, key.key_type()),
            });
        }
        Ok(key)
    }

    /// Type of the entity this key names
    pub fn key_type(&self) -> KeyType {
        self.leaf().key_type
    }

    /// Sub key of the entity this key names
    pub fn sub_key(&self) -> &str {
        &self.leaf().sub_key
    }

    /// Key of the enclosing entity, if any
    pub fn parent(&self) -> Option<Key> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn segments(&self) -> &[KeySegment] {
        &self.segments
    }

    fn leaf(&self) -> &KeySegment {
        // Construction guarantees at least one segment.
        &self.segments[self.segments.len() - 1]
    }
}

fn segment(key_type: KeyType, sub_key: &str) -> Result<KeySegment> {
    let sub_key = sub_key.trim().to_lowercase();
    if sub_key.is_empty() || sub_key.contains('/') {
        return Err(TreeError::InvalidKey {
            value: sub_key,
            reason: format!("invalid sub key for {} segment", key_type),
        });
    }
    Ok(KeySegment { key_type, sub_key })
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}/{}", seg.key_type, seg.sub_key)?;
        }
        Ok(())
    }
}

impl FromStr for Key {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self> {
        Key::parse(s)
    }
}

impl Serialize for Key {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Key::parse(&s).map_err(serde::de::Error::custom)
    }
}
