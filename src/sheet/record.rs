//! Character Record Schema
//!
//! The single persisted aggregate. Field names match the stored JSON exactly
//! (`characterName`, `trackers.momentum`, ...), so exports from older sheets
//! keep loading.
//!
//! Decoding is lenient: any JSON value decodes to a record. Missing or
//! mistyped fields fall back to the empty value of their type and unknown
//! ratings fall back to the component default.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::sheet::rating::DieRating;

/// Snapshot of a whole character sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    #[serde(default, deserialize_with = "lenient::string")]
    pub character_name: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub player_name: String,

    /// Anonymous slots, matched by position.
    #[serde(default, deserialize_with = "lenient::list")]
    pub distinctions: Vec<StatementTrait>,

    /// Named set, matched by name.
    #[serde(default, deserialize_with = "lenient::list")]
    pub values: Vec<StatementTrait>,

    #[serde(default, deserialize_with = "lenient::list")]
    pub approaches: Vec<RatedTrait>,

    #[serde(default, deserialize_with = "lenient::list")]
    pub roles: Vec<RatedTrait>,

    #[serde(default, deserialize_with = "lenient::object")]
    pub trackers: Trackers,

    /// Anonymous slots, matched by position.
    #[serde(default, deserialize_with = "lenient::list")]
    pub talents: Vec<Talent>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub notes: String,
}

impl CharacterRecord {
    /// Parse JSON text. Fails only when the text is not JSON at all.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(value))
    }

    /// Decode an already parsed JSON value. Non-object values yield the empty record.
    pub fn from_value(value: Value) -> Self {
        if value.is_object() {
            serde_json::from_value(value).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// Serialize to the compact JSON text written to the store.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A rated trait with a free-text statement (distinctions and values).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementTrait {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,

    #[serde(default = "trait_default", deserialize_with = "lenient::trait_rating")]
    pub rating: DieRating,

    #[serde(default, deserialize_with = "lenient::string")]
    pub statement: String,
}

impl StatementTrait {
    pub fn new(name: impl Into<String>, rating: DieRating, statement: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rating,
            statement: statement.into(),
        }
    }
}

impl Default for StatementTrait {
    fn default() -> Self {
        Self::new("", DieRating::TRAIT_DEFAULT, "")
    }
}

/// A rated trait without a statement (approaches and roles).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatedTrait {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,

    #[serde(default = "skill_default", deserialize_with = "lenient::skill_rating")]
    pub rating: DieRating,
}

impl RatedTrait {
    pub fn new(name: impl Into<String>, rating: DieRating) -> Self {
        Self {
            name: name.into(),
            rating,
        }
    }
}

impl Default for RatedTrait {
    fn default() -> Self {
        Self::new("", DieRating::SKILL_DEFAULT)
    }
}

/// Tracker state. Point order carries no meaning beyond the filled count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trackers {
    #[serde(default, deserialize_with = "lenient::points")]
    pub physical: Vec<bool>,

    #[serde(default, deserialize_with = "lenient::points")]
    pub mental: Vec<bool>,

    /// `None` when the record does not carry a resolve value.
    #[serde(
        default,
        deserialize_with = "lenient::resolve",
        skip_serializing_if = "Option::is_none"
    )]
    pub resolve: Option<u8>,

    #[serde(default, deserialize_with = "lenient::points")]
    pub momentum: Vec<bool>,
}

/// A talent slot. `filled` is derived from the text fields and cannot be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TalentFields")]
pub struct Talent {
    name: String,
    tag: String,
    description: String,
    filled: bool,
}

impl Talent {
    pub fn new(
        name: impl Into<String>,
        tag: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let tag = tag.into();
        let description = description.into();
        let filled = [&name, &tag, &description]
            .iter()
            .any(|field| !field.trim().is_empty());
        Self {
            name,
            tag,
            description,
            filled,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn filled(&self) -> bool {
        self.filled
    }
}

/// Wire shape of a talent; a stored `filled` flag is ignored.
#[derive(Deserialize)]
struct TalentFields {
    #[serde(default, deserialize_with = "lenient::string")]
    name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    tag: String,
    #[serde(default, deserialize_with = "lenient::string")]
    description: String,
}

impl From<TalentFields> for Talent {
    fn from(fields: TalentFields) -> Self {
        Talent::new(fields.name, fields.tag, fields.description)
    }
}

fn trait_default() -> DieRating {
    DieRating::TRAIT_DEFAULT
}

fn skill_default() -> DieRating {
    DieRating::SKILL_DEFAULT
}

/// Field decoders that accept any JSON value.
mod lenient {
    use super::*;

    pub fn string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => String::new(),
        })
    }

    /// Non-array values become an empty list; malformed entries keep their
    /// position as a default entry.
    pub fn list<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Array(items) => items
                .into_iter()
                .map(|item| {
                    if item.is_object() {
                        serde_json::from_value(item).unwrap_or_default()
                    } else {
                        T::default()
                    }
                })
                .collect(),
            _ => Vec::new(),
        })
    }

    pub fn object<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let value = Value::deserialize(deserializer)?;
        if value.is_object() {
            Ok(serde_json::from_value(value).unwrap_or_default())
        } else {
            Ok(T::default())
        }
    }

    fn rating_or(value: Value, default: DieRating) -> DieRating {
        match value {
            Value::String(s) => DieRating::parse_or(&s, default),
            _ => default,
        }
    }

    pub fn trait_rating<'de, D>(deserializer: D) -> std::result::Result<DieRating, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(rating_or(Value::deserialize(deserializer)?, DieRating::TRAIT_DEFAULT))
    }

    pub fn skill_rating<'de, D>(deserializer: D) -> std::result::Result<DieRating, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(rating_or(Value::deserialize(deserializer)?, DieRating::SKILL_DEFAULT))
    }

    /// Tracker points use truthiness: `1`, `"x"` and `true` all count as filled.
    pub fn points<'de, D>(deserializer: D) -> std::result::Result<Vec<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Array(items) => items.iter().map(truthy).collect(),
            _ => Vec::new(),
        })
    }

    fn truthy(value: &Value) -> bool {
        match value {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0 && !f.is_nan()),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }

    /// Older sheets stored resolve as display text ("3").
    pub fn resolve<'de, D>(deserializer: D) -> std::result::Result<Option<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let number = match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        Ok(number.map(|n| n.clamp(0, i64::from(u8::MAX)) as u8))
    }
}
