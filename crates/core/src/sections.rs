//! Named free-form content sections attached to project details.
//!
//! Each section is an arbitrary JSON object (title, lists, descriptions...)
//! that is stored and returned verbatim. Only the set of section names and
//! the "must be an object" rule are enforced here, plus a ban on NUL
//! characters which Postgres cannot store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

/// A single section body.
pub type SectionBody = Map<String, Value>;

/// Canonical section names, in display order.
pub const SECTION_NAMES: &[&str] = &[
    "background",
    "role",
    "findingProblem",
    "oldDesign",
    "research",
    "definingProblem",
    "ideation",
    "redesign",
    "keyTakeaways",
];

/// Legacy spellings still accepted from older clients.
const SECTION_ALIASES: &[(&str, &str)] = &[("redisgn", "redesign"), ("keytakeways", "keyTakeaways")];

/// Resolve a wire name (canonical or legacy alias) to its canonical section name.
pub fn canonical_section_name(name: &str) -> Option<&'static str> {
    SECTION_NAMES
        .iter()
        .copied()
        .find(|s| *s == name)
        .or_else(|| {
            SECTION_ALIASES
                .iter()
                .find(|(alias, _)| *alias == name)
                .map(|(_, canonical)| *canonical)
        })
}

/// Bag of named section objects keyed by canonical section name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentSections(BTreeMap<String, SectionBody>);

impl ContentSections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under the canonical name for `name`.
    ///
    /// Fails when the name is not a known section or the value is not a
    /// JSON object. `null` is treated as an empty object.
    pub fn insert(&mut self, name: &str, value: Value) -> Result<(), CoreError> {
        let canonical = canonical_section_name(name)
            .ok_or_else(|| CoreError::Validation(format!("Unknown section '{name}'")))?;
        let body = match value {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(CoreError::Validation(format!(
                    "Section '{canonical}' must be a JSON object, got {}",
                    json_kind(&other)
                )))
            }
        };
        if body.iter().any(|(k, v)| k.contains('\0') || contains_nul(v)) {
            return Err(CoreError::Validation(format!(
                "Section '{canonical}' must not contain NUL characters"
            )));
        }
        self.0.insert(canonical.to_string(), body);
        Ok(())
    }

    /// Return a copy with every known section present, missing ones empty.
    pub fn with_defaults(mut self) -> Self {
        for name in SECTION_NAMES {
            self.0.entry((*name).to_string()).or_default();
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&SectionBody> {
        canonical_section_name(name).and_then(|canonical| self.0.get(canonical))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Postgres text and JSONB cannot store U+0000.
fn contains_nul(value: &Value) -> bool {
    match value {
        Value::String(s) => s.contains('\0'),
        Value::Array(items) => items.iter().any(contains_nul),
        Value::Object(map) => map.iter().any(|(k, v)| k.contains('\0') || contains_nul(v)),
        _ => false,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
