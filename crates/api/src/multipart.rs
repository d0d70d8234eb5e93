//! Multipart form decoding shared by the create and update handlers.
//!
//! Text fields are kept in arrival order so repeated keys such as
//! `background[backgroundList][]` build arrays in the order sent. File
//! fields become [`ImageUpload`]s keyed by field name.
//!
//! Content sections may arrive in two shapes:
//!
//! - a single text field holding a JSON object, e.g. `role={"title":"..."}`
//! - bracket notation, e.g. `role[title]=...` and `role[roleList][]=...`

use std::collections::{BTreeMap, HashMap};

use axum::extract::Multipart;
use folio_core::error::CoreError;
use folio_core::sections::{canonical_section_name, ContentSections};
use folio_media::ImageUpload;
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};

/// Deepest bracket path accepted in a section field name, e.g.
/// `research[steps][0][label]` is three levels.
const MAX_KEY_DEPTH: usize = 8;

/// Decoded multipart request body.
#[derive(Debug, Default)]
pub struct FormData {
    fields: Vec<(String, String)>,
    files: HashMap<String, ImageUpload>,
}

impl FormData {
    /// Drain a multipart stream into memory.
    ///
    /// A field counts as a file when it carries a filename. Files with an
    /// empty body are dropped, as are fields without a name.
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = FormData::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.body_text()))?;
                    if bytes.is_empty() {
                        continue;
                    }
                    form.files.insert(
                        name,
                        ImageUpload {
                            bytes: bytes.to_vec(),
                            file_name,
                            content_type,
                        },
                    );
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.body_text()))?;
                    form.fields.push((name, text));
                }
            }
        }

        Ok(form)
    }

    /// Last non-empty value sent for `name`.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|(key, value)| key == name && !value.trim().is_empty())
            .map(|(_, value)| value.as_str())
    }

    /// Remove and return the uploaded file sent under `name`.
    pub fn take_file(&mut self, name: &str) -> Option<ImageUpload> {
        self.files.remove(name)
    }

    /// Collect every content section present in the form.
    ///
    /// Fields whose base name is not a section (including legacy aliases)
    /// are ignored. A JSON text field replaces anything assembled so far for
    /// the same section.
    pub fn sections(&self) -> Result<ContentSections, CoreError> {
        let mut assembled: BTreeMap<&'static str, Value> = BTreeMap::new();

        for (key, value) in &self.fields {
            let Some((base, path)) = parse_bracket_key(key) else {
                continue;
            };
            let Some(canonical) = canonical_section_name(base) else {
                continue;
            };
            if path.len() > MAX_KEY_DEPTH {
                return Err(CoreError::Validation(format!(
                    "Section '{canonical}' field nests deeper than {MAX_KEY_DEPTH} levels"
                )));
            }

            if path.is_empty() {
                if value.trim().is_empty() {
                    continue;
                }
                let parsed: Value = serde_json::from_str(value).map_err(|e| {
                    CoreError::Validation(format!("Section '{canonical}' is not valid JSON: {e}"))
                })?;
                assembled.insert(canonical, parsed);
            } else {
                let slot = assembled.entry(canonical).or_insert(Value::Null);
                assign(slot, &path, Value::String(value.clone()));
            }
        }

        let mut sections = ContentSections::new();
        for (name, value) in assembled {
            sections.insert(name, value)?;
        }
        Ok(sections)
    }
}

/// Split `a[b][c]` into `("a", ["b", "c"])`. Returns `None` for malformed keys.
///
/// Stops one segment past [`MAX_KEY_DEPTH`] so oversized keys are cheap to reject.
fn parse_bracket_key(key: &str) -> Option<(&str, Vec<&str>)> {
    let Some(open) = key.find('[') else {
        return Some((key, Vec::new()));
    };
    let (base, mut rest) = key.split_at(open);
    if base.is_empty() {
        return None;
    }

    let mut path = Vec::new();
    while !rest.is_empty() && path.len() <= MAX_KEY_DEPTH {
        let inner = rest.strip_prefix('[')?;
        let close = inner.find(']')?;
        path.push(&inner[..close]);
        rest = &inner[close + 1..];
    }
    Some((base, path))
}

/// Place `value` at `path` inside `target`, creating containers as needed.
///
/// An empty segment appends to an array; a numeric segment indexes one
/// (capped at the current length). Any other segment is an object key.
fn assign(target: &mut Value, path: &[&str], value: Value) {
    let Some((segment, rest)) = path.split_first() else {
        *target = value;
        return;
    };

    let index_like = segment.is_empty() || segment.parse::<usize>().is_ok();

    if let Value::Object(map) = target {
        let slot = map.entry((*segment).to_string()).or_insert(Value::Null);
        assign(slot, rest, value);
        return;
    }

    if index_like {
        if !target.is_array() {
            *target = Value::Array(Vec::new());
        }
        if let Value::Array(items) = target {
            let index = segment
                .parse::<usize>()
                .map_or(items.len(), |i| i.min(items.len()));
            if index == items.len() {
                items.push(Value::Null);
            }
            assign(&mut items[index], rest, value);
        }
    } else {
        let mut map = Map::new();
        let mut slot = Value::Null;
        assign(&mut slot, rest, value);
        map.insert((*segment).to_string(), slot);
        *target = Value::Object(map);
    }
}
