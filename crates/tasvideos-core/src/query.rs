//! Query-string helpers shared by list endpoints: sort directives and
//! field selection.
//!
//! Both operate on the *response* shape: clients name properties as they
//! appear in JSON, and matching is case-insensitive.

use serde_json::{Map, Value};

use crate::error::{ApiError, FieldError};

/// Direction of a single sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One entry of a `sort=` parameter such as `-createTimestamp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortDirective {
    pub field: String,
    pub direction: SortDirection,
}

impl SortDirective {
    /// Parse a comma-separated sort list.
    ///
    /// A leading `-` sorts descending, a leading `+` (or nothing) ascending.
    /// Blank entries are skipped, so `"title,,"` is just `title`.
    pub fn parse_list(raw: &str) -> Vec<SortDirective> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|entry| {
                let (direction, field) = match entry.as_bytes()[0] {
                    b'-' => (SortDirection::Descending, &entry[1..]),
                    b'+' => (SortDirection::Ascending, &entry[1..]),
                    _ => (SortDirection::Ascending, entry),
                };
                let field = field.trim();
                (!field.is_empty()).then(|| SortDirective {
                    field: field.to_string(),
                    direction,
                })
            })
            .collect()
    }

    pub fn is_descending(&self) -> bool {
        self.direction == SortDirection::Descending
    }
}

/// Check every directive against the sortable property names.
///
/// On failure the error carries a single `sort` field entry that lists
/// every unknown property.
pub fn validate_sort(directives: &[SortDirective], allowed: &[&str]) -> Result<(), ApiError> {
    let unknown: Vec<&str> = directives
        .iter()
        .filter(|d| !allowed.iter().any(|a| a.eq_ignore_ascii_case(&d.field)))
        .map(|d| d.field.as_str())
        .collect();

    if unknown.is_empty() {
        return Ok(());
    }

    Err(ApiError::validation_fields(vec![FieldError::with_code(
        "sort",
        format!("Invalid Sort parameter: {}", unknown.join(", ")),
        "invalid_sort",
    )]))
}

/// Set of response properties requested through `fields=`.
///
/// An empty selection keeps every property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelection {
    fields: Vec<String>,
}

impl FieldSelection {
    pub fn parse(raw: Option<&str>) -> Self {
        let fields = raw
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_ascii_lowercase)
            .collect();
        FieldSelection { fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Keep only the selected keys of a JSON object.
    ///
    /// Non-object values pass through untouched. Names that match no key
    /// are ignored.
    pub fn project(&self, value: Value) -> Value {
        if self.is_empty() {
            return value;
        }
        match value {
            Value::Object(map) => {
                let kept: Map<String, Value> = map
                    .into_iter()
                    .filter(|(key, _)| self.fields.contains(&key.to_ascii_lowercase()))
                    .collect();
                Value::Object(kept)
            }
            other => other,
        }
    }

    /// Project every element of a list. Duplicates are kept, so the result
    /// always has as many entries as the input.
    pub fn project_all(&self, values: Vec<Value>) -> Vec<Value> {
        values.into_iter().map(|v| self.project(v)).collect()
    }
}
