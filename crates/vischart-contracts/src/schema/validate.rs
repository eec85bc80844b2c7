use serde_json::{Map, Value};

use super::{ChartSchema, FieldKind, FieldSpec};

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// Declared fields only, with defaults filled in.
    Valid(Map<String, Value>),
    /// Every violation found, joined into one message.
    Invalid(String),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

pub fn validate(schema: &ChartSchema, args: &Map<String, Value>) -> ValidationOutcome {
    let mut violations = Vec::new();
    let sanitized = validate_fields(schema.fields, args, "", &mut violations);
    if violations.is_empty() {
        ValidationOutcome::Valid(sanitized)
    } else {
        ValidationOutcome::Invalid(format!("Invalid parameters: {}", violations.join("; ")))
    }
}

fn validate_fields(
    fields: &[FieldSpec],
    object: &Map<String, Value>,
    path: &str,
    violations: &mut Vec<String>,
) -> Map<String, Value> {
    let mut out = Map::new();
    for field in fields {
        let field_path = join_path(path, field.name);
        match object.get(field.name).filter(|value| !value.is_null()) {
            Some(value) => {
                if let Some(checked) = check_value(&field.kind, value, &field_path, violations) {
                    out.insert(field.name.to_string(), checked);
                }
            }
            None if field.required => violations.push(format!("{field_path}: required")),
            None => {
                if let Some(default) = field.default {
                    out.insert(field.name.to_string(), default.to_value());
                }
            }
        }
    }
    out
}

fn check_value(
    kind: &FieldKind,
    value: &Value,
    path: &str,
    violations: &mut Vec<String>,
) -> Option<Value> {
    match kind {
        FieldKind::Any => Some(value.clone()),
        FieldKind::String => {
            if value.is_string() {
                return Some(value.clone());
            }
            violations.push(format!("{path}: expected string"));
            None
        }
        FieldKind::Number { min, max } => {
            let Some(number) = value.as_f64() else {
                violations.push(format!("{path}: expected number"));
                return None;
            };
            if let Some(min) = min.filter(|min| number < *min) {
                violations.push(format!("{path}: must be >= {min}"));
                return None;
            }
            if let Some(max) = max.filter(|max| number > *max) {
                violations.push(format!("{path}: must be <= {max}"));
                return None;
            }
            Some(value.clone())
        }
        FieldKind::Boolean => {
            if value.is_boolean() {
                return Some(value.clone());
            }
            violations.push(format!("{path}: expected boolean"));
            None
        }
        FieldKind::Enum(allowed) => {
            match value.as_str() {
                Some(text) if allowed.iter().any(|candidate| *candidate == text) => {
                    return Some(value.clone())
                }
                _ => {}
            }
            violations.push(format!("{path}: expected one of {}", allowed.join(", ")));
            None
        }
        FieldKind::Array { item, min_items } => {
            let Some(items) = value.as_array() else {
                violations.push(format!("{path}: expected array"));
                return None;
            };
            if items.len() < *min_items {
                violations.push(format!("{path}: must contain at least {min_items} item(s)"));
                return None;
            }
            let before = violations.len();
            let checked: Vec<Value> = items
                .iter()
                .enumerate()
                .filter_map(|(idx, entry)| {
                    check_value(item, entry, &format!("{path}[{idx}]"), violations)
                })
                .collect();
            (violations.len() == before).then_some(Value::Array(checked))
        }
        FieldKind::Object(fields) => {
            let Some(object) = value.as_object() else {
                violations.push(format!("{path}: expected object"));
                return None;
            };
            let before = violations.len();
            let checked = validate_fields(fields, object, path, violations);
            (violations.len() == before).then_some(Value::Object(checked))
        }
        FieldKind::Map => {
            if value.is_object() {
                return Some(value.clone());
            }
            violations.push(format!("{path}: expected object"));
            None
        }
    }
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}
