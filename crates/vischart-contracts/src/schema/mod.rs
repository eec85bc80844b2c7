mod validate;

use serde_json::{json, Map, Value};

pub use validate::{validate, ValidationOutcome};

/// Literal default applied to an optional field that was not supplied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Str(&'static str),
    Num(f64),
    Bool(bool),
    EmptyObject,
}

impl DefaultValue {
    pub fn to_value(self) -> Value {
        match self {
            Self::Str(value) => Value::String(value.to_string()),
            Self::Num(value) => json!(value),
            Self::Bool(value) => Value::Bool(value),
            Self::EmptyObject => Value::Object(Map::new()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Accepts any JSON value unchanged.
    Any,
    String,
    Number {
        min: Option<f64>,
        max: Option<f64>,
    },
    Boolean,
    Enum(&'static [&'static str]),
    Array {
        item: &'static FieldKind,
        min_items: usize,
    },
    /// Object with declared fields; undeclared keys are dropped.
    Object(&'static [FieldSpec]),
    /// Free-form object, passed through as-is.
    Map,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub default: Option<DefaultValue>,
    pub description: &'static str,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            default: None,
            description,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: None,
            description,
        }
    }

    pub const fn with_default(
        name: &'static str,
        kind: FieldKind,
        default: DefaultValue,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: Some(default),
            description,
        }
    }
}

/// Structural schema for one chart type's arguments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartSchema {
    pub fields: &'static [FieldSpec],
}

impl ChartSchema {
    pub const fn new(fields: &'static [FieldSpec]) -> Self {
        Self { fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn to_json_schema(&self) -> Value {
        object_schema(self.fields)
    }
}

fn object_schema(fields: &[FieldSpec]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for field in fields {
        let mut property = kind_schema(&field.kind);
        if let Value::Object(obj) = &mut property {
            if !field.description.is_empty() {
                obj.insert(
                    "description".to_string(),
                    Value::String(field.description.to_string()),
                );
            }
            if let Some(default) = field.default {
                obj.insert("default".to_string(), default.to_value());
            }
        }
        properties.insert(field.name.to_string(), property);
        if field.required {
            required.push(Value::String(field.name.to_string()));
        }
    }
    let mut schema = Map::new();
    schema.insert("type".to_string(), json!("object"));
    schema.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".to_string(), Value::Array(required));
    }
    Value::Object(schema)
}

fn kind_schema(kind: &FieldKind) -> Value {
    match kind {
        FieldKind::Any => json!({}),
        FieldKind::String => json!({ "type": "string" }),
        FieldKind::Number { min, max } => {
            let mut schema = Map::new();
            schema.insert("type".to_string(), json!("number"));
            if let Some(min) = min {
                schema.insert("minimum".to_string(), json!(min));
            }
            if let Some(max) = max {
                schema.insert("maximum".to_string(), json!(max));
            }
            Value::Object(schema)
        }
        FieldKind::Boolean => json!({ "type": "boolean" }),
        FieldKind::Enum(values) => json!({ "type": "string", "enum": values }),
        FieldKind::Array { item, min_items } => {
            let mut schema = Map::new();
            schema.insert("type".to_string(), json!("array"));
            schema.insert("items".to_string(), kind_schema(item));
            if *min_items > 0 {
                schema.insert("minItems".to_string(), json!(min_items));
            }
            Value::Object(schema)
        }
        FieldKind::Object(fields) => object_schema(fields),
        FieldKind::Map => json!({ "type": "object" }),
    }
}
