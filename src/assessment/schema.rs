//! Declared output schema sent with each structured request.
//!
//! Serializes to the Gemini `responseSchema` shape. `to_json_schema` gives
//! the equivalent JSON Schema document that replies are validated against.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaType {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSchema {
    #[serde(rename = "type")]
    pub kind: SchemaType,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ResponseSchema>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, ResponseSchema>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub property_ordering: Vec<String>,
}

impl ResponseSchema {
    fn leaf(kind: SchemaType) -> Self {
        Self {
            kind,
            allowed: None,
            items: None,
            properties: BTreeMap::new(),
            required: Vec::new(),
            property_ordering: Vec::new(),
        }
    }

    pub fn string() -> Self {
        Self::leaf(SchemaType::String)
    }

    pub fn number() -> Self {
        Self::leaf(SchemaType::Number)
    }

    pub fn boolean() -> Self {
        Self::leaf(SchemaType::Boolean)
    }

    /// A string restricted to a closed set of values.
    pub fn enumeration(values: &[&str]) -> Self {
        Self {
            allowed: Some(values.iter().map(|v| v.to_string()).collect()),
            ..Self::leaf(SchemaType::String)
        }
    }

    pub fn array(items: ResponseSchema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::leaf(SchemaType::Array)
        }
    }

    /// An object whose listed properties are all required, in this order.
    pub fn object(properties: Vec<(&str, ResponseSchema)>) -> Self {
        let names: Vec<String> = properties.iter().map(|(n, _)| n.to_string()).collect();
        Self {
            properties: properties
                .into_iter()
                .map(|(n, s)| (n.to_string(), s))
                .collect(),
            required: names.clone(),
            property_ordering: names,
            ..Self::leaf(SchemaType::Object)
        }
    }

    /// The same declaration as a JSON Schema document, closed to
    /// properties it does not list.
    pub fn to_json_schema(&self) -> Value {
        let mut doc = Map::new();
        doc.insert("type".into(), Value::from(self.kind.json_type()));
        if let Some(allowed) = &self.allowed {
            doc.insert("enum".into(), json!(allowed));
        }
        if let Some(items) = &self.items {
            doc.insert("items".into(), items.to_json_schema());
        }
        if self.kind == SchemaType::Object {
            let properties: Map<String, Value> = self
                .properties
                .iter()
                .map(|(name, schema)| (name.clone(), schema.to_json_schema()))
                .collect();
            doc.insert("properties".into(), Value::Object(properties));
            doc.insert("required".into(), json!(self.required));
            doc.insert("additionalProperties".into(), Value::Bool(false));
        }
        Value::Object(doc)
    }
}

impl SchemaType {
    fn json_type(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}
