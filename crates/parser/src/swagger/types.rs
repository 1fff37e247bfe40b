//! Swagger 2 / OpenAPI 3 document types
//!
//! Simplified representation covering the shapes the resolver reads. Maps
//! keep document order. Scalar fields that carry the wrong JSON type degrade
//! to absent. Structured nodes with the wrong shape are kept as
//! [`Lenient::Malformed`] or a `malformed` schema node so the converter can
//! report them instead of rejecting the whole document.

use indexmap::IndexMap;
use restgen_common::HttpVerb;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A node that either deserialized or is kept with the reason it did not
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Lenient<T> {
    Valid(T),
    Malformed(String),
}

impl<T> Lenient<T> {
    pub fn valid(&self) -> Option<&T> {
        match self {
            Lenient::Valid(node) => Some(node),
            Lenient::Malformed(_) => None,
        }
    }

    pub fn malformed(&self) -> Option<&str> {
        match self {
            Lenient::Valid(_) => None,
            Lenient::Malformed(reason) => Some(reason),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Lenient<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match serde_json::from_value(value) {
            Ok(node) => Lenient::Valid(node),
            Err(e) => Lenient::Malformed(e.to_string()),
        })
    }
}

/// Named nodes where each entry may be malformed on its own
pub type NodeMap<T> = IndexMap<String, Lenient<T>>;

/// Document root, both Swagger 2 and OpenAPI 3 layouts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwaggerDocument {
    /// Swagger version (e.g., "2.0")
    #[serde(default, deserialize_with = "lenient_string")]
    pub swagger: Option<String>,

    /// OpenAPI version (e.g., "3.0.0")
    #[serde(default, deserialize_with = "lenient_string")]
    pub openapi: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub info: Option<Info>,

    #[serde(rename = "basePath", default, deserialize_with = "lenient_string")]
    pub base_path: Option<String>,

    /// Path templates to per-verb operations
    #[serde(default)]
    pub paths: Option<Lenient<NodeMap<PathItem>>>,

    /// Flat type universe (Swagger 2)
    #[serde(default)]
    pub definitions: Option<Lenient<IndexMap<String, SchemaNode>>>,

    /// Flat reusable parameters (Swagger 2)
    #[serde(default)]
    pub parameters: Option<Lenient<NodeMap<ParameterNode>>>,

    /// Nested type universe (OpenAPI 3)
    #[serde(default)]
    pub components: Option<Lenient<Components>>,
}

impl SwaggerDocument {
    /// Whether any definitions map is present, flat or nested
    pub fn has_type_universe(&self) -> bool {
        self.definitions.is_some() || self.components().is_some_and(|c| c.schemas.is_some())
    }

    /// All definition schemas, flat ones first
    pub fn definition_schemas(&self) -> impl Iterator<Item = (&String, &SchemaNode)> {
        let flat = self.definitions.as_ref().and_then(Lenient::valid);
        let nested = self
            .components()
            .and_then(|c| c.schemas.as_ref())
            .and_then(Lenient::valid);
        flat.into_iter().chain(nested).flatten()
    }

    /// All reusable parameters, flat ones first
    pub fn parameter_nodes(&self) -> impl Iterator<Item = (&String, &Lenient<ParameterNode>)> {
        let flat = self.parameters.as_ref().and_then(Lenient::valid);
        let nested = self
            .components()
            .and_then(|c| c.parameters.as_ref())
            .and_then(Lenient::valid);
        flat.into_iter().chain(nested).flatten()
    }

    /// Top-level sections other than `paths` that have the wrong shape
    pub fn malformed_sections(&self) -> Vec<(&'static str, &str)> {
        let components = self.components();
        [
            ("definitions", self.definitions.as_ref().and_then(Lenient::malformed)),
            ("parameters", self.parameters.as_ref().and_then(Lenient::malformed)),
            ("components", self.components.as_ref().and_then(Lenient::malformed)),
            (
                "components.schemas",
                components
                    .and_then(|c| c.schemas.as_ref())
                    .and_then(Lenient::malformed),
            ),
            (
                "components.parameters",
                components
                    .and_then(|c| c.parameters.as_ref())
                    .and_then(Lenient::malformed),
            ),
        ]
        .into_iter()
        .filter_map(|(section, reason)| reason.map(|reason| (section, reason)))
        .collect()
    }

    pub fn title(&self) -> Option<&str> {
        self.info.as_ref().and_then(|info| info.title.as_deref())
    }

    fn components(&self) -> Option<&Components> {
        self.components.as_ref().and_then(Lenient::valid)
    }
}

/// API information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Info {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub version: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
}

/// Reusable components (OpenAPI 3)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub schemas: Option<Lenient<IndexMap<String, SchemaNode>>>,

    #[serde(default)]
    pub parameters: Option<Lenient<NodeMap<ParameterNode>>>,
}

/// Operations available on one path template
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(default)]
    pub get: Option<Lenient<Operation>>,

    #[serde(default)]
    pub put: Option<Lenient<Operation>>,

    #[serde(default)]
    pub post: Option<Lenient<Operation>>,

    #[serde(default)]
    pub delete: Option<Lenient<Operation>>,

    #[serde(default)]
    pub patch: Option<Lenient<Operation>>,

    #[serde(default)]
    pub head: Option<Lenient<Operation>>,

    #[serde(default)]
    pub options: Option<Lenient<Operation>>,

    /// Parameters shared by every operation of this path
    #[serde(default)]
    pub parameters: Vec<Lenient<ParameterNode>>,
}

impl PathItem {
    /// Declared operations in a fixed verb order
    pub fn operations(&self) -> impl Iterator<Item = (HttpVerb, &Lenient<Operation>)> {
        [
            (HttpVerb::Get, &self.get),
            (HttpVerb::Put, &self.put),
            (HttpVerb::Post, &self.post),
            (HttpVerb::Delete, &self.delete),
            (HttpVerb::Patch, &self.patch),
            (HttpVerb::Head, &self.head),
            (HttpVerb::Options, &self.options),
        ]
        .into_iter()
        .filter_map(|(verb, op)| op.as_ref().map(|op| (verb, op)))
    }
}

/// HTTP operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "operationId", default, deserialize_with = "lenient_string")]
    pub operation_id: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub summary: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "lenient_strings")]
    pub tags: Vec<String>,

    #[serde(default)]
    pub parameters: Vec<Lenient<ParameterNode>>,

    /// Request body (OpenAPI 3)
    #[serde(rename = "requestBody", default)]
    pub request_body: Option<Lenient<RequestBody>>,

    /// Status code to response
    #[serde(default)]
    pub responses: NodeMap<ResponseNode>,
}

/// Parameter declaration, inline or `$ref`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParameterNode {
    #[serde(rename = "$ref", default, deserialize_with = "lenient_string")]
    pub ref_path: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,

    /// Location: path, query, header, body, formData, cookie
    #[serde(rename = "in", default, deserialize_with = "lenient_string")]
    pub location: Option<String>,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub required: bool,

    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,

    /// Inline type (Swagger 2 non-body parameters)
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub schema_type: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub format: Option<String>,

    #[serde(default)]
    pub items: Option<Box<SchemaNode>>,

    #[serde(rename = "enum", default, deserialize_with = "lenient_values")]
    pub enum_values: Option<Vec<Value>>,

    /// Structured parameter schema (Swagger 2 body, OpenAPI 3 all)
    #[serde(default)]
    pub schema: Option<Box<SchemaNode>>,
}

impl ParameterNode {
    /// The inline type fields viewed as a schema node
    pub fn inline_schema(&self) -> SchemaNode {
        SchemaNode {
            schema_type: self.schema_type.clone(),
            format: self.format.clone(),
            items: self.items.clone(),
            enum_values: self.enum_values.clone(),
            ..SchemaNode::default()
        }
    }
}

/// OpenAPI 3 request body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,

    #[serde(default)]
    pub content: IndexMap<String, MediaType>,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub required: bool,
}

/// Response declaration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseNode {
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,

    /// Swagger 2 body schema
    #[serde(default)]
    pub schema: Option<SchemaNode>,

    /// OpenAPI 3 media types
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

impl ResponseNode {
    /// `schema`, or the schema of the first media type entry
    pub fn body_schema(&self) -> Option<&SchemaNode> {
        self.schema.as_ref().or_else(|| {
            self.content
                .values()
                .next()
                .and_then(|media| media.schema.as_ref())
        })
    }
}

/// Media type entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(default)]
    pub schema: Option<SchemaNode>,
}

/// Schema or property node
///
/// Deserializing never fails. A value that is not a schema object becomes a
/// node with only `malformed` set, which classifies as `Any`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaNode {
    /// Type: boolean, number, integer, string, date, array, object
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, SchemaNode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,

    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub ref_path: Option<String>,

    /// Why this position could not be read as a schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub malformed: Option<String>,
}

impl SchemaNode {
    pub fn of_type(schema_type: &str) -> Self {
        Self {
            schema_type: Some(schema_type.to_string()),
            ..Self::default()
        }
    }

    pub fn reference(ref_path: &str) -> Self {
        Self {
            ref_path: Some(ref_path.to_string()),
            ..Self::default()
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            malformed: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn is_malformed(&self) -> bool {
        self.malformed.is_some()
    }

    pub fn items_ref(&self) -> Option<&str> {
        self.items.as_ref().and_then(|items| items.ref_path.as_deref())
    }
}

impl<'de> Deserialize<'de> for SchemaNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let kind = match &value {
            Value::Object(_) => {
                return Ok(match serde_json::from_value::<SchemaObject>(value) {
                    Ok(object) => object.into(),
                    Err(e) => SchemaNode::invalid(e.to_string()),
                });
            }
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
        };
        Ok(SchemaNode::invalid(format!(
            "expected a schema object, found {}",
            kind
        )))
    }
}

/// Wire shape of a schema object
#[derive(Deserialize)]
struct SchemaObject {
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    schema_type: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    format: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    description: Option<String>,

    #[serde(default)]
    properties: IndexMap<String, SchemaNode>,

    #[serde(default)]
    items: Option<Box<SchemaNode>>,

    #[serde(rename = "enum", default, deserialize_with = "lenient_values")]
    enum_values: Option<Vec<Value>>,

    #[serde(rename = "$ref", default, deserialize_with = "lenient_string")]
    ref_path: Option<String>,
}

impl From<SchemaObject> for SchemaNode {
    fn from(object: SchemaObject) -> Self {
        SchemaNode {
            schema_type: object.schema_type,
            format: object.format,
            description: object.description,
            properties: object.properties,
            items: object.items,
            enum_values: object.enum_values,
            ref_path: object.ref_path,
            malformed: None,
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(
        Option::<Value>::deserialize(deserializer)?,
        Some(Value::Bool(true))
    ))
}

/// String lists; a lone string is a one-element list, other entries are dropped
fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => vec![s],
        Some(Value::Array(values)) => values
            .into_iter()
            .filter_map(|value| match value {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Enum lists; a lone scalar is treated as a one-element list
fn lenient_values<'de, D>(deserializer: D) -> Result<Option<Vec<Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::Array(values)) => Some(values),
        Some(other) => Some(vec![other]),
    })
}

/// Nested structure that is dropped when it has the wrong shape
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .and_then(|value| serde_json::from_value(value).ok()))
}
