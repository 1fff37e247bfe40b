//! Intermediate representation of a parsed REST API
//!
//! Definitions and parameters live in the [`Registry`]; services group the
//! methods of one canonical resource path.

use crate::diagnostics::Diagnostics;
use crate::field::{FieldSpec, TypeRef};
use crate::naming::{camel_case, extract_path_tokens};
use crate::registry::{Registry, Resolution};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Maximum number of parameter-to-parameter ref hops followed at read time
pub const MAX_PARAMETER_HOPS: usize = 8;

/// Named object type with classified fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    /// Name as declared in the document
    pub source_name: String,
    /// PascalCase type name
    pub type_name: String,
    /// dash-case file/identifier tag
    pub tag: String,
    /// Fields sorted by name
    pub fields: BTreeMap<String, FieldSpec>,
}

impl Definition {
    pub fn new(source_name: impl Into<String>) -> Self {
        let source_name = source_name.into();
        Self {
            type_name: crate::naming::pascal_case(&source_name),
            tag: crate::naming::dash_case(&source_name),
            source_name,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.insert(name.into(), spec);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    /// Deferred references held by this definition's fields
    pub fn references(&self) -> impl Iterator<Item = (&str, &TypeRef)> {
        self.fields
            .iter()
            .filter_map(|(name, spec)| spec.reference().map(|r| (name.as_str(), r)))
    }
}

/// Where a parameter is carried in the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Body,
    FormData,
    Cookie,
}

impl ParameterLocation {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "path" => Some(Self::Path),
            "query" => Some(Self::Query),
            "header" => Some(Self::Header),
            "body" => Some(Self::Body),
            "formdata" => Some(Self::FormData),
            "cookie" => Some(Self::Cookie),
            _ => None,
        }
    }
}

/// Parameter type: either classified in place or deferred to another parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParameterKind {
    Reference { target: TypeRef },
    Typed { spec: FieldSpec },
}

/// Operation or component parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Registry key or declared name
    pub source_name: String,
    /// Declared name, empty for pure `$ref` parameters
    pub name: String,
    pub location: Option<ParameterLocation>,
    pub required: bool,
    pub kind: ParameterKind,
}

impl Parameter {
    /// Parameter with an in-place classification
    pub fn typed(
        name: impl Into<String>,
        location: Option<ParameterLocation>,
        spec: FieldSpec,
    ) -> Self {
        let name = name.into();
        Self {
            source_name: name.clone(),
            name,
            location,
            required: false,
            kind: ParameterKind::Typed { spec },
        }
    }

    /// Parameter deferring to a registered parameter
    pub fn reference(source_name: impl Into<String>, target: TypeRef) -> Self {
        Self {
            source_name: source_name.into(),
            name: String::new(),
            location: None,
            required: false,
            kind: ParameterKind::Reference { target },
        }
    }

    /// Follow parameter references until a typed parameter is reached
    pub fn resolve<'a>(&'a self, registry: &'a Registry) -> Resolution<'a, Parameter> {
        let mut current = self;
        for _ in 0..=MAX_PARAMETER_HOPS {
            match &current.kind {
                ParameterKind::Typed { .. } => return Resolution::Resolved(current),
                ParameterKind::Reference { target } => {
                    match registry.resolve_parameter_ref(target) {
                        Resolution::Resolved(next) => current = next,
                        unresolved => return unresolved,
                    }
                }
            }
        }
        tracing::warn!(
            parameter = %self.source_name,
            "parameter reference chain exceeds {} hops",
            MAX_PARAMETER_HOPS
        );
        Resolution::Missing
    }

    /// Name after following references
    pub fn resolved_name<'a>(&'a self, registry: &'a Registry) -> &'a str {
        match self.resolve(registry) {
            Resolution::Resolved(param) if !param.name.is_empty() => &param.name,
            _ => self.fallback_name(),
        }
    }

    pub fn resolved_location(&self, registry: &Registry) -> Option<ParameterLocation> {
        match self.resolve(registry) {
            Resolution::Resolved(param) => param.location,
            _ => self.location,
        }
    }

    /// Classified type after following references; unresolved chains become `Any`
    pub fn resolved_spec(&self, registry: &Registry) -> FieldSpec {
        match (self.resolve(registry), &self.kind) {
            (Resolution::Resolved(param), _) => match &param.kind {
                ParameterKind::Typed { spec } => spec.clone(),
                ParameterKind::Reference { target } => FieldSpec::unresolved(target),
            },
            (_, ParameterKind::Reference { target }) => FieldSpec::unresolved(target),
            (_, ParameterKind::Typed { spec }) => spec.clone(),
        }
    }

    /// First reference of this parameter that does not resolve
    pub fn unresolved_reference(&self, registry: &Registry) -> Option<TypeRef> {
        match self.resolve(registry) {
            Resolution::Resolved(param) => match &param.kind {
                ParameterKind::Typed { spec } => spec
                    .reference()
                    .filter(|target| !registry.resolve_definition_ref(target).is_resolved())
                    .cloned(),
                ParameterKind::Reference { target } => Some(target.clone()),
            },
            _ => match &self.kind {
                ParameterKind::Reference { target } => Some(target.clone()),
                ParameterKind::Typed { .. } => None,
            },
        }
    }

    fn fallback_name(&self) -> &str {
        if !self.name.is_empty() {
            return &self.name;
        }
        match &self.kind {
            ParameterKind::Reference { target } => target.target_name(),
            ParameterKind::Typed { .. } => &self.source_name,
        }
    }
}

/// Classified response body for one nominal status code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    /// `None` when the response has no schema
    pub body: Option<FieldSpec>,
}

impl Response {
    pub fn reference(&self) -> Option<&TypeRef> {
        self.body.as_ref().and_then(FieldSpec::reference)
    }

    pub fn is_array(&self) -> bool {
        matches!(self.body, Some(FieldSpec::Array { .. }))
    }
}

/// HTTP verbs recognised on a path item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpVerb {
    Get,
    Put,
    Post,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "get",
            HttpVerb::Put => "put",
            HttpVerb::Post => "post",
            HttpVerb::Delete => "delete",
            HttpVerb::Patch => "patch",
            HttpVerb::Head => "head",
            HttpVerb::Options => "options",
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CRUD-style action a method is exposed as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CanonicalAction {
    Get,
    GetById,
    Create,
    Update,
    Remove,
}

impl CanonicalAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalAction::Get => "get",
            CanonicalAction::GetById => "getById",
            CanonicalAction::Create => "create",
            CanonicalAction::Update => "update",
            CanonicalAction::Remove => "remove",
        }
    }

    /// Actions addressing a single item through the id parameter
    pub fn is_id_action(&self) -> bool {
        matches!(
            self,
            CanonicalAction::GetById | CanonicalAction::Update | CanonicalAction::Remove
        )
    }
}

impl fmt::Display for CanonicalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One verb on one path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    pub verb: HttpVerb,
    pub action: CanonicalAction,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    /// Declared parameters keyed by resolved name
    pub parameters: IndexMap<String, Parameter>,
    /// This method's declaration of the path identifier
    pub id_parameter: Option<Parameter>,
    pub response: Option<Response>,
}

impl Method {
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }

    pub fn query_parameters<'a>(&'a self, registry: &'a Registry) -> Vec<&'a Parameter> {
        self.parameters
            .values()
            .filter(|p| p.resolved_location(registry) == Some(ParameterLocation::Query))
            .collect()
    }

    pub fn body_parameter<'a>(&'a self, registry: &'a Registry) -> Option<&'a Parameter> {
        self.parameters
            .values()
            .find(|p| p.resolved_location(registry) == Some(ParameterLocation::Body))
    }
}

/// Piece of an interpolated call template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TemplateSegment {
    Literal(String),
    /// camelCase variable name of a shared path parameter
    Parameter(String),
}

/// API call path with shared path parameters interpolated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallTemplate {
    pub segments: Vec<TemplateSegment>,
}

impl CallTemplate {
    /// Split a path template into literal and parameter segments
    pub fn from_path(path: &str) -> Self {
        let mut segments = Vec::new();
        let mut rest = path;
        for token in extract_path_tokens(path) {
            let Some(start) = rest.find('{') else { break };
            let Some(len) = rest[start..].find('}') else {
                break;
            };
            if start > 0 {
                segments.push(TemplateSegment::Literal(rest[..start].to_string()));
            }
            segments.push(TemplateSegment::Parameter(camel_case(&token)));
            rest = &rest[start + len + 1..];
        }
        if !rest.is_empty() {
            segments.push(TemplateSegment::Literal(rest.to_string()));
        }
        Self { segments }
    }

    /// Render with a formatter for literals and one for parameters
    pub fn render<L, P>(&self, literal: L, parameter: P, separator: &str) -> String
    where
        L: Fn(&str) -> String,
        P: Fn(&str) -> String,
    {
        self.segments
            .iter()
            .map(|segment| match segment {
                TemplateSegment::Literal(text) => literal(text),
                TemplateSegment::Parameter(name) => parameter(name),
            })
            .collect::<Vec<_>>()
            .join(separator)
    }

    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            TemplateSegment::Parameter(name) => Some(name.as_str()),
            TemplateSegment::Literal(_) => None,
        })
    }
}

impl fmt::Display for CallTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self.render(|s| s.to_string(), |name| format!("{{{}}}", name), "");
        f.write_str(&rendered)
    }
}

/// All methods sharing one canonical resource path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Path template with the trailing identifier token removed
    pub path: String,
    pub call_template: CallTemplate,
    pub path_parameters: Vec<Parameter>,
    pub id_parameter: Option<Parameter>,
    pub methods: BTreeMap<CanonicalAction, Method>,
    /// Raw path templates merged into this service
    pub source_paths: Vec<String>,
}

impl Service {
    pub fn method(&self, action: CanonicalAction) -> Option<&Method> {
        self.methods.get(&action)
    }

    /// Whether this service addresses single items through an id parameter
    pub fn is_identified(&self) -> bool {
        self.id_parameter.is_some()
    }

    /// Merge another registration of the same canonical path
    ///
    /// Methods of `other` overwrite same-action entries; the overwritten
    /// actions are returned. The first established id parameter is kept.
    pub fn merge(&mut self, other: Service) -> Vec<CanonicalAction> {
        let mut overwritten = Vec::new();
        for (action, method) in other.methods {
            if self.methods.insert(action, method).is_some() {
                overwritten.push(action);
            }
        }
        if self.id_parameter.is_none() {
            self.id_parameter = other.id_parameter;
        }
        if self.path_parameters.is_empty() {
            self.path_parameters = other.path_parameters;
        }
        self.source_paths.extend(other.source_paths);
        overwritten
    }
}

/// Resolved output of one document: services plus the registry they read from
#[derive(Debug, Clone, Serialize)]
pub struct ApiModel {
    /// Where the document came from (path or label)
    pub source: String,
    pub title: Option<String>,
    pub services: Vec<Service>,
    pub registry: Registry,
    pub diagnostics: Diagnostics,
}

impl ApiModel {
    pub fn service(&self, path: &str) -> Option<&Service> {
        self.services.iter().find(|service| service.path == path)
    }

    /// Pretty-printed JSON of services, registry and diagnostics
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
