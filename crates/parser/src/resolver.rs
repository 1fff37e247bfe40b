//! Parameter and response resolution
//!
//! Turns raw parameter, request body and response nodes into IR values.
//! References are stored, not followed; reading them goes through the
//! registry once it is sealed.

use crate::context::ParseContext;
use crate::swagger::{NodeMap, ParameterNode, RequestBody, ResponseNode, SchemaNode};
use crate::type_classifier::TypeClassifier;
use restgen_common::{DiagnosticKind, FieldSpec, Parameter, ParameterLocation, Response, TypeRef};

/// Name given to the parameter synthesized from an OpenAPI 3 request body
pub const REQUEST_BODY_PARAMETER: &str = "body";

/// Build a parameter from its raw node
///
/// `source_name` is the registry key for component parameters and the
/// declared name otherwise. Typed parameters report degraded shapes under
/// `subject`.
pub fn resolve_parameter(
    source_name: &str,
    node: &ParameterNode,
    subject: &str,
    ctx: &mut ParseContext,
) -> Parameter {
    let location = node.location.as_deref().and_then(ParameterLocation::parse);

    if let Some(ref_path) = &node.ref_path {
        let target = TypeRef::new(ref_path.as_str());
        let source_name = if source_name.is_empty() {
            target.target_name().to_string()
        } else {
            source_name.to_string()
        };
        let mut parameter = Parameter::reference(source_name, target);
        parameter.name = node.name.clone().unwrap_or_default();
        parameter.location = location;
        parameter.required = node.required;
        return parameter;
    }

    let spec = match (&node.schema_type, &node.schema) {
        (None, Some(schema)) => {
            let spec = classify_body_schema(schema);
            ctx.report_unclassified(subject, &spec);
            ctx.report_enum_literals(subject, schema);
            spec
        }
        _ => ctx.classify(subject, &node.inline_schema()),
    };

    let name = node.name.as_deref().unwrap_or(source_name);
    let mut parameter = Parameter::typed(name, location, spec);
    if !source_name.is_empty() {
        parameter.source_name = source_name.to_string();
    }
    parameter.required = node.required || location == Some(ParameterLocation::Path);
    parameter
}

/// Classify a structured body schema
///
/// A ref on `items` makes an array of that type (or an object container when
/// the schema says `object`); a ref on the schema itself makes an object.
/// Schemas without a ref are classified like any other node.
pub fn classify_body_schema(schema: &SchemaNode) -> FieldSpec {
    if let Some(target) = schema.items_ref() {
        return match schema.schema_type.as_deref().map(str::to_lowercase).as_deref() {
            Some("object") => FieldSpec::object_ref(target),
            _ => FieldSpec::array_of_ref(target),
        };
    }
    if let Some(target) = &schema.ref_path {
        return FieldSpec::object_ref(target.as_str());
    }
    TypeClassifier::classify(schema)
}

/// Select and classify the nominal response of an operation
///
/// Status `200` is preferred. Without it, status `201` is used and recorded
/// as `204`, which is what generated clients have always been built against.
/// A selected response with the wrong shape is reported and has no body.
pub fn resolve_response(
    responses: &NodeMap<ResponseNode>,
    subject: &str,
    ctx: &mut ParseContext,
) -> Option<Response> {
    let (code, status) = match (responses.contains_key("200"), responses.contains_key("201")) {
        (true, _) => ("200", 200),
        (false, true) => ("201", 204),
        (false, false) => return None,
    };

    let node = match responses.get(code)?.valid() {
        Some(node) => node,
        None => {
            ctx.diagnostics.report(
                DiagnosticKind::MalformedNode,
                format!("{} response {}", subject, code),
                "response is not an object, body is dropped",
            );
            return Some(Response { status, body: None });
        }
    };

    let body = node.body_schema().map(|schema| {
        let spec = classify_body_schema(schema);
        ctx.report_unclassified(subject, &spec);
        spec
    });

    Some(Response { status, body })
}

/// Parameter for an OpenAPI 3 request body, from its first media type
pub fn resolve_request_body(
    body: &RequestBody,
    subject: &str,
    ctx: &mut ParseContext,
) -> Option<Parameter> {
    let schema = body.content.values().next()?.schema.as_ref()?;
    let spec = classify_body_schema(schema);
    ctx.report_unclassified(subject, &spec);

    let mut parameter = Parameter::typed(
        REQUEST_BODY_PARAMETER,
        Some(ParameterLocation::Body),
        spec,
    );
    parameter.required = body.required;
    Some(parameter)
}
