//! Definition construction from schema nodes

use crate::context::ParseContext;
use crate::swagger::SchemaNode;
use restgen_common::{Definition, DiagnosticKind};

/// Build a definition from a named schema
///
/// Object schemas (declared `object`, or untyped with properties) yield one
/// field per property. Any other schema yields an empty definition so refs to
/// it still resolve.
pub fn build_definition(name: &str, schema: &SchemaNode, ctx: &mut ParseContext) -> Definition {
    let mut definition = Definition::new(name);

    if let Some(reason) = &schema.malformed {
        ctx.diagnostics.report(
            DiagnosticKind::NonObjectDefinition,
            name,
            format!("schema has no fields: {}", reason),
        );
        return definition;
    }

    let declared = schema.schema_type.as_deref().map(str::to_lowercase);
    let is_object = match declared.as_deref() {
        Some("object") => true,
        None => !schema.properties.is_empty(),
        Some(_) => false,
    };

    if !is_object {
        ctx.diagnostics.report(
            DiagnosticKind::NonObjectDefinition,
            name,
            format!(
                "declared type '{}' has no fields",
                declared.as_deref().unwrap_or("none")
            ),
        );
        return definition;
    }

    for (field_name, property) in &schema.properties {
        let subject = format!("{}.{}", name, field_name);
        let spec = ctx.classify(&subject, property);
        definition.fields.insert(field_name.clone(), spec);
    }

    tracing::debug!(
        definition = %name,
        fields = definition.fields.len(),
        "built definition"
    );
    definition
}

#[cfg(test)]
mod tests {
    use super::*;
    use restgen_common::FieldSpec;
    use serde_json::json;

    fn schema(value: serde_json::Value) -> SchemaNode {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_object_definition_fields_sorted() {
        let mut ctx = ParseContext::new();
        let definition = build_definition(
            "pet_record",
            &schema(json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "age": {"type": "integer"},
                    "owner": {"$ref": "#/definitions/Owner"}
                }
            })),
            &mut ctx,
        );
        assert_eq!(definition.type_name, "PetRecord");
        assert_eq!(definition.tag, "pet-record");
        let names: Vec<&str> = definition.fields.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["age", "name", "owner"]);
        assert_eq!(
            definition.field("owner"),
            Some(&FieldSpec::object_ref("#/definitions/Owner"))
        );
        assert!(ctx.diagnostics.is_empty());
    }

    #[test]
    fn test_untyped_with_properties_is_object() {
        let mut ctx = ParseContext::new();
        let definition = build_definition(
            "Tag",
            &schema(json!({"properties": {"label": {"type": "string"}}})),
            &mut ctx,
        );
        assert_eq!(definition.fields.len(), 1);
    }

    #[test]
    fn test_non_object_definition_is_empty() {
        let mut ctx = ParseContext::new();
        let definition = build_definition(
            "Status",
            &schema(json!({"type": "string", "enum": ["on", "off"]})),
            &mut ctx,
        );
        assert!(definition.fields.is_empty());
        assert_eq!(
            ctx.diagnostics
                .of_kind(DiagnosticKind::NonObjectDefinition)
                .count(),
            1
        );
    }

    #[test]
    fn test_malformed_schema_is_registered_empty() {
        let mut ctx = ParseContext::new();
        let definition = build_definition("Broken", &schema(json!(["not", "a", "schema"])), &mut ctx);
        assert!(definition.fields.is_empty());
        let diagnostic = ctx.diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.kind, DiagnosticKind::NonObjectDefinition);
        assert_eq!(diagnostic.subject, "Broken");
    }

    #[test]
    fn test_malformed_property_degrades_to_any() {
        let mut ctx = ParseContext::new();
        let definition = build_definition(
            "Pet",
            &schema(json!({"type": "object", "properties": {"name": true}})),
            &mut ctx,
        );
        assert_eq!(
            definition.field("name").map(FieldSpec::field_type),
            Some(restgen_common::FieldType::Any)
        );
        let diagnostic = ctx.diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.kind, DiagnosticKind::UnclassifiedSchema);
        assert_eq!(diagnostic.subject, "Pet.name");
    }

    #[test]
    fn test_degraded_field_is_reported_with_subject() {
        let mut ctx = ParseContext::new();
        build_definition(
            "Grid",
            &schema(json!({
                "type": "object",
                "properties": {
                    "cells": {"type": "array", "items": {"type": "array", "items": {"type": "number"}}}
                }
            })),
            &mut ctx,
        );
        let diagnostic = ctx.diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.kind, DiagnosticKind::UnclassifiedSchema);
        assert_eq!(diagnostic.subject, "Grid.cells");
    }
}
