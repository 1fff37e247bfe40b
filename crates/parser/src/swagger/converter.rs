//! Converts a Swagger document to the restgen IR
//!
//! Pass 1 fills the registry from the document's definitions and parameters
//! and seals it. Pass 2 walks the paths and builds services, reading refs
//! through the sealed registry. A final audit reports every deferred
//! reference that did not resolve.

use super::types::{Lenient, SwaggerDocument};
use crate::aggregator::{build_service, ServiceCollection};
use crate::context::ParseContext;
use crate::definition::build_definition;
use crate::resolver::resolve_parameter;
use restgen_common::{
    ApiModel, DiagnosticKind, Diagnostics, GeneratorError, Parameter, Registry, Result, Service,
};

/// Convert a parsed document into an [`ApiModel`]
pub fn convert_document(document: &SwaggerDocument, source: &str) -> Result<ApiModel> {
    if !document.has_type_universe() {
        return Err(GeneratorError::MissingTypeUniverse(source.to_string()));
    }

    let mut ctx = ParseContext::new();
    for (section, reason) in document.malformed_sections() {
        ctx.diagnostics.report(
            DiagnosticKind::MalformedNode,
            section,
            format!("section is ignored: {}", reason),
        );
    }
    populate_registry(document, &mut ctx);

    let mut services = ServiceCollection::new();
    match &document.paths {
        Some(Lenient::Valid(paths)) => {
            for (path, item) in paths {
                let Some(item) = item.valid() else {
                    ctx.diagnostics.report(
                        DiagnosticKind::MalformedNode,
                        path.as_str(),
                        "path item is not an object, no service is produced",
                    );
                    continue;
                };
                let service = build_service(path, item, &mut ctx);
                services.insert(service, &mut ctx.diagnostics);
            }
        }
        Some(Lenient::Malformed(reason)) => ctx.diagnostics.report(
            DiagnosticKind::MalformedNode,
            "paths",
            format!("section is ignored: {}", reason),
        ),
        None => ctx.diagnostics.report(
            DiagnosticKind::MissingPaths,
            source,
            "document has no paths map, no services are produced",
        ),
    }
    let services = services.into_services();

    audit_references(&ctx.registry, &services, &mut ctx.diagnostics);

    tracing::debug!(
        source = %source,
        definitions = ctx.registry.definition_count(),
        parameters = ctx.registry.parameter_count(),
        services = services.len(),
        diagnostics = ctx.diagnostics.len(),
        "resolved document"
    );

    Ok(ApiModel {
        source: source.to_string(),
        title: document.title().map(str::to_string),
        services,
        registry: ctx.registry,
        diagnostics: ctx.diagnostics,
    })
}

/// Pass 1: register parameters and definitions, then seal
fn populate_registry(document: &SwaggerDocument, ctx: &mut ParseContext) {
    for (name, node) in document.parameter_nodes() {
        let subject = format!("parameters.{}", name);
        let Some(node) = node.valid() else {
            ctx.diagnostics.report(
                DiagnosticKind::MalformedNode,
                subject,
                "parameter is not an object and is not registered",
            );
            continue;
        };
        let parameter = resolve_parameter(name, node, &subject, ctx);
        ctx.registry.register_parameter(name.as_str(), parameter);
    }

    for (name, schema) in document.definition_schemas() {
        let definition = build_definition(name, schema, ctx);
        ctx.registry.register_definition(name.as_str(), definition);
    }

    ctx.registry.seal();
    tracing::debug!(
        definitions = ctx.registry.definition_count(),
        parameters = ctx.registry.parameter_count(),
        "registry sealed"
    );
}

/// Report every deferred reference that has no registered target
fn audit_references(registry: &Registry, services: &[Service], diagnostics: &mut Diagnostics) {
    for (_, definition) in registry.definitions() {
        for (field, target) in definition.references() {
            if !registry.resolve_definition_ref(target).is_resolved() {
                diagnostics.report(
                    DiagnosticKind::UnresolvedReference,
                    format!("{}.{}", definition.source_name, field),
                    format!("'{}' is not a registered definition", target),
                );
            }
        }
    }

    for (name, parameter) in registry.parameters() {
        audit_parameter(registry, &format!("parameters.{}", name), parameter, diagnostics);
    }

    for service in services {
        for parameter in &service.path_parameters {
            let subject = format!("{} {}", service.path, parameter.resolved_name(registry));
            audit_parameter(registry, &subject, parameter, diagnostics);
        }

        for method in service.methods.values() {
            let subject = format!("{} {}", method.verb.as_str().to_uppercase(), service.path);
            for (name, parameter) in &method.parameters {
                // path parameters were audited at service level
                if service.path_parameters.iter().any(|p| p == parameter) {
                    continue;
                }
                audit_parameter(registry, &format!("{} {}", subject, name), parameter, diagnostics);
            }

            if let Some(target) = method.response.as_ref().and_then(|r| r.reference()) {
                if !registry.resolve_definition_ref(target).is_resolved() {
                    diagnostics.report(
                        DiagnosticKind::UnresolvedReference,
                        format!("{} response", subject),
                        format!("'{}' is not a registered definition", target),
                    );
                }
            }
        }
    }
}

fn audit_parameter(
    registry: &Registry,
    subject: &str,
    parameter: &Parameter,
    diagnostics: &mut Diagnostics,
) {
    if let Some(target) = parameter.unresolved_reference(registry) {
        diagnostics.report(
            DiagnosticKind::UnresolvedReference,
            subject,
            format!("'{}' does not resolve", target),
        );
    }
}
