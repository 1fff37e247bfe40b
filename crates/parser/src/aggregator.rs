//! Path/service aggregation
//!
//! Each raw path template becomes a [`Service`] keyed by its canonical path.
//! A collection path and its item path (`/users`, `/users/{id}`) reduce to
//! the same key and are merged.

use crate::context::ParseContext;
use crate::operation_mapper::OperationMapper;
use crate::resolver::{resolve_parameter, resolve_request_body, resolve_response};
use crate::swagger::{Lenient, Operation, ParameterNode, PathItem};
use indexmap::IndexMap;
use restgen_common::naming::extract_path_tokens;
use restgen_common::{
    CallTemplate, CanonicalAction, DiagnosticKind, Diagnostics, FieldSpec, HttpVerb, Method,
    Parameter, ParameterLocation, Registry, Service, Unclassified,
};
use std::collections::BTreeMap;

/// Services in order of first appearance, keyed by canonical path
#[derive(Debug, Default)]
pub struct ServiceCollection {
    services: IndexMap<String, Service>,
}

impl ServiceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a service, merging into an existing one with the same path
    pub fn insert(&mut self, service: Service, diagnostics: &mut Diagnostics) {
        match self.services.get_mut(&service.path) {
            Some(existing) => {
                let path = existing.path.clone();
                for action in existing.merge(service) {
                    diagnostics.report(
                        DiagnosticKind::ActionOverwritten,
                        format!("{} {}", action, path),
                        "a later path declared the same canonical action",
                    );
                }
            }
            None => {
                self.services.insert(service.path.clone(), service);
            }
        }
    }

    pub fn get(&self, path: &str) -> Option<&Service> {
        self.services.get(path)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn into_services(self) -> Vec<Service> {
        self.services.into_values().collect()
    }
}

/// Build the service for one raw path template
///
/// A path whose verbs all fail to map yields a service with no methods and
/// no path or id parameters, so it cannot shadow a real declaration when
/// merged.
pub fn build_service(path: &str, item: &PathItem, ctx: &mut ParseContext) -> Service {
    let canonical = OperationMapper::canonical_path(path);
    let id_token = OperationMapper::id_segment(path)
        .and_then(|segment| extract_path_tokens(segment).into_iter().next());

    let mut shared = Vec::new();
    for (index, node) in item.parameters.iter().enumerate() {
        match node {
            Lenient::Valid(node) => shared.push(node.clone()),
            Lenient::Malformed(reason) => report_malformed(
                &mut ctx.diagnostics,
                format!("{} parameters[{}]", path, index),
                reason,
            ),
        }
    }

    let mut methods = BTreeMap::new();
    for (verb, operation) in item.operations() {
        let subject = format!("{} {}", verb.as_str().to_uppercase(), path);
        let Some(action) = OperationMapper::canonical_action(verb, id_token.is_some()) else {
            ctx.diagnostics.report(
                DiagnosticKind::DroppedVerb,
                subject,
                "verb has no canonical action",
            );
            continue;
        };
        let operation = match operation {
            Lenient::Valid(operation) => operation,
            Lenient::Malformed(reason) => {
                report_malformed(&mut ctx.diagnostics, subject, reason);
                continue;
            }
        };
        let method = build_method(
            path,
            verb,
            action,
            operation,
            &shared,
            id_token.as_deref(),
            ctx,
        );
        methods.insert(action, method);
    }

    let (id_parameter, path_parameters) = if methods.is_empty() {
        (None, Vec::new())
    } else {
        let id_parameter = id_token.as_deref().map(|token| {
            methods
                .values()
                .find_map(|method: &Method| method.id_parameter.clone())
                .unwrap_or_else(|| undeclared_path_parameter(path, token, &mut ctx.diagnostics))
        });

        let path_parameters = extract_path_tokens(&canonical)
            .iter()
            .map(|token| {
                methods
                    .values()
                    .find_map(|method| find_parameter(method, token, &ctx.registry))
                    .unwrap_or_else(|| undeclared_path_parameter(path, token, &mut ctx.diagnostics))
            })
            .collect();
        (id_parameter, path_parameters)
    };

    tracing::debug!(
        path = %path,
        canonical = %canonical,
        methods = methods.len(),
        "built service"
    );

    Service {
        call_template: CallTemplate::from_path(&canonical),
        path: canonical,
        path_parameters,
        id_parameter,
        methods,
        source_paths: vec![path.to_string()],
    }
}

/// Build one method; path-level parameters apply unless redeclared
pub fn build_method(
    path: &str,
    verb: HttpVerb,
    action: CanonicalAction,
    operation: &Operation,
    shared: &[ParameterNode],
    id_token: Option<&str>,
    ctx: &mut ParseContext,
) -> Method {
    let subject = format!("{} {}", verb.as_str().to_uppercase(), path);

    let mut declared_nodes: Vec<&ParameterNode> = shared.iter().collect();
    for (index, node) in operation.parameters.iter().enumerate() {
        match node {
            Lenient::Valid(node) => declared_nodes.push(node),
            Lenient::Malformed(reason) => report_malformed(
                &mut ctx.diagnostics,
                format!("{} parameters[{}]", subject, index),
                reason,
            ),
        }
    }

    let mut parameters = IndexMap::new();
    for node in declared_nodes {
        let declared = node.name.as_deref().unwrap_or_default();
        let parameter = resolve_parameter(
            declared,
            node,
            &format!("{} {}", subject, declared),
            ctx,
        );
        let key = parameter.resolved_name(&ctx.registry).to_string();
        parameters.insert(key, parameter);
    }

    match &operation.request_body {
        Some(Lenient::Valid(body)) => {
            let has_body = parameters.values().any(|p: &Parameter| {
                p.resolved_location(&ctx.registry) == Some(ParameterLocation::Body)
            });
            if !has_body {
                if let Some(parameter) = resolve_request_body(body, &subject, ctx) {
                    parameters.insert(parameter.name.clone(), parameter);
                }
            }
        }
        Some(Lenient::Malformed(reason)) => report_malformed(
            &mut ctx.diagnostics,
            format!("{} requestBody", subject),
            reason,
        ),
        None => {}
    }

    let id_parameter = id_token.and_then(|token| parameters.get(token).cloned());
    let response = resolve_response(&operation.responses, &subject, ctx);

    Method {
        verb,
        action,
        operation_id: operation.operation_id.clone(),
        summary: operation.summary.clone(),
        parameters,
        id_parameter,
        response,
    }
}

fn report_malformed(diagnostics: &mut Diagnostics, subject: String, reason: &str) {
    diagnostics.report(
        DiagnosticKind::MalformedNode,
        subject,
        format!("skipped: {}", reason),
    );
}

fn find_parameter(method: &Method, token: &str, registry: &Registry) -> Option<Parameter> {
    method.parameter(token).cloned().or_else(|| {
        method
            .parameters
            .values()
            .find(|p| p.resolved_name(registry) == token)
            .cloned()
    })
}

/// Stand-in for a path token no method declares
fn undeclared_path_parameter(path: &str, token: &str, diagnostics: &mut Diagnostics) -> Parameter {
    diagnostics.report(
        DiagnosticKind::UndeclaredPathParameter,
        path,
        format!("path token '{}' has no declared parameter", token),
    );
    let mut parameter = Parameter::typed(
        token,
        Some(ParameterLocation::Path),
        FieldSpec::any(Unclassified::MissingType),
    );
    parameter.required = true;
    parameter
}

#[cfg(test)]
mod tests {
    use super::*;
    use restgen_common::FieldType;
    use serde_json::json;

    fn path_item(value: serde_json::Value) -> PathItem {
        serde_json::from_value(value).unwrap()
    }

    fn sealed_context() -> ParseContext {
        let mut ctx = ParseContext::new();
        ctx.registry.seal();
        ctx
    }

    #[test]
    fn test_collection_path() {
        let mut ctx = sealed_context();
        let service = build_service(
            "/users",
            &path_item(json!({
                "get": {"operationId": "listUsers", "parameters": [
                    {"name": "limit", "in": "query", "type": "integer"}
                ]},
                "post": {"parameters": [
                    {"name": "user", "in": "body", "schema": {"$ref": "#/definitions/User"}}
                ]}
            })),
            &mut ctx,
        );
        assert_eq!(service.path, "/users");
        assert!(!service.is_identified());
        let actions: Vec<CanonicalAction> = service.methods.keys().copied().collect();
        assert_eq!(actions, vec![CanonicalAction::Get, CanonicalAction::Create]);
        let get = service.method(CanonicalAction::Get).unwrap();
        assert_eq!(get.operation_id.as_deref(), Some("listUsers"));
        assert_eq!(get.query_parameters(&ctx.registry).len(), 1);
        let create = service.method(CanonicalAction::Create).unwrap();
        assert!(create.body_parameter(&ctx.registry).is_some());
    }

    #[test]
    fn test_item_path_hoists_shared_and_id_parameters() {
        let mut ctx = sealed_context();
        let service = build_service(
            "/users/{userId}/phones/{phoneId}",
            &path_item(json!({
                "get": {"parameters": [
                    {"name": "userId", "in": "path", "type": "integer"},
                    {"name": "phoneId", "in": "path", "type": "string"}
                ]},
                "delete": {"parameters": [
                    {"name": "userId", "in": "path", "type": "string"},
                    {"name": "phoneId", "in": "path", "type": "string"}
                ]}
            })),
            &mut ctx,
        );
        assert_eq!(service.path, "/users/{userId}/phones");
        assert_eq!(service.call_template.to_string(), "/users/{userId}/phones");
        assert_eq!(service.path_parameters.len(), 1);
        // getById comes before remove, so its declaration wins
        assert_eq!(
            service.path_parameters[0].resolved_spec(&ctx.registry),
            FieldSpec::Number
        );
        assert_eq!(service.id_parameter.as_ref().unwrap().name, "phoneId");
        assert!(service.method(CanonicalAction::GetById).is_some());
        assert!(service.method(CanonicalAction::Remove).is_some());
        assert!(ctx.diagnostics.is_empty());
    }

    #[test]
    fn test_path_level_parameters_apply_to_every_verb() {
        let mut ctx = sealed_context();
        let service = build_service(
            "/orders/{orderId}",
            &path_item(json!({
                "parameters": [{"name": "orderId", "in": "path", "type": "string"}],
                "get": {},
                "put": {"parameters": [{"name": "orderId", "in": "path", "type": "integer"}]}
            })),
            &mut ctx,
        );
        let get = service.method(CanonicalAction::GetById).unwrap();
        let update = service.method(CanonicalAction::Update).unwrap();
        assert_eq!(
            get.id_parameter.as_ref().unwrap().resolved_spec(&ctx.registry),
            FieldSpec::String
        );
        assert_eq!(
            update.id_parameter.as_ref().unwrap().resolved_spec(&ctx.registry),
            FieldSpec::Number
        );
    }

    #[test]
    fn test_patch_is_dropped() {
        let mut ctx = sealed_context();
        let service = build_service(
            "/users/{id}",
            &path_item(json!({
                "get": {"parameters": [{"name": "id", "in": "path", "type": "string"}]},
                "patch": {}
            })),
            &mut ctx,
        );
        assert_eq!(service.methods.len(), 1);
        let dropped: Vec<_> = ctx.diagnostics.of_kind(DiagnosticKind::DroppedVerb).collect();
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].subject, "PATCH /users/{id}");
    }

    #[test]
    fn test_unmapped_verbs_only_leave_no_placeholders() {
        let mut ctx = sealed_context();
        let service = build_service(
            "/users/{id}",
            &path_item(json!({"patch": {}, "head": {}})),
            &mut ctx,
        );
        assert!(service.methods.is_empty());
        assert!(service.id_parameter.is_none());
        assert!(service.path_parameters.is_empty());
        assert_eq!(
            ctx.diagnostics
                .of_kind(DiagnosticKind::UndeclaredPathParameter)
                .count(),
            0
        );
        assert_eq!(ctx.diagnostics.of_kind(DiagnosticKind::DroppedVerb).count(), 2);
    }

    #[test]
    fn test_unmapped_item_path_does_not_shadow_merge() {
        let mut ctx = sealed_context();
        let mut services = ServiceCollection::new();
        let patch_only = build_service(
            "/accounts/{accountId}/items/{itemId}",
            &path_item(json!({"patch": {}})),
            &mut ctx,
        );
        let collection = build_service(
            "/accounts/{accountId}/items",
            &path_item(json!({"get": {"parameters": [
                {"name": "accountId", "in": "path", "type": "integer"}
            ]}})),
            &mut ctx,
        );
        services.insert(patch_only, &mut ctx.diagnostics);
        services.insert(collection, &mut ctx.diagnostics);

        let items = services.get("/accounts/{accountId}/items").unwrap();
        assert!(items.id_parameter.is_none());
        assert_eq!(items.path_parameters.len(), 1);
        assert_eq!(
            items.path_parameters[0].resolved_spec(&ctx.registry),
            FieldSpec::Number
        );
        assert_eq!(
            ctx.diagnostics
                .of_kind(DiagnosticKind::UndeclaredPathParameter)
                .count(),
            0
        );
    }

    #[test]
    fn test_malformed_nodes_are_reported_and_skipped() {
        let mut ctx = sealed_context();
        let service = build_service(
            "/users",
            &path_item(json!({
                "parameters": [42],
                "get": {"tags": "users", "responses": {"200": {"description": "ok"}}},
                "post": {
                    "parameters": ["oops", {"name": "user", "in": "body", "schema": {"$ref": "#/definitions/User"}}],
                    "responses": {"201": {"description": "created"}}
                },
                "delete": [1, 2]
            })),
            &mut ctx,
        );

        let actions: Vec<CanonicalAction> = service.methods.keys().copied().collect();
        assert_eq!(actions, vec![CanonicalAction::Get, CanonicalAction::Create]);
        let create = service.method(CanonicalAction::Create).unwrap();
        assert!(create.body_parameter(&ctx.registry).is_some());

        let subjects: Vec<&str> = ctx
            .diagnostics
            .of_kind(DiagnosticKind::MalformedNode)
            .map(|d| d.subject.as_str())
            .collect();
        assert_eq!(
            subjects,
            vec!["/users parameters[0]", "POST /users parameters[0]", "DELETE /users"]
        );
    }

    #[test]
    fn test_malformed_request_body_is_reported() {
        let mut ctx = sealed_context();
        let service = build_service(
            "/pets",
            &path_item(json!({"post": {"requestBody": "json please"}})),
            &mut ctx,
        );
        let create = service.method(CanonicalAction::Create).unwrap();
        assert!(create.parameters.is_empty());
        let diagnostic = ctx.diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.kind, DiagnosticKind::MalformedNode);
        assert_eq!(diagnostic.subject, "POST /pets requestBody");
    }

    #[test]
    fn test_undeclared_path_token_is_synthesized() {
        let mut ctx = sealed_context();
        let service = build_service(
            "/accounts/{accountId}/items",
            &path_item(json!({"get": {}})),
            &mut ctx,
        );
        assert_eq!(service.path_parameters.len(), 1);
        let synthesized = &service.path_parameters[0];
        assert_eq!(synthesized.name, "accountId");
        assert!(synthesized.required);
        assert_eq!(synthesized.resolved_spec(&ctx.registry).field_type(), FieldType::Any);
        assert_eq!(
            ctx.diagnostics
                .of_kind(DiagnosticKind::UndeclaredPathParameter)
                .count(),
            1
        );
    }

    #[test]
    fn test_collection_merges_and_reports_overwrites() {
        let mut ctx = sealed_context();
        let mut services = ServiceCollection::new();
        let first = build_service("/users", &path_item(json!({"get": {}})), &mut ctx);
        let second = build_service(
            "/users/{id}",
            &path_item(json!({
                "parameters": [{"name": "id", "in": "path", "type": "integer"}],
                "get": {},
                "put": {},
                "delete": {}
            })),
            &mut ctx,
        );
        let again = build_service(
            "/users/",
            &path_item(json!({"get": {"operationId": "replacement"}})),
            &mut ctx,
        );
        services.insert(first, &mut ctx.diagnostics);
        services.insert(second, &mut ctx.diagnostics);
        services.insert(again, &mut ctx.diagnostics);

        assert_eq!(services.len(), 1);
        let users = services.get("/users").unwrap();
        assert_eq!(users.methods.len(), 4);
        assert_eq!(
            users.method(CanonicalAction::Get).unwrap().operation_id.as_deref(),
            Some("replacement")
        );
        assert_eq!(users.source_paths, vec!["/users", "/users/{id}", "/users/"]);
        assert_eq!(
            ctx.diagnostics
                .of_kind(DiagnosticKind::ActionOverwritten)
                .count(),
            1
        );
    }
}
