//! Integration tests for the Swagger parser

use restgen_common::{
    CanonicalAction, DiagnosticKind, FieldSpec, FieldType, GeneratorError, ParameterLocation,
    SubField,
};
use restgen_parser::SwaggerParser;

#[test]
fn test_definitions_resolve_regardless_of_order() {
    let json = r##"{
        "swagger": "2.0",
        "definitions": {
            "Pet": {
                "type": "object",
                "properties": {
                    "owner": {"$ref": "#/definitions/Owner"}
                }
            },
            "Owner": {
                "type": "object",
                "properties": {
                    "name": {"type": "string"}
                }
            }
        },
        "paths": {}
    }"##;

    let model = SwaggerParser::from_json(json).unwrap().parse().unwrap();
    let pet = model.registry.definition("Pet").unwrap();
    let owner_ref = pet.field("owner").unwrap().reference().unwrap();
    let owner = model.registry.resolve_definition_ref(owner_ref).ok().unwrap();

    assert_eq!(owner.type_name, "Owner");
    assert_eq!(owner.fields.len(), 1);
    assert_eq!(owner.field("name"), Some(&FieldSpec::String));
    assert!(model
        .diagnostics
        .of_kind(DiagnosticKind::UnresolvedReference)
        .next()
        .is_none());
}

#[test]
fn test_self_referential_definition() {
    let json = r##"{
        "definitions": {
            "Node": {
                "type": "object",
                "properties": {
                    "children": {"type": "array", "items": {"$ref": "#/definitions/Node"}},
                    "parent": {"$ref": "#/definitions/Node"}
                }
            }
        },
        "paths": {}
    }"##;

    let model = SwaggerParser::from_json(json).unwrap().parse().unwrap();
    let node = model.registry.definition("Node").unwrap();
    let children = node.field("children").unwrap();
    assert_eq!(children.field_type(), FieldType::Array);
    let resolved = model
        .registry
        .resolve_definition_ref(children.reference().unwrap())
        .ok()
        .unwrap();
    assert_eq!(resolved.source_name, "Node");
}

#[test]
fn test_collection_and_item_paths_merge() {
    let json = r##"{
        "swagger": "2.0",
        "definitions": {
            "User": {"type": "object", "properties": {"id": {"type": "integer"}}}
        },
        "paths": {
            "/users": {
                "get": {
                    "operationId": "listUsers",
                    "parameters": [{"name": "page", "in": "query", "type": "integer"}],
                    "responses": {
                        "200": {"schema": {"type": "array", "items": {"$ref": "#/definitions/User"}}}
                    }
                }
            },
            "/users/{id}": {
                "get": {
                    "operationId": "getUser",
                    "parameters": [{"name": "id", "in": "path", "required": true, "type": "integer"}],
                    "responses": {"200": {"schema": {"$ref": "#/definitions/User"}}}
                },
                "put": {
                    "operationId": "updateUser",
                    "parameters": [
                        {"name": "id", "in": "path", "required": true, "type": "integer"},
                        {"name": "user", "in": "body", "schema": {"$ref": "#/definitions/User"}}
                    ]
                },
                "delete": {
                    "operationId": "deleteUser",
                    "parameters": [{"name": "id", "in": "path", "required": true, "type": "integer"}]
                }
            }
        }
    }"##;

    let model = SwaggerParser::from_json(json).unwrap().parse().unwrap();
    assert_eq!(model.services.len(), 1);

    let users = model.service("/users").unwrap();
    let actions: Vec<CanonicalAction> = users.methods.keys().copied().collect();
    assert_eq!(
        actions,
        vec![
            CanonicalAction::Get,
            CanonicalAction::GetById,
            CanonicalAction::Update,
            CanonicalAction::Remove,
        ]
    );

    let id = users.id_parameter.as_ref().unwrap();
    assert_eq!(id.name, "id");
    assert_eq!(id.resolved_location(&model.registry), Some(ParameterLocation::Path));
    assert_eq!(id.resolved_spec(&model.registry), FieldSpec::Number);

    let list = users.method(CanonicalAction::Get).unwrap();
    assert!(list.response.as_ref().unwrap().is_array());
    let update = users.method(CanonicalAction::Update).unwrap();
    assert_eq!(
        update.body_parameter(&model.registry).unwrap().name,
        "user"
    );
    assert!(model.diagnostics.is_empty());
}

#[test]
fn test_created_only_response_is_recorded_as_204() {
    let json = r##"{
        "definitions": {"Order": {"type": "object"}},
        "paths": {
            "/orders": {
                "post": {
                    "responses": {"201": {"schema": {"$ref": "#/definitions/Order"}}}
                }
            }
        }
    }"##;

    let model = SwaggerParser::from_json(json).unwrap().parse().unwrap();
    let create = model.services[0].method(CanonicalAction::Create).unwrap();
    let response = create.response.as_ref().unwrap();
    assert_eq!(response.status, 204);
    assert_eq!(response.body, Some(FieldSpec::object_ref("#/definitions/Order")));
}

#[test]
fn test_enum_tokens() {
    let json = r##"{
        "definitions": {
            "Asset": {
                "type": "object",
                "properties": {
                    "kind": {"type": "string", "enum": ["3d-model", "image", "in review"]},
                    "flags": {"type": "boolean", "enum": [true, false]}
                }
            }
        },
        "paths": {}
    }"##;

    let model = SwaggerParser::from_json(json).unwrap().parse().unwrap();
    let asset = model.registry.definition("Asset").unwrap();
    let kinds: Vec<String> = asset
        .field("kind")
        .unwrap()
        .enum_values()
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        kinds,
        vec!["'3D_MODEL' = '3d-model'", "IMAGE = 'image'", "IN_REVIEW = 'in review'"]
    );

    match asset.field("flags").unwrap() {
        FieldSpec::Enum { values, backing } => {
            assert_eq!(backing, &SubField::Boolean);
            assert_eq!(values[0].to_string(), "TRUE = 'true'");
        }
        other => panic!("expected enum, got {:?}", other),
    }
}

#[test]
fn test_patch_is_dropped_with_diagnostic() {
    let json = r##"{
        "definitions": {},
        "paths": {
            "/users/{id}": {
                "get": {"parameters": [{"name": "id", "in": "path", "type": "string"}]},
                "patch": {"parameters": [{"name": "id", "in": "path", "type": "string"}]}
            }
        }
    }"##;

    let model = SwaggerParser::from_json(json).unwrap().parse().unwrap();
    let users = model.service("/users").unwrap();
    assert_eq!(users.methods.len(), 1);
    assert!(users.method(CanonicalAction::GetById).is_some());
    assert_eq!(
        model.diagnostics.of_kind(DiagnosticKind::DroppedVerb).count(),
        1
    );
}

#[test]
fn test_openapi3_components() {
    let json = r##"{
        "openapi": "3.0.0",
        "info": {"title": "Pets", "version": "1.0"},
        "components": {
            "schemas": {
                "Pet": {
                    "type": "object",
                    "properties": {"tags": {"type": "array", "items": {"type": "string"}}}
                }
            },
            "parameters": {
                "petId": {"name": "petId", "in": "path", "required": true, "schema": {"type": "integer"}},
                "limit": {"name": "limit", "in": "query", "schema": {"type": "integer"}}
            }
        },
        "paths": {
            "/pets": {
                "get": {
                    "parameters": [{"$ref": "#/components/parameters/limit"}],
                    "responses": {
                        "200": {
                            "content": {
                                "application/json": {
                                    "schema": {"type": "array", "items": {"$ref": "#/components/schemas/Pet"}}
                                }
                            }
                        }
                    }
                },
                "post": {
                    "requestBody": {
                        "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Pet"}}}
                    }
                }
            },
            "/pets/{petId}": {
                "get": {
                    "parameters": [{"$ref": "#/components/parameters/petId"}],
                    "responses": {
                        "200": {"content": {"application/json": {"schema": {"$ref": "#/components/schemas/Pet"}}}}
                    }
                }
            }
        }
    }"##;

    let model = SwaggerParser::from_json(json).unwrap().parse().unwrap();
    assert_eq!(model.title.as_deref(), Some("Pets"));
    assert_eq!(model.registry.parameter_count(), 2);

    let pets = model.service("/pets").unwrap();
    let list = pets.method(CanonicalAction::Get).unwrap();
    let query = list.query_parameters(&model.registry);
    assert_eq!(query.len(), 1);
    assert_eq!(query[0].resolved_name(&model.registry), "limit");
    assert_eq!(query[0].resolved_spec(&model.registry), FieldSpec::Number);

    let response_ref = list.response.as_ref().unwrap().reference().unwrap();
    assert!(model.registry.resolve_definition_ref(response_ref).is_resolved());

    let create = pets.method(CanonicalAction::Create).unwrap();
    let body = create.body_parameter(&model.registry).unwrap();
    assert_eq!(body.name, "body");
    assert_eq!(
        body.resolved_spec(&model.registry),
        FieldSpec::object_ref("#/components/schemas/Pet")
    );

    let id = pets.id_parameter.as_ref().unwrap();
    assert_eq!(id.resolved_name(&model.registry), "petId");
    assert_eq!(id.resolved_spec(&model.registry), FieldSpec::Number);
    assert!(model.diagnostics.is_empty());
}

#[test]
fn test_missing_type_universe_is_fatal() {
    let json = r#"{"swagger": "2.0", "paths": {"/ping": {"get": {}}}}"#;
    let result = SwaggerParser::from_json(json)
        .unwrap()
        .with_source("ping.json")
        .parse();
    match result {
        Err(GeneratorError::MissingTypeUniverse(source)) => assert_eq!(source, "ping.json"),
        other => panic!("expected missing type universe, got {:?}", other.map(|m| m.source)),
    }
}

#[test]
fn test_missing_paths_is_not_fatal() {
    let json = r#"{"definitions": {"Pet": {"type": "object"}}}"#;
    let model = SwaggerParser::from_json(json).unwrap().parse().unwrap();
    assert!(model.services.is_empty());
    assert_eq!(
        model.diagnostics.of_kind(DiagnosticKind::MissingPaths).count(),
        1
    );
}

#[test]
fn test_malformed_shapes_degrade() {
    let json = r##"{
        "definitions": {
            "Odd": {
                "type": "object",
                "properties": {
                    "grid": {"type": "array", "items": {"type": "array", "items": {"type": "number"}}},
                    "blob": {"type": "binary"},
                    "weird": {"type": 7}
                }
            }
        },
        "paths": {}
    }"##;

    let model = SwaggerParser::from_json(json).unwrap().parse().unwrap();
    let odd = model.registry.definition("Odd").unwrap();
    assert_eq!(odd.field("blob").unwrap().field_type(), FieldType::Any);
    assert_eq!(odd.field("weird").unwrap().field_type(), FieldType::Any);
    assert_eq!(
        model
            .diagnostics
            .of_kind(DiagnosticKind::UnclassifiedSchema)
            .count(),
        3
    );
}

#[test]
fn test_malformed_operations_are_reported_not_dropped() {
    let json = r##"{
        "definitions": {},
        "paths": {
            "/users": {
                "get": {"tags": "users", "responses": {"200": {"description": "ok"}}},
                "post": {"parameters": ["oops"], "responses": {"201": {"description": "created"}}},
                "put": "not an operation"
            }
        }
    }"##;

    let model = SwaggerParser::from_json(json).unwrap().parse().unwrap();
    let users = model.service("/users").unwrap();
    assert!(users.method(CanonicalAction::Get).is_some());
    assert!(users.method(CanonicalAction::Create).is_some());
    assert!(users.method(CanonicalAction::Update).is_none());

    let malformed: Vec<&str> = model
        .diagnostics
        .of_kind(DiagnosticKind::MalformedNode)
        .map(|d| d.subject.as_str())
        .collect();
    assert_eq!(malformed, vec!["PUT /users", "POST /users parameters[0]"]);
}

#[test]
fn test_bad_property_does_not_reject_document() {
    let json = r##"{
        "definitions": {
            "Pet": {"type": "object", "properties": {"name": true, "age": {"type": "integer"}}}
        },
        "paths": {}
    }"##;

    let model = SwaggerParser::from_json(json).unwrap().parse().unwrap();
    let pet = model.registry.definition("Pet").unwrap();
    assert_eq!(pet.field("name").unwrap().field_type(), FieldType::Any);
    assert_eq!(pet.field("age"), Some(&FieldSpec::Number));

    let degraded: Vec<&str> = model
        .diagnostics
        .of_kind(DiagnosticKind::UnclassifiedSchema)
        .map(|d| d.subject.as_str())
        .collect();
    assert_eq!(degraded, vec!["Pet.name"]);
}

#[test]
fn test_malformed_yaml_nodes_are_tolerated() {
    let yaml = r#"
definitions:
  Pet:
    type: object
    properties:
      name: 12
paths:
  /pets:
    get: [1, 2]
    post:
      responses:
        "201":
          description: created
"#;

    let model = SwaggerParser::from_yaml(yaml).unwrap().parse().unwrap();
    let pets = model.service("/pets").unwrap();
    assert_eq!(
        pets.methods.keys().copied().collect::<Vec<_>>(),
        vec![CanonicalAction::Create]
    );
    assert_eq!(
        model
            .diagnostics
            .of_kind(DiagnosticKind::MalformedNode)
            .map(|d| d.subject.as_str())
            .collect::<Vec<_>>(),
        vec!["GET /pets"]
    );
}

#[test]
fn test_unmapped_item_path_adds_no_placeholder_id() {
    let json = r##"{
        "definitions": {},
        "paths": {
            "/users/{userId}": {"patch": {}},
            "/users": {"get": {}}
        }
    }"##;

    let model = SwaggerParser::from_json(json).unwrap().parse().unwrap();
    let users = model.service("/users").unwrap();
    assert!(users.id_parameter.is_none());
    assert_eq!(
        users.methods.keys().copied().collect::<Vec<_>>(),
        vec![CanonicalAction::Get]
    );
    assert_eq!(
        model
            .diagnostics
            .of_kind(DiagnosticKind::UndeclaredPathParameter)
            .count(),
        0
    );
    assert_eq!(model.diagnostics.of_kind(DiagnosticKind::DroppedVerb).count(), 1);
}

#[test]
fn test_services_keep_document_order() {
    let json = r##"{
        "definitions": {},
        "paths": {
            "/zebras": {"get": {}},
            "/apes": {"get": {}},
            "/zebras/{id}": {"get": {"parameters": [{"name": "id", "in": "path", "type": "string"}]}},
            "/moles": {"get": {}}
        }
    }"##;

    let model = SwaggerParser::from_json(json).unwrap().parse().unwrap();
    let paths: Vec<&str> = model.services.iter().map(|s| s.path.as_str()).collect();
    assert_eq!(paths, vec!["/zebras", "/apes", "/moles"]);
}
