//! Schema node classification
//!
//! Maps one raw schema node to a [`FieldSpec`]. Classification never consults
//! the registry and never fails; shapes outside the supported set come back as
//! `Any` carrying the reason, and the caller decides how to report them.

use crate::swagger::SchemaNode;
use restgen_common::{EnumLiteral, FieldSpec, SubField, TypeRef, Unclassified};
use serde_json::Value;

/// Classifies schema nodes into field specs
pub struct TypeClassifier;

impl TypeClassifier {
    /// Classify a schema, property or inline parameter node
    ///
    /// # Examples
    /// ```
    /// use restgen_common::FieldSpec;
    /// use restgen_parser::swagger::SchemaNode;
    /// use restgen_parser::TypeClassifier;
    ///
    /// assert_eq!(
    ///     TypeClassifier::classify(&SchemaNode::of_type("Integer")),
    ///     FieldSpec::Number
    /// );
    /// assert_eq!(
    ///     TypeClassifier::classify(&SchemaNode::reference("#/definitions/Owner")),
    ///     FieldSpec::object_ref("#/definitions/Owner")
    /// );
    /// ```
    pub fn classify(node: &SchemaNode) -> FieldSpec {
        if let Some(reason) = &node.malformed {
            return FieldSpec::any(Unclassified::MalformedSchema(reason.clone()));
        }
        let declared = normalized_type(node);

        // An untyped node pointing at another type is an object whose single
        // element is the reference, wherever the ref was written.
        if declared.is_none() {
            if let Some(target) = node.ref_path.as_deref().or_else(|| node.items_ref()) {
                return Self::with_enum(node, "object", FieldSpec::object_ref(target));
            }
        }

        let declared = declared.unwrap_or_default();
        let spec = Self::classify_declared(node, &declared);
        Self::with_enum(node, &declared, spec)
    }

    /// Enum literals of this node (or its items) that cannot become members
    pub fn unsupported_enum_literals(node: &SchemaNode) -> Vec<&Value> {
        let item_values = node.items.as_ref().and_then(|items| items.enum_values.as_ref());
        node.enum_values
            .iter()
            .chain(item_values)
            .flatten()
            .filter(|value| EnumLiteral::from_value(value).is_none())
            .collect()
    }

    fn classify_declared(node: &SchemaNode, declared: &str) -> FieldSpec {
        match declared {
            "boolean" => FieldSpec::Boolean,
            "number" | "integer" => FieldSpec::Number,
            "string" | "date" => FieldSpec::String,
            "array" => {
                let element = match &node.items {
                    Some(items) => Self::element(items),
                    None => SubField::any(Unclassified::MissingType),
                };
                FieldSpec::Array {
                    element,
                    values: array_literals(node),
                }
            }
            "object" => FieldSpec::Object {
                element: node.items.as_deref().map(Self::element),
            },
            "" => FieldSpec::any(Unclassified::MissingType),
            other => FieldSpec::any(Unclassified::UnknownType(other.to_string())),
        }
    }

    /// Non-array nodes carrying an enum list become `Enum`, backed by what the
    /// node would classify as without the list
    fn with_enum(node: &SchemaNode, declared: &str, spec: FieldSpec) -> FieldSpec {
        match &node.enum_values {
            Some(values) if declared != "array" => FieldSpec::Enum {
                values: values.iter().filter_map(EnumLiteral::from_value).collect(),
                backing: Self::backing(spec),
            },
            _ => spec,
        }
    }

    fn backing(spec: FieldSpec) -> SubField {
        match spec {
            FieldSpec::Boolean => SubField::Boolean,
            FieldSpec::Number => SubField::Number,
            FieldSpec::String => SubField::String,
            FieldSpec::Object {
                element: Some(SubField::Reference { target }),
            } => SubField::Reference { target },
            FieldSpec::Any { reason } => SubField::Any { reason },
            _ => SubField::Any { reason: None },
        }
    }

    /// Element type of an array or object container
    fn element(items: &SchemaNode) -> SubField {
        if let Some(reason) = &items.malformed {
            return SubField::any(Unclassified::MalformedSchema(reason.clone()));
        }
        if let Some(target) = &items.ref_path {
            return SubField::Reference {
                target: TypeRef::new(target.as_str()),
            };
        }

        match normalized_type(items).as_deref() {
            Some("boolean") => SubField::Boolean,
            Some("number" | "integer") => SubField::Number,
            Some("string" | "date") => SubField::String,
            Some("array") => SubField::any(Unclassified::NestedArray),
            Some("object") => SubField::any(Unclassified::InlineObject),
            Some(other) => SubField::any(Unclassified::UnknownType(other.to_string())),
            None => SubField::any(Unclassified::MissingType),
        }
    }
}

fn normalized_type(node: &SchemaNode) -> Option<String> {
    node.schema_type
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

/// Enum values attached to an array, declared on the array or on its items
fn array_literals(node: &SchemaNode) -> Vec<EnumLiteral> {
    node.enum_values
        .as_ref()
        .or_else(|| node.items.as_ref().and_then(|items| items.enum_values.as_ref()))
        .map(|values| values.iter().filter_map(EnumLiteral::from_value).collect())
        .unwrap_or_default()
}
