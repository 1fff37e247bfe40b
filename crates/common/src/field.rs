//! Classified field types
//!
//! A [`FieldSpec`] is the closed description of one property, parameter or
//! response body. References to other types are kept as [`TypeRef`] strings
//! and resolved against the [`Registry`](crate::Registry) only when read.

use crate::naming::{safe_enum_name, starts_with_digit};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ref prefixes understood by the registry, flat and nested conventions
pub const REF_PREFIXES: [&str; 4] = [
    "#/definitions/",
    "#/parameters/",
    "#/components/schemas/",
    "#/components/parameters/",
];

/// Deferred reference to a registered definition or parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(String);

impl TypeRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// The raw ref string as written in the document
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Registry key: the ref with any known prefix stripped
    ///
    /// # Examples
    /// ```
    /// use restgen_common::TypeRef;
    ///
    /// assert_eq!(TypeRef::new("#/definitions/Pet").target_name(), "Pet");
    /// assert_eq!(TypeRef::new("#/components/schemas/Pet").target_name(), "Pet");
    /// assert_eq!(TypeRef::new("Pet").target_name(), "Pet");
    /// ```
    pub fn target_name(&self) -> &str {
        REF_PREFIXES
            .iter()
            .find_map(|prefix| self.0.strip_prefix(prefix))
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Closed set of field type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Boolean,
    Number,
    String,
    Enum,
    Array,
    Object,
    Any,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Boolean => "boolean",
            FieldType::Number => "number",
            FieldType::String => "string",
            FieldType::Enum => "enum",
            FieldType::Array => "array",
            FieldType::Object => "object",
            FieldType::Any => "any",
        };
        f.write_str(name)
    }
}

/// Why a node degraded to `Any`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unclassified {
    /// Declared `type` outside the supported set
    UnknownType(String),
    /// No `type` and no `$ref` to infer one from
    MissingType,
    /// Array nested directly inside an array
    NestedArray,
    /// Element declared as an inline object without a `$ref`
    InlineObject,
    /// Schema position holding something other than a schema object
    MalformedSchema(String),
    /// Ref string with no registered target
    UnresolvedReference(TypeRef),
}

impl fmt::Display for Unclassified {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unclassified::UnknownType(t) => write!(f, "unknown type '{}'", t),
            Unclassified::MissingType => f.write_str("missing type"),
            Unclassified::NestedArray => f.write_str("array of arrays is not expanded"),
            Unclassified::InlineObject => f.write_str("inline object element has no named type"),
            Unclassified::MalformedSchema(reason) => write!(f, "malformed schema: {}", reason),
            Unclassified::UnresolvedReference(r) => write!(f, "unresolved reference '{}'", r),
        }
    }
}

/// Element or backing type of an array, enum or object container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubField {
    Boolean,
    Number,
    String,
    Reference { target: TypeRef },
    Any { reason: Option<Unclassified> },
}

impl SubField {
    pub fn reference(target: impl Into<String>) -> Self {
        SubField::Reference {
            target: TypeRef::new(target),
        }
    }

    pub fn any(reason: Unclassified) -> Self {
        SubField::Any {
            reason: Some(reason),
        }
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            SubField::Boolean => FieldType::Boolean,
            SubField::Number => FieldType::Number,
            SubField::String => FieldType::String,
            SubField::Reference { .. } => FieldType::Object,
            SubField::Any { .. } => FieldType::Any,
        }
    }

    pub fn target(&self) -> Option<&TypeRef> {
        match self {
            SubField::Reference { target } => Some(target),
            _ => None,
        }
    }
}

/// Classified type of one property, parameter or response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldSpec {
    Boolean,
    Number,
    String,
    Enum {
        values: Vec<EnumLiteral>,
        backing: SubField,
    },
    Array {
        element: SubField,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        values: Vec<EnumLiteral>,
    },
    Object {
        element: Option<SubField>,
    },
    Any {
        reason: Option<Unclassified>,
    },
}

impl FieldSpec {
    pub fn any(reason: Unclassified) -> Self {
        FieldSpec::Any {
            reason: Some(reason),
        }
    }

    /// Object whose body is the referenced definition
    pub fn object_ref(target: impl Into<String>) -> Self {
        FieldSpec::Object {
            element: Some(SubField::reference(target)),
        }
    }

    /// Array whose elements are the referenced definition
    pub fn array_of_ref(target: impl Into<String>) -> Self {
        FieldSpec::Array {
            element: SubField::reference(target),
            values: Vec::new(),
        }
    }

    pub fn unresolved(target: &TypeRef) -> Self {
        FieldSpec::any(Unclassified::UnresolvedReference(target.clone()))
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            FieldSpec::Boolean => FieldType::Boolean,
            FieldSpec::Number => FieldType::Number,
            FieldSpec::String => FieldType::String,
            FieldSpec::Enum { .. } => FieldType::Enum,
            FieldSpec::Array { .. } => FieldType::Array,
            FieldSpec::Object { .. } => FieldType::Object,
            FieldSpec::Any { .. } => FieldType::Any,
        }
    }

    /// Element, backing or container subfield if this variant has one
    pub fn sub_field(&self) -> Option<&SubField> {
        match self {
            FieldSpec::Enum { backing, .. } => Some(backing),
            FieldSpec::Array { element, .. } => Some(element),
            FieldSpec::Object { element } => element.as_ref(),
            _ => None,
        }
    }

    /// The deferred reference carried by this field, if any
    pub fn reference(&self) -> Option<&TypeRef> {
        self.sub_field().and_then(SubField::target)
    }

    pub fn enum_values(&self) -> Option<&[EnumLiteral]> {
        match self {
            FieldSpec::Enum { values, .. } => Some(values),
            FieldSpec::Array { values, .. } if !values.is_empty() => Some(values),
            _ => None,
        }
    }

    /// Every degradation recorded in this field and its subfield
    pub fn unclassified(&self) -> Vec<&Unclassified> {
        let mut reasons = Vec::new();
        if let FieldSpec::Any {
            reason: Some(reason),
        } = self
        {
            reasons.push(reason);
        }
        if let Some(SubField::Any {
            reason: Some(reason),
        }) = self.sub_field()
        {
            reasons.push(reason);
        }
        reasons
    }
}

/// Enum member name, quoted when it would start with a digit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumToken {
    pub name: String,
    pub quoted: bool,
}

impl fmt::Display for EnumToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quoted {
            write!(f, "'{}'", self.name)
        } else {
            f.write_str(&self.name)
        }
    }
}

/// Value carried by an enum member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumValue {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumValue::Text(text) => write!(f, "'{}'", text),
            EnumValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// One enum member: safe token plus the original literal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumLiteral {
    pub token: EnumToken,
    pub value: EnumValue,
}

impl EnumLiteral {
    /// Build the member for a raw enum literal
    ///
    /// Returns `None` for literals that cannot be an enum member
    /// (null, arrays, objects).
    ///
    /// # Examples
    /// ```
    /// use restgen_common::EnumLiteral;
    ///
    /// let literal = EnumLiteral::from_value(&serde_json::json!("3d-model")).unwrap();
    /// assert_eq!(literal.to_string(), "'3D_MODEL' = '3d-model'");
    /// ```
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(flag) => {
                let (name, text) = if *flag {
                    ("TRUE", "true")
                } else {
                    ("FALSE", "false")
                };
                Some(Self {
                    token: EnumToken {
                        name: name.to_string(),
                        quoted: false,
                    },
                    value: EnumValue::Text(text.to_string()),
                })
            }
            serde_json::Value::Number(n) => Some(Self {
                token: EnumToken {
                    name: safe_enum_name(&n.to_string()),
                    quoted: true,
                },
                value: EnumValue::Number(n.clone()),
            }),
            serde_json::Value::String(text) => {
                let safe = safe_enum_name(text);
                Some(Self {
                    token: EnumToken {
                        quoted: starts_with_digit(&safe),
                        name: safe.to_uppercase(),
                    },
                    value: EnumValue::Text(text.clone()),
                })
            }
            _ => None,
        }
    }
}

impl fmt::Display for EnumLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.token, self.value)
    }
}
