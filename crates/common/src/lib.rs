//! Common types and utilities for restgen
//!
//! This crate contains the intermediate representation produced by the
//! parser and consumed by the generator: classified field types, the
//! per-document registry, resource services, naming utilities, diagnostics
//! and shared error types.

pub mod config;
pub mod diagnostics;
pub mod field;
pub mod model;
pub mod naming;
pub mod registry;

pub use config::GeneratorConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use field::{
    EnumLiteral, EnumToken, EnumValue, FieldSpec, FieldType, SubField, TypeRef, Unclassified,
};
pub use model::{
    ApiModel, CallTemplate, CanonicalAction, Definition, HttpVerb, Method, Parameter, ParameterKind,
    ParameterLocation, Response, Service, TemplateSegment,
};
pub use registry::{Registry, Resolution};

use thiserror::Error;

/// Errors that can occur while reading documents or generating clients
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Document {0} declares no definitions or components.schemas")]
    MissingTypeUniverse(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;
