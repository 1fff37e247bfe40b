//! Swagger/OpenAPI document resolution
//!
//! This crate turns one Swagger-shaped document into the restgen
//! intermediate representation (`ApiModel`).
//!
//! ## Resolution Strategy
//!
//! Two passes per document:
//! 1. Every named schema and parameter is registered without following refs,
//!    then the registry is sealed.
//! 2. Paths are aggregated into services; refs are read through the sealed
//!    registry, so declaration order never matters.
//!
//! Verbs are mapped to canonical actions:
//! - GET on a collection path → get
//! - GET on an item path (`/users/{id}`) → getById
//! - POST → create
//! - PUT → update
//! - DELETE → remove
//! - PATCH, HEAD, OPTIONS → dropped

mod aggregator;
mod batch;
mod context;
mod definition;
mod operation_mapper;
mod resolver;
pub mod swagger;
mod type_classifier;

pub use aggregator::{build_method, build_service, ServiceCollection};
pub use batch::{run_batch, BatchFailure, BatchReport, DocumentSource, FailurePolicy, FileSource};
pub use context::ParseContext;
pub use definition::build_definition;
pub use operation_mapper::OperationMapper;
pub use resolver::{
    classify_body_schema, resolve_parameter, resolve_request_body, resolve_response,
    REQUEST_BODY_PARAMETER,
};
pub use swagger::SwaggerParser;
pub use type_classifier::TypeClassifier;

use restgen_common::{ApiModel, Result};
use std::path::Path;

/// Parse and resolve a document file
///
/// # Arguments
/// * `path` - Path to a JSON or YAML document
///
/// # Returns
/// * `ApiModel` - Services, registry and diagnostics of the document
pub fn parse_document<P: AsRef<Path>>(path: P) -> Result<ApiModel> {
    let parser = SwaggerParser::from_file(path)?;
    parser.parse()
}
