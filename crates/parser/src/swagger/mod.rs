//! Swagger 2 / OpenAPI 3 document parser
//!
//! Parses Swagger-shaped documents into the restgen IR (`ApiModel`).
//!
//! ## Accepted Layouts
//! - **Swagger 2**: flat `definitions` and `parameters` maps, refs like
//!   `#/definitions/Pet`
//! - **OpenAPI 3**: nested `components.schemas` and `components.parameters`,
//!   refs like `#/components/schemas/Pet`, plus `requestBody` and
//!   media-typed `content` on responses
//!
//! Both layouts may appear in one document and are normalized identically.
//!
//! ## Usage
//! ```rust,ignore
//! use restgen_parser::swagger::SwaggerParser;
//!
//! let parser = SwaggerParser::from_file("docs/publisher.json")?;
//! let model = parser.parse()?;
//! ```

mod converter;
mod parser;
mod types;

pub use parser::SwaggerParser;
pub use types::*;
