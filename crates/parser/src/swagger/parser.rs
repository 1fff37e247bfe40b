//! Swagger document file parser

use super::types::SwaggerDocument;
use restgen_common::{ApiModel, GeneratorError, Result};
use std::fs;
use std::path::Path;

/// Swagger/OpenAPI document parser
///
/// Holds one loaded document. Each parser resolves its document against a
/// registry of its own, so parsers for different documents never share state.
pub struct SwaggerParser {
    /// Loaded document
    document: SwaggerDocument,

    /// Where the document came from, used in errors and diagnostics
    source: String,
}

impl SwaggerParser {
    /// Load a document from a file path
    ///
    /// `.yaml` and `.yml` files are read as YAML, anything else as JSON.
    ///
    /// # Example
    /// ```rust,ignore
    /// let parser = SwaggerParser::from_file("docs/publisher.json")?;
    /// let model = parser.parse()?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Fetch(format!("Failed to read document {}: {}", path.display(), e))
        })?;

        Self::from_content(&content, &path.display().to_string())
    }

    /// Parse document text, choosing the format from the location's extension
    pub fn from_content(content: &str, location: &str) -> Result<Self> {
        let lower = location.to_ascii_lowercase();
        let parser = if lower.ends_with(".yaml") || lower.ends_with(".yml") {
            Self::from_yaml(content)?
        } else {
            Self::from_json(content)?
        };
        Ok(parser.with_source(location))
    }

    /// Parse a document from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let document: SwaggerDocument = serde_json::from_str(json)
            .map_err(|e| GeneratorError::Parse(format!("Failed to parse document JSON: {}", e)))?;

        Ok(Self::from_document(document))
    }

    /// Parse a document from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let document: SwaggerDocument = serde_yaml::from_str(yaml)
            .map_err(|e| GeneratorError::Parse(format!("Failed to parse document YAML: {}", e)))?;

        Ok(Self::from_document(document))
    }

    /// Wrap an already deserialized document
    pub fn from_document(document: SwaggerDocument) -> Self {
        Self {
            document,
            source: "<inline>".to_string(),
        }
    }

    /// Set the label used for this document in errors and diagnostics
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    /// Resolve the document into the IR
    pub fn parse(&self) -> Result<ApiModel> {
        super::converter::convert_document(&self.document, &self.source)
    }

    /// Get reference to the underlying document
    pub fn document(&self) -> &SwaggerDocument {
        &self.document
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_document() {
        let json = r#"{
            "swagger": "2.0",
            "info": {
                "title": "Test API",
                "version": "1.0.0"
            },
            "definitions": {},
            "paths": {}
        }"#;

        let parser = SwaggerParser::from_json(json);
        assert!(parser.is_ok());

        let parser = parser.unwrap();
        assert_eq!(parser.document().swagger.as_deref(), Some("2.0"));
        assert_eq!(parser.document().title(), Some("Test API"));

        let model = parser.parse().unwrap();
        assert_eq!(model.title.as_deref(), Some("Test API"));
        assert_eq!(model.source, "<inline>");
    }

    #[test]
    fn test_yaml_by_extension() {
        let yaml = "openapi: 3.0.0\ncomponents:\n  schemas:\n    Pet:\n      type: object\npaths: {}\n";
        let parser = SwaggerParser::from_content(yaml, "specs/pets.YAML").unwrap();
        assert_eq!(parser.source(), "specs/pets.YAML");
        assert_eq!(parser.parse().unwrap().registry.definition_count(), 1);
    }

    #[test]
    fn test_invalid_content_is_parse_error() {
        assert!(matches!(
            SwaggerParser::from_json("{not json"),
            Err(GeneratorError::Parse(_))
        ));
        assert!(matches!(
            SwaggerParser::from_content("[1, 2", "doc.yaml"),
            Err(GeneratorError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            SwaggerParser::from_file(dir.path().join("absent.json")),
            Err(GeneratorError::Fetch(_))
        ));
    }
}
