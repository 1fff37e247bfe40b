//! Per-document parse state
//!
//! One context is built for each document and dropped with it; nothing is
//! shared between documents.

use crate::swagger::SchemaNode;
use crate::type_classifier::TypeClassifier;
use restgen_common::{DiagnosticKind, Diagnostics, FieldSpec, Registry, Unclassified};

/// Registry and diagnostics threaded through both passes
#[derive(Debug, Default)]
pub struct ParseContext {
    pub registry: Registry,
    pub diagnostics: Diagnostics,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a node and report anything it degraded
    pub fn classify(&mut self, subject: &str, node: &SchemaNode) -> FieldSpec {
        let spec = TypeClassifier::classify(node);
        self.report_unclassified(subject, &spec);
        self.report_enum_literals(subject, node);
        spec
    }

    /// Report degraded shapes inside an already classified spec
    ///
    /// Unresolved references are left to the reference audit.
    pub fn report_unclassified(&mut self, subject: &str, spec: &FieldSpec) {
        for reason in spec.unclassified() {
            if matches!(reason, Unclassified::UnresolvedReference(_)) {
                continue;
            }
            self.diagnostics.report(
                DiagnosticKind::UnclassifiedSchema,
                subject,
                format!("degraded to any: {}", reason),
            );
        }
    }

    pub fn report_enum_literals(&mut self, subject: &str, node: &SchemaNode) {
        for value in TypeClassifier::unsupported_enum_literals(node) {
            self.diagnostics.report(
                DiagnosticKind::UnsupportedEnumLiteral,
                subject,
                format!("enum literal {} is skipped", value),
            );
        }
    }
}
