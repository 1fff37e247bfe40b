//! Non-fatal findings collected while resolving a document

use serde::Serialize;
use std::fmt;

/// Category of a non-fatal finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Schema shape degraded to `Any`
    UnclassifiedSchema,
    /// Ref string without a registered target
    UnresolvedReference,
    /// Verb without a canonical action
    DroppedVerb,
    /// Later method replaced an earlier one with the same canonical action
    ActionOverwritten,
    /// Path token without a declared parameter
    UndeclaredPathParameter,
    /// Enum literal that cannot become a member
    UnsupportedEnumLiteral,
    /// Definition that is not an object schema
    NonObjectDefinition,
    /// Document without a paths map
    MissingPaths,
    /// Operation, parameter, response or section with the wrong JSON shape
    MalformedNode,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DiagnosticKind::UnclassifiedSchema => "unclassified schema",
            DiagnosticKind::UnresolvedReference => "unresolved reference",
            DiagnosticKind::DroppedVerb => "dropped verb",
            DiagnosticKind::ActionOverwritten => "action overwritten",
            DiagnosticKind::UndeclaredPathParameter => "undeclared path parameter",
            DiagnosticKind::UnsupportedEnumLiteral => "unsupported enum literal",
            DiagnosticKind::NonObjectDefinition => "non-object definition",
            DiagnosticKind::MissingPaths => "missing paths",
            DiagnosticKind::MalformedNode => "malformed node",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Document location the finding is about, e.g. `User.address` or `GET /users`
    pub subject: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.subject, self.message)
    }
}

/// Ordered list of findings for one document
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record and log a finding
    pub fn report(
        &mut self,
        kind: DiagnosticKind,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        let diagnostic = Diagnostic {
            kind,
            subject: subject.into(),
            message: message.into(),
        };
        tracing::warn!(kind = %diagnostic.kind, subject = %diagnostic.subject, "{}", diagnostic.message);
        self.entries.push(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
