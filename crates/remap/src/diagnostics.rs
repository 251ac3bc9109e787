//! Diagnostics produced by resolution and auditing.
//!
//! Resolution failures are hard errors; unused-configuration findings are
//! soft warnings. Both flow through the
//! [`DiagnosticSink`](crate::traits::DiagnosticSink) collaborator.

use serde::{Deserialize, Serialize};

use crate::traits::DiagnosticSink;

/// Severity level for a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticLevel {
    /// Advisory finding (never fails a build).
    Warning,
    /// Definite problem (blocks emission).
    Error,
}

/// What a diagnostic points at: a mapper class, one of its methods, or a
/// specific member (field or enum constant) inside a method.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
}

impl Location {
    /// Point at a mapper class.
    pub fn class(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            method: None,
            member: None,
        }
    }

    /// Point at a mapping method.
    pub fn method(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            method: Some(method.into()),
            member: None,
        }
    }

    /// Point at a field or enum constant inside a mapping method.
    pub fn member(
        class: impl Into<String>,
        method: impl Into<String>,
        member: impl Into<String>,
    ) -> Self {
        Self {
            class: class.into(),
            method: Some(method.into()),
            member: Some(member.into()),
        }
    }
}

/// A diagnostic produced during a generation session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Error,
            message: message.into(),
            location: None,
        }
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            message: message.into(),
            location: None,
        }
    }

    /// Attach the location the diagnostic points at.
    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

/// Sink that keeps everything it receives, for tests and embedding
/// toolchains that read results back out.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Warning)
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_attaches_location() {
        let diagnostic =
            Diagnostic::error("no such field").at(Location::member("PersonMapper", "to_dto", "age"));

        assert_eq!(diagnostic.level, DiagnosticLevel::Error);
        let location = diagnostic.location.as_ref().unwrap();
        assert_eq!(location.method.as_deref(), Some("to_dto"));
        assert_eq!(location.member.as_deref(), Some("age"));
    }
}
