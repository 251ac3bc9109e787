//! Collaborator traits the engine is written against.
//!
//! The core owns none of its surroundings: the host type system, the output
//! artifact and the diagnostics channel are all injected through these
//! traits.

use crate::diagnostics::Diagnostic;
use crate::ir::TypeDescriptor;
use crate::plan::MapperPlan;

/// Resolves a qualified type name to its structural descriptor.
///
/// Implementations must be deterministic and side-effect-free. The resolver
/// re-fetches member data through this trait, which is what keeps cyclic
/// object graphs representable.
pub trait TypeIntrospection {
    fn describe(&self, qualified_name: &str) -> Option<&TypeDescriptor>;
}

/// Error from an emission sink.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("emission failed: {0}")]
    Sink(String),
}

/// Consumes a finished mapper plan and produces the artifact.
///
/// The engine does not know or care about the output syntax. Plans with hard
/// errors never reach the sink.
pub trait EmissionSink {
    fn emit(&mut self, plan: &MapperPlan) -> Result<(), EmitError>;
}

/// Records diagnostics for the consuming toolchain.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}
