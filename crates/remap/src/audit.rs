//! Declared-but-unused configuration detection.
//!
//! Advisory only: findings are soft warnings and never fail a build. They
//! catch stale configuration, like an ignore rule for a field that no longer
//! exists or a converter nothing references anymore.

use crate::diagnostics::{Diagnostic, Location};
use crate::registry::MappingRegistry;
use crate::traits::DiagnosticSink;

/// Report one warning per declared customization that no resolution
/// consulted. Returns the number of warnings reported.
pub fn audit_unused(
    registry: &MappingRegistry,
    class: &str,
    diagnostics: &mut dyn DiagnosticSink,
) -> usize {
    let unused = registry.unconsulted();
    for (_, description) in &unused {
        diagnostics.report(Diagnostic::warning(description.clone()).at(Location::class(class)));
    }
    if !unused.is_empty() {
        tracing::debug!(class, count = unused.len(), "unused mapper customizations");
    }
    unused.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapperConfig;
    use crate::diagnostics::CollectingSink;

    #[test]
    fn each_unused_entry_warns_once() {
        let config = MapperConfig::new()
            .ignore_field("checksum")
            .map_field("city", "address.city");
        let registry = MappingRegistry::new(config);
        let mut sink = CollectingSink::new();

        let count = audit_unused(&registry, "PersonMapper", &mut sink);

        assert_eq!(count, 2);
        assert_eq!(sink.warnings().count(), 2);
        assert_eq!(sink.errors().count(), 0);
    }
}
