//! Mapping and completion registries.
//!
//! The [`MappingRegistry`] holds the declared customizations for one session
//! and the set of customization ids that resolution consulted; the
//! [`CompletionRegistry`] is the process-wide dedup gate for generated class
//! identities.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::config::{CustomConverter, EnumMapping, FieldOverride, MapperConfig};

/// Stable identity of one declared customization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomizationId {
    Override(usize),
    Ignore(usize),
    Converter(usize),
    EnumTable(usize),
}

/// Declared customizations plus the consulted set for one session.
///
/// The declared configuration is never mutated. Every lookup that feeds a
/// resolution marks its customization id, and the auditor diffs the marks
/// against the declared set when the session ends.
#[derive(Debug)]
pub struct MappingRegistry {
    config: MapperConfig,
    consulted: HashSet<CustomizationId>,
}

impl MappingRegistry {
    pub fn new(config: MapperConfig) -> Self {
        Self {
            config,
            consulted: HashSet::new(),
        }
    }

    /// Custom converter declared for an exact (input, output) pair.
    pub fn converter_for(
        &self,
        input: &str,
        output: &str,
    ) -> Option<(CustomizationId, &CustomConverter)> {
        self.config
            .converters
            .iter()
            .enumerate()
            .find(|(_, c)| c.input == input && c.output == output)
            .map(|(i, c)| (CustomizationId::Converter(i), c))
    }

    /// Enum value table declared for an exact (input, output) pair.
    pub fn enum_mapping_for(
        &self,
        input: &str,
        output: &str,
    ) -> Option<(CustomizationId, &EnumMapping)> {
        self.config
            .enum_mappings
            .iter()
            .enumerate()
            .find(|(_, m)| m.input == input && m.output == output)
            .map(|(i, m)| (CustomizationId::EnumTable(i), m))
    }

    /// Field override declared for a destination field.
    pub fn override_for(&self, target: &str) -> Option<(CustomizationId, &FieldOverride)> {
        self.config
            .field_overrides
            .iter()
            .enumerate()
            .find(|(_, o)| o.target == target)
            .map(|(i, o)| (CustomizationId::Override(i), o))
    }

    /// Ignore rule matching a destination field.
    pub fn ignore_for(&self, field: &str) -> Option<CustomizationId> {
        self.config
            .ignored_fields
            .iter()
            .position(|f| f == field)
            .map(CustomizationId::Ignore)
    }

    pub fn mark_consulted(&mut self, id: CustomizationId) {
        self.consulted.insert(id);
    }

    pub fn is_consulted(&self, id: CustomizationId) -> bool {
        self.consulted.contains(&id)
    }

    pub fn source_classes(&self) -> &[String] {
        &self.config.source_classes
    }

    /// Declared customizations never consulted, with a human-readable
    /// description for the auditor.
    pub fn unconsulted(&self) -> Vec<(CustomizationId, String)> {
        let mut unused = Vec::new();
        for (i, o) in self.config.field_overrides.iter().enumerate() {
            let id = CustomizationId::Override(i);
            if !self.is_consulted(id) {
                unused.push((
                    id,
                    format!("custom field mapping for \"{}\" was never used", o.target),
                ));
            }
        }
        for (i, field) in self.config.ignored_fields.iter().enumerate() {
            let id = CustomizationId::Ignore(i);
            if !self.is_consulted(id) {
                unused.push((id, format!("ignore rule for \"{field}\" matched no field")));
            }
        }
        for (i, c) in self.config.converters.iter().enumerate() {
            let id = CustomizationId::Converter(i);
            if !self.is_consulted(id) {
                unused.push((
                    id,
                    format!(
                        "custom converter {}::{} ({} -> {}) was never used",
                        c.holder, c.method, c.input, c.output
                    ),
                ));
            }
        }
        for (i, m) in self.config.enum_mappings.iter().enumerate() {
            let id = CustomizationId::EnumTable(i);
            if !self.is_consulted(id) {
                unused.push((
                    id,
                    format!("enum mapping {} -> {} was never used", m.input, m.output),
                ));
            }
        }
        unused
    }
}

/// Process-wide dedup gate for generated class identities.
///
/// Created once per toolchain run and shared by reference across sessions:
/// the host may re-present the same request across incremental rounds, and
/// without this gate duplicate emission would produce conflicting output.
/// No eviction; entries live for the run.
#[derive(Debug, Default)]
pub struct CompletionRegistry {
    done: Mutex<HashSet<String>>,
}

impl CompletionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_done(&self, identity: &str) -> bool {
        self.done.lock().unwrap().contains(identity)
    }

    /// Record an identity. Returns `false` when it was already present.
    pub fn mark_done(&self, identity: &str) -> bool {
        self.done.lock().unwrap().insert(identity.to_string())
    }
}
