//! Strategy resolution for (input, output) descriptor pairs.
//!
//! The resolver is a fixed-priority chain, most specific first:
//!
//! 1. structurally identical pair → direct copy
//! 2. custom converter declared for the exact pair → converter call
//! 3. enum → enum → value table (explicit entries, then name equality)
//! 4. sequence → sequence → element-wise mapping, element resolved
//!    recursively
//! 5. at least one declared-object side → deferred call to the mapping
//!    method for the pair, creating a nested-mapping obligation when none is
//!    declared yet
//!
//! Anything else fails with an unsupported-conversion error. Failures are
//! collected, never thrown eagerly, so one pass surfaces every problem.

use std::collections::{HashMap, VecDeque};

use crate::diagnostics::{Diagnostic, Location};
use crate::ir::{snake_case, FieldDescriptor, TypeDescriptor, TypeKind};
use crate::plan::MappingStep;
use crate::registry::MappingRegistry;
use crate::traits::TypeIntrospection;

/// Errors produced while resolving a conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    #[error("in type {input} and out type {output} differ and this conversion is not supported")]
    UnsupportedConversion {
        method: String,
        input: String,
        output: String,
    },

    #[error("enum constant {constant} of {output} has no match in {input} and no declared mapping")]
    MissingEnumMapping {
        method: String,
        input: String,
        output: String,
        constant: String,
    },

    #[error("field {field} of {output} has no source in {input}; map or ignore it")]
    MissingSourceField {
        method: String,
        field: String,
        input: String,
        output: String,
    },

    #[error("override for field {field} reads {expression}, which does not resolve on {input}")]
    BadOverride {
        method: String,
        field: String,
        expression: String,
        input: String,
    },
}

impl MappingError {
    /// Method the error is attributed to.
    pub fn method(&self) -> &str {
        match self {
            Self::UnsupportedConversion { method, .. }
            | Self::MissingEnumMapping { method, .. }
            | Self::MissingSourceField { method, .. }
            | Self::BadOverride { method, .. } => method,
        }
    }

    /// Render as a hard diagnostic attributed to a mapper class.
    pub fn into_diagnostic(self, class: &str) -> Diagnostic {
        let location = match &self {
            Self::UnsupportedConversion { method, .. } => Location::method(class, method),
            Self::MissingEnumMapping {
                method, constant, ..
            } => Location::member(class, method, constant),
            Self::MissingSourceField { method, field, .. }
            | Self::BadOverride { method, field, .. } => Location::member(class, method, field),
        };
        Diagnostic::error(self.to_string()).at(location)
    }
}

/// Outcome of one resolution attempt. Never retried.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionOutcome {
    Resolved(MappingStep),
    Failed(Vec<MappingError>),
}

/// Resolution context for one generation session: the known mapping method
/// for each type pair plus the queue of nested-mapping obligations
/// discovered mid-resolution.
///
/// The pair → method table doubles as the seen set: a pair that is already
/// declared or queued resolves to a deferred call instead of a new
/// obligation, which is what terminates cyclic object graphs.
pub struct Resolver<'a> {
    types: &'a dyn TypeIntrospection,
    methods: HashMap<(String, String), String>,
    pending: VecDeque<(TypeDescriptor, TypeDescriptor, String)>,
}

impl<'a> Resolver<'a> {
    pub fn new(types: &'a dyn TypeIntrospection) -> Self {
        Self {
            types,
            methods: HashMap::new(),
            pending: VecDeque::new(),
        }
    }

    /// Record a declared mapping method as the handler for its pair. The
    /// first declaration wins.
    pub fn register_method(
        &mut self,
        input: &TypeDescriptor,
        output: &TypeDescriptor,
        name: &str,
    ) {
        self.methods
            .entry((input.name.clone(), output.name.clone()))
            .or_insert_with(|| name.to_string());
    }

    /// The method that handles a pair, declared or queued.
    pub fn method_for(&self, input: &TypeDescriptor, output: &TypeDescriptor) -> Option<&str> {
        self.methods
            .get(&(input.name.clone(), output.name.clone()))
            .map(String::as_str)
    }

    /// Next nested-mapping obligation: (input, output, method name).
    pub fn next_obligation(&mut self) -> Option<(TypeDescriptor, TypeDescriptor, String)> {
        self.pending.pop_front()
    }

    /// Resolve one (input, output) pair on behalf of `method`.
    pub fn resolve(
        &mut self,
        method: &str,
        input: &TypeDescriptor,
        output: &TypeDescriptor,
        registry: &mut MappingRegistry,
    ) -> ResolutionOutcome {
        use ResolutionOutcome::{Failed, Resolved};

        if input.name == output.name {
            return Resolved(MappingStep::Direct);
        }

        // An explicit user-supplied converter overrides structural mapping.
        if let Some((id, converter)) = registry.converter_for(&input.name, &output.name) {
            let step = MappingStep::Convert {
                holder: converter.holder.clone(),
                method: converter.method.clone(),
            };
            registry.mark_consulted(id);
            return Resolved(step);
        }

        match (input.kind, output.kind) {
            (TypeKind::Enum, TypeKind::Enum) => self.resolve_enum(method, input, output, registry),

            (
                TypeKind::Collection | TypeKind::Array,
                TypeKind::Collection | TypeKind::Array,
            ) => {
                let (Some(in_element), Some(out_element)) =
                    (self.element_of(input), self.element_of(output))
                else {
                    return Failed(vec![unsupported(method, input, output)]);
                };
                match self.resolve(method, &in_element, &out_element, registry) {
                    Resolved(step) => Resolved(MappingStep::ForEach {
                        element: Box::new(step),
                    }),
                    failed => failed,
                }
            }

            _ if input.kind == TypeKind::Declared || output.kind == TypeKind::Declared => {
                Resolved(MappingStep::MapWith {
                    method: self.obligation_method(input, output),
                })
            }

            _ => Failed(vec![unsupported(method, input, output)]),
        }
    }

    fn resolve_enum(
        &mut self,
        method: &str,
        input: &TypeDescriptor,
        output: &TypeDescriptor,
        registry: &mut MappingRegistry,
    ) -> ResolutionOutcome {
        let declared = registry
            .enum_mapping_for(&input.name, &output.name)
            .map(|(id, mapping)| (id, mapping.table.clone()));
        if let Some((id, _)) = &declared {
            registry.mark_consulted(*id);
        }
        let table: &[(String, String)] = declared
            .as_ref()
            .map(|(_, table)| table.as_slice())
            .unwrap_or(&[]);

        let in_constants = self.constants_of(input);
        let out_constants = self.constants_of(output);

        // Destination-driven: every destination constant must be producible,
        // via an explicit entry or an equal-named source constant.
        let mut errors = Vec::new();
        for constant in &out_constants {
            let explicit = table
                .iter()
                .any(|(from, to)| to == constant && in_constants.contains(from));
            if !explicit && !in_constants.contains(constant) {
                errors.push(MappingError::MissingEnumMapping {
                    method: method.to_string(),
                    input: input.name.clone(),
                    output: output.name.clone(),
                    constant: constant.clone(),
                });
            }
        }
        if !errors.is_empty() {
            return ResolutionOutcome::Failed(errors);
        }

        let mut entries = Vec::new();
        for source in &in_constants {
            let entry = table
                .iter()
                .find(|(from, to)| from == source && out_constants.contains(to));
            if let Some((_, to)) = entry {
                entries.push((source.clone(), to.clone()));
            } else if out_constants.contains(source) {
                entries.push((source.clone(), source.clone()));
            }
        }
        let exhaustive = entries.len() == in_constants.len();

        ResolutionOutcome::Resolved(MappingStep::EnumTable {
            input: input.name.clone(),
            output: output.name.clone(),
            entries,
            exhaustive,
        })
    }

    /// The method name for a pair, creating a nested-mapping obligation when
    /// the pair is neither declared nor queued yet.
    fn obligation_method(&mut self, input: &TypeDescriptor, output: &TypeDescriptor) -> String {
        let key = (input.name.clone(), output.name.clone());
        if let Some(name) = self.methods.get(&key) {
            return name.clone();
        }
        let name = format!(
            "map_{}_to_{}",
            snake_case(input.simple_name()),
            snake_case(output.simple_name())
        );
        self.methods.insert(key, name.clone());
        self.pending
            .push_back((input.clone(), output.clone(), name.clone()));
        name
    }

    /// Fields of a declared type, preferring embedded members and falling
    /// back to introspection for shallow descriptors.
    pub fn fields_of(&self, ty: &TypeDescriptor) -> Vec<FieldDescriptor> {
        if !ty.fields.is_empty() {
            return ty.fields.clone();
        }
        self.types
            .describe(&ty.name)
            .map(|full| full.fields.clone())
            .unwrap_or_default()
    }

    fn constants_of(&self, ty: &TypeDescriptor) -> Vec<String> {
        if !ty.constants.is_empty() {
            return ty.constants.clone();
        }
        self.types
            .describe(&ty.name)
            .map(|full| full.constants.clone())
            .unwrap_or_default()
    }

    fn element_of(&self, ty: &TypeDescriptor) -> Option<TypeDescriptor> {
        if let Some(element) = &ty.element {
            return Some((**element).clone());
        }
        self.types
            .describe(&ty.name)
            .and_then(|full| full.element.as_deref().cloned())
    }
}

fn unsupported(method: &str, input: &TypeDescriptor, output: &TypeDescriptor) -> MappingError {
    MappingError::UnsupportedConversion {
        method: method.to_string(),
        input: input.name.clone(),
        output: output.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TypeCatalog;
    use crate::config::{CustomConverter, MapperConfig};

    fn resolve_pair(
        catalog: &TypeCatalog,
        config: MapperConfig,
        input: &TypeDescriptor,
        output: &TypeDescriptor,
    ) -> ResolutionOutcome {
        let mut registry = MappingRegistry::new(config);
        let mut resolver = Resolver::new(catalog);
        resolver.resolve("convert", input, output, &mut registry)
    }

    #[test]
    fn identical_pair_is_a_direct_copy() {
        let catalog = TypeCatalog::new();
        let ty = TypeDescriptor::primitive("u32");
        let outcome = resolve_pair(&catalog, MapperConfig::new(), &ty, &ty.clone());
        assert_eq!(outcome, ResolutionOutcome::Resolved(MappingStep::Direct));
    }

    #[test]
    fn mismatched_primitives_are_unsupported() {
        let catalog = TypeCatalog::new();
        let outcome = resolve_pair(
            &catalog,
            MapperConfig::new(),
            &TypeDescriptor::primitive("u32"),
            &TypeDescriptor::primitive("String"),
        );
        let ResolutionOutcome::Failed(errors) = outcome else {
            panic!("expected failure");
        };
        assert!(matches!(
            errors[0],
            MappingError::UnsupportedConversion { .. }
        ));
    }

    #[test]
    fn converter_wins_over_the_enum_builder() {
        let catalog = TypeCatalog::new();
        let status = TypeDescriptor::enumeration("Status", vec!["ACTIVE"]);
        let status_dto = TypeDescriptor::enumeration("StatusDto", vec!["ACTIVE"]);
        let config = MapperConfig::new().with_converter(CustomConverter::new(
            "Status",
            "StatusDto",
            "StatusCodec",
            "convert",
        ));

        let outcome = resolve_pair(&catalog, config, &status, &status_dto);
        assert!(matches!(
            outcome,
            ResolutionOutcome::Resolved(MappingStep::Convert { .. })
        ));
    }

    #[test]
    fn enum_constants_match_by_name() {
        let catalog = TypeCatalog::new();
        let outcome = resolve_pair(
            &catalog,
            MapperConfig::new(),
            &TypeDescriptor::enumeration("Status", vec!["ACTIVE", "INACTIVE"]),
            &TypeDescriptor::enumeration("StatusDto", vec!["ACTIVE", "INACTIVE"]),
        );
        let ResolutionOutcome::Resolved(MappingStep::EnumTable {
            entries, exhaustive, ..
        }) = outcome
        else {
            panic!("expected enum table");
        };
        assert_eq!(entries.len(), 2);
        assert!(exhaustive);
    }

    #[test]
    fn collection_elements_resolve_recursively() {
        let catalog = TypeCatalog::new();
        let input = TypeDescriptor::collection(TypeDescriptor::declared_ref("Address"));
        let output = TypeDescriptor::collection(TypeDescriptor::declared_ref("AddressDto"));

        let mut registry = MappingRegistry::new(MapperConfig::new());
        let mut resolver = Resolver::new(&catalog);
        let outcome = resolver.resolve("convert", &input, &output, &mut registry);

        let ResolutionOutcome::Resolved(MappingStep::ForEach { element }) = outcome else {
            panic!("expected element-wise mapping");
        };
        assert!(matches!(*element, MappingStep::MapWith { .. }));
        assert!(resolver.next_obligation().is_some());
    }
}
