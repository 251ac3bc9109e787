//! One mapping-class build from request to emission plan.
//!
//! A session gates on the completion registry, validates every declared
//! method up front, plans each method field by field, drains the
//! nested-mapping obligation queue, assembles the constructor shape, hands
//! the plan to the emission sink, and finishes with the usage audit.
//! Failures are collected across all methods so a single invocation reports
//! the complete set of problems for a class.

use crate::audit::audit_unused;
use crate::config::MapperConfig;
use crate::ir::{self, MappingMethodSpec, TypeDescriptor, TypeKind};
use crate::plan::{
    ConverterField, FieldBinding, MapperPlan, MappingStep, MethodBody, MethodPlan,
    SourceClassEntry,
};
use crate::registry::{CompletionRegistry, MappingRegistry};
use crate::resolve::{MappingError, ResolutionOutcome, Resolver};
use crate::traits::{DiagnosticSink, EmissionSink, TypeIntrospection};

/// Suffix appended to the class identity's simple name for the generated
/// implementation type.
pub const MAPPER_SUFFIX: &str = "Impl";

/// Result of a completed [`GenerationSession::build`].
#[derive(Debug, Clone, PartialEq)]
pub enum BuildOutcome {
    /// A plan was produced and handed to the emission sink.
    Generated(MapperPlan),
    /// The identity was already generated by an earlier request.
    Skipped,
}

/// Errors that fail a whole build.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Validation or planning reported hard diagnostics; nothing was
    /// emitted.
    #[error("{errors} mapping error(s) reported for {class}")]
    Invalid { class: String, errors: usize },

    #[error(transparent)]
    Emission(#[from] crate::traits::EmitError),
}

/// Orchestrates one mapping-class build.
pub struct GenerationSession<'a> {
    types: &'a dyn TypeIntrospection,
    completed: &'a CompletionRegistry,
    registry: MappingRegistry,
}

impl<'a> GenerationSession<'a> {
    pub fn new(
        types: &'a dyn TypeIntrospection,
        completed: &'a CompletionRegistry,
        config: MapperConfig,
    ) -> Self {
        Self {
            types,
            completed,
            registry: MappingRegistry::new(config),
        }
    }

    /// Build one mapper class: gate, validate, plan, emit, audit.
    pub fn build(
        self,
        class: &str,
        methods: &[MappingMethodSpec],
        emitter: &mut dyn EmissionSink,
        diagnostics: &mut dyn DiagnosticSink,
    ) -> Result<BuildOutcome, GenerationError> {
        let Self {
            types,
            completed,
            mut registry,
        } = self;

        if completed.is_done(class) {
            tracing::debug!(class, "mapper already generated, skipping");
            return Ok(BuildOutcome::Skipped);
        }

        let mut resolver = Resolver::new(types);
        for spec in methods {
            resolver.register_method(&spec.input, &spec.output, &spec.name);
        }

        // Validation pass: every method is attempted so a single invocation
        // surfaces the full set of problems.
        let mut errors: Vec<MappingError> = Vec::new();
        let mut top_steps: Vec<Option<MappingStep>> = Vec::with_capacity(methods.len());
        for spec in methods {
            match resolver.resolve(&spec.name, &spec.input, &spec.output, &mut registry) {
                ResolutionOutcome::Resolved(step) => top_steps.push(Some(step)),
                ResolutionOutcome::Failed(failures) => {
                    errors.extend(failures);
                    top_steps.push(None);
                }
            }
        }
        if !errors.is_empty() {
            return fail(class, errors, &registry, diagnostics);
        }

        // Method-body planning, declaration order.
        let mut plans: Vec<MethodPlan> = Vec::new();
        for (spec, step) in methods.iter().zip(top_steps) {
            let Some(step) = step else { continue };
            let body = if let MappingStep::MapWith { method } = &step
                && *method == spec.name
            {
                if spec.input.kind == TypeKind::Declared && spec.output.kind == TypeKind::Declared
                {
                    MethodBody::Fields(plan_fields(
                        &mut resolver,
                        &mut registry,
                        &spec.name,
                        &spec.input,
                        &spec.output,
                        &mut errors,
                    ))
                } else {
                    errors.push(MappingError::UnsupportedConversion {
                        method: spec.name.clone(),
                        input: spec.input.name.clone(),
                        output: spec.output.name.clone(),
                    });
                    MethodBody::Fields(Vec::new())
                }
            } else {
                MethodBody::Value(step)
            };
            plans.push(MethodPlan {
                name: spec.name.clone(),
                input: spec.input.name.clone(),
                output: spec.output.name.clone(),
                synthetic: false,
                body,
            });
        }

        // Drain nested-mapping obligations discovered during planning. The
        // resolver's pair table doubles as the seen set, so cyclic object
        // graphs terminate with deferred calls instead of recursing.
        while let Some((input, output, name)) = resolver.next_obligation() {
            if input.kind == TypeKind::Declared && output.kind == TypeKind::Declared {
                let bindings = plan_fields(
                    &mut resolver,
                    &mut registry,
                    &name,
                    &input,
                    &output,
                    &mut errors,
                );
                plans.push(MethodPlan {
                    name,
                    input: input.name,
                    output: output.name,
                    synthetic: true,
                    body: MethodBody::Fields(bindings),
                });
            } else {
                errors.push(MappingError::UnsupportedConversion {
                    method: name,
                    input: input.name,
                    output: output.name,
                });
            }
        }

        if !errors.is_empty() {
            return fail(class, errors, &registry, diagnostics);
        }

        let sources = registry
            .source_classes()
            .iter()
            .enumerate()
            .map(|(index, class)| SourceClassEntry::new(class.clone(), index))
            .collect();
        let converters = collect_converters(&plans);

        let plan = MapperPlan {
            class: class.to_string(),
            generated: format!("{}{}", ir::simple_name(class), MAPPER_SUFFIX),
            sources,
            converters,
            methods: plans,
        };

        // First request wins; identical re-requests become silent no-ops.
        completed.mark_done(class);
        tracing::debug!(class, methods = plan.methods.len(), "mapper plan complete");

        let emitted = emitter.emit(&plan);
        audit_unused(&registry, class, diagnostics);
        emitted?;
        Ok(BuildOutcome::Generated(plan))
    }
}

fn fail(
    class: &str,
    errors: Vec<MappingError>,
    registry: &MappingRegistry,
    diagnostics: &mut dyn DiagnosticSink,
) -> Result<BuildOutcome, GenerationError> {
    let count = errors.len();
    for error in errors {
        diagnostics.report(error.into_diagnostic(class));
    }
    tracing::warn!(class, errors = count, "mapper generation aborted");
    audit_unused(registry, class, diagnostics);
    Err(GenerationError::Invalid {
        class: class.to_string(),
        errors: count,
    })
}

/// Plan the field bindings for one declared-object pair. Ignored fields are
/// skipped, overrides redirect the source expression, and a destination
/// field with no source and no rule is a hard error.
fn plan_fields(
    resolver: &mut Resolver<'_>,
    registry: &mut MappingRegistry,
    method: &str,
    input: &TypeDescriptor,
    output: &TypeDescriptor,
    errors: &mut Vec<MappingError>,
) -> Vec<FieldBinding> {
    let in_fields = resolver.fields_of(input);
    let mut bindings = Vec::new();
    for field in resolver.fields_of(output) {
        if let Some(id) = registry.ignore_for(&field.name) {
            registry.mark_consulted(id);
            continue;
        }

        let redirect = registry
            .override_for(&field.name)
            .map(|(id, o)| (id, o.source.clone()));
        let (source, source_ty) = if let Some((id, expression)) = redirect {
            registry.mark_consulted(id);
            match resolve_source_path(resolver, input, &expression) {
                Some(ty) => (expression, ty),
                None => {
                    errors.push(MappingError::BadOverride {
                        method: method.to_string(),
                        field: field.name.clone(),
                        expression,
                        input: input.name.clone(),
                    });
                    continue;
                }
            }
        } else if let Some(source_field) = in_fields.iter().find(|f| f.name == field.name) {
            (source_field.name.clone(), source_field.ty.clone())
        } else {
            errors.push(MappingError::MissingSourceField {
                method: method.to_string(),
                field: field.name.clone(),
                input: input.name.clone(),
                output: output.name.clone(),
            });
            continue;
        };

        match resolver.resolve(method, &source_ty, &field.ty, registry) {
            ResolutionOutcome::Resolved(step) => bindings.push(FieldBinding {
                target: field.name,
                source,
                step,
            }),
            ResolutionOutcome::Failed(failures) => errors.extend(failures),
        }
    }
    bindings
}

/// Walk a dotted override path through the input type's fields.
fn resolve_source_path(
    resolver: &Resolver<'_>,
    root: &TypeDescriptor,
    path: &str,
) -> Option<TypeDescriptor> {
    let mut current = root.clone();
    for segment in path.split('.') {
        let field = resolver
            .fields_of(&current)
            .into_iter()
            .find(|f| f.name == segment)?;
        current = field.ty;
    }
    Some(current)
}

/// One holder field per distinct converter type referenced anywhere in the
/// resolved methods, first reference first.
fn collect_converters(methods: &[MethodPlan]) -> Vec<ConverterField> {
    let mut fields: Vec<ConverterField> = Vec::new();
    for method in methods {
        match &method.body {
            MethodBody::Fields(bindings) => {
                for binding in bindings {
                    collect_step(&binding.step, &mut fields);
                }
            }
            MethodBody::Value(step) => collect_step(step, &mut fields),
        }
    }
    fields
}

fn collect_step(step: &MappingStep, fields: &mut Vec<ConverterField>) {
    match step {
        MappingStep::Convert { holder, .. } => {
            if !fields.iter().any(|f| f.holder == *holder) {
                fields.push(ConverterField::for_holder(holder.clone()));
            }
        }
        MappingStep::ForEach { element } => collect_step(element, fields),
        _ => {}
    }
}
