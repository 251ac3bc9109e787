//! Object-to-object mapping code generation from structural type
//! descriptors.
//!
//! `remap` is the resolution and orchestration engine of an ahead-of-time
//! mapper generator: given type descriptors, declared mapping-method
//! signatures and a mapper configuration, it decides per field how to
//! convert between the two shapes and produces the structural plan of a
//! fully-written conversion class. It owns no parsing, no output syntax and
//! no I/O; those arrive through injected collaborator traits.
//!
//! # Architecture
//!
//! ```text
//! Declared input              Resolution                   Emission
//! ───────────────────    ──────────────────────────    ───────────────────
//! MappingMethodSpec ─┐                             ┌─> MapperPlan ─> EmissionSink
//! MapperConfig      ─┼─> GenerationSession ────────┤       (RustMapperWriter)
//! TypeCatalog       ─┘    (strategy chain +        └─> Diagnostics
//!                          obligation queue)           (DiagnosticSink)
//! ```
//!
//! Strategies are tried in fixed priority order: identical pair → custom
//! converter → enum table → element-wise sequence mapping → nested mapping
//! call. Nested declared-object pairs become deferred obligations drained
//! from a work queue, so mutually recursive object graphs terminate. A
//! completion registry deduplicates repeated requests for the same class,
//! and a usage audit warns about configuration nothing consulted.
//!
//! # Example
//!
//! ```
//! use remap::{
//!     CollectingSink, CompletionRegistry, FieldDescriptor, GenerationSession, MapperConfig,
//!     MappingMethodSpec, RustMapperWriter, TypeCatalog, TypeDescriptor,
//! };
//!
//! let person = TypeDescriptor::declared(
//!     "Person",
//!     vec![
//!         FieldDescriptor::new("name", TypeDescriptor::primitive("String")),
//!         FieldDescriptor::new("age", TypeDescriptor::primitive("u32")),
//!     ],
//! );
//! let person_dto = TypeDescriptor::declared(
//!     "PersonDto",
//!     vec![
//!         FieldDescriptor::new("name", TypeDescriptor::primitive("String")),
//!         FieldDescriptor::new("age", TypeDescriptor::primitive("u32")),
//!     ],
//! );
//!
//! let catalog = TypeCatalog::new().with(person.clone()).with(person_dto.clone());
//! let completed = CompletionRegistry::new();
//! let mut writer = RustMapperWriter::new();
//! let mut diagnostics = CollectingSink::new();
//!
//! let session = GenerationSession::new(&catalog, &completed, MapperConfig::new());
//! session
//!     .build(
//!         "PersonMapper",
//!         &[MappingMethodSpec::new("as_person_dto", person, person_dto)],
//!         &mut writer,
//!         &mut diagnostics,
//!     )
//!     .unwrap();
//!
//! let (_, source) = &writer.artifacts()[0];
//! assert!(source.contains("pub struct PersonMapperImpl"));
//! assert!(source.contains("name: input.name.clone(),"));
//! ```

pub mod audit;
pub mod catalog;
pub mod config;
pub mod diagnostics;
pub mod ir;
pub mod output;
pub mod plan;
pub mod registry;
pub mod resolve;
pub mod session;
pub mod traits;

// Re-exports: descriptors and configuration
pub use config::{CustomConverter, EnumMapping, FieldOverride, MapperConfig};
pub use ir::{FieldDescriptor, MappingMethodSpec, TypeDescriptor, TypeKind};

// Re-exports: engine
pub use catalog::TypeCatalog;
pub use registry::{CompletionRegistry, CustomizationId, MappingRegistry};
pub use resolve::{MappingError, ResolutionOutcome, Resolver};
pub use session::{BuildOutcome, GenerationError, GenerationSession, MAPPER_SUFFIX};

// Re-exports: plans and collaborators
pub use audit::audit_unused;
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticLevel, Location};
pub use plan::{
    ConverterField, FieldBinding, MapperPlan, MappingStep, MethodBody, MethodPlan,
    SourceClassEntry,
};
pub use traits::{DiagnosticSink, EmissionSink, EmitError, TypeIntrospection};

// Re-exports: built-in emission sink
pub use output::rust::{RustMapperWriter, RustOptions};
