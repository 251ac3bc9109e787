//! Emission sinks shipped with the engine.
//!
//! The session hands a [`MapperPlan`](crate::plan::MapperPlan) to whatever
//! [`EmissionSink`](crate::traits::EmissionSink) it was given; this module
//! holds the reference implementation, which renders plans as Rust source.

pub mod rust;

pub use rust::{RustMapperWriter, RustOptions, GENERATED_HEADER};
