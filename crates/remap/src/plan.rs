//! Structural emission plans.
//!
//! A [`MapperPlan`] is everything an emission sink needs to write one mapper
//! class: the generated type name, constructor-injected source entries,
//! converter holder fields, and one [`MethodPlan`] per mapping method with
//! the strategy chosen for each destination field. Plans carry no output
//! syntax.

use serde::{Deserialize, Serialize};

use crate::ir::snake_case;

/// The finished plan for one mapper class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapperPlan {
    /// Requested class identity.
    pub class: String,
    /// Name of the generated implementation type.
    pub generated: String,
    /// Constructor-injected auxiliary source objects.
    pub sources: Vec<SourceClassEntry>,
    /// One holder field per distinct custom converter type.
    pub converters: Vec<ConverterField>,
    /// Declared methods in declaration order, then generated nested methods.
    pub methods: Vec<MethodPlan>,
}

impl MapperPlan {
    /// Holder field name for a converter type, if the plan carries one.
    pub fn converter_field(&self, holder: &str) -> Option<&str> {
        self.converters
            .iter()
            .find(|c| c.holder == holder)
            .map(|c| c.field.as_str())
    }
}

/// An auxiliary object the generated class holds as a constructor parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceClassEntry {
    pub class: String,
    pub field: String,
}

impl SourceClassEntry {
    pub fn new(class: impl Into<String>, index: usize) -> Self {
        Self {
            class: class.into(),
            field: format!("source{index}"),
        }
    }
}

/// A custom converter instance the generated class holds as a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConverterField {
    pub holder: String,
    pub field: String,
}

impl ConverterField {
    pub fn for_holder(holder: impl Into<String>) -> Self {
        let holder = holder.into();
        let field = snake_case(&holder);
        Self { holder, field }
    }
}

/// The plan for one mapping method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodPlan {
    pub name: String,
    /// Qualified input type name.
    pub input: String,
    /// Qualified output type name.
    pub output: String,
    /// Generated for a nested-mapping obligation rather than declared.
    pub synthetic: bool,
    pub body: MethodBody,
}

/// How a method produces its output value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MethodBody {
    /// Field-by-field construction of the output value.
    Fields(Vec<FieldBinding>),
    /// The whole value converts in one step.
    Value(MappingStep),
}

/// One destination field and the strategy that fills it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldBinding {
    /// Destination field name.
    pub target: String,
    /// Dotted read path on the input value.
    pub source: String,
    pub step: MappingStep,
}

/// A resolved conversion strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MappingStep {
    /// Read and assign as-is.
    Direct,
    /// Call the mapping method that handles the nested pair.
    MapWith { method: String },
    /// Convert through a user-supplied converter held by the mapper.
    Convert { holder: String, method: String },
    /// Translate enum constants through a value table.
    EnumTable {
        input: String,
        output: String,
        /// (source constant, destination constant), one entry per mapped
        /// source constant.
        entries: Vec<(String, String)>,
        /// Whether every source constant is covered by an entry.
        exhaustive: bool,
    },
    /// Map every element of a sequence.
    ForEach { element: Box<MappingStep> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converter_fields_derive_from_the_holder_type() {
        let field = ConverterField::for_holder("util::MoneyCodec");
        assert_eq!(field.field, "money_codec");

        let plan = MapperPlan {
            class: "OrderMapper".into(),
            generated: "OrderMapperImpl".into(),
            sources: vec![SourceClassEntry::new("Registry", 0)],
            converters: vec![field],
            methods: Vec::new(),
        };
        assert_eq!(plan.converter_field("util::MoneyCodec"), Some("money_codec"));
        assert_eq!(plan.sources[0].field, "source0");
    }
}
