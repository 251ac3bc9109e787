//! Declared mapper configuration.
//!
//! `MapperConfig` is everything the user declared on a mapper: auxiliary
//! source classes, ignore rules, field overrides, custom converters and enum
//! value tables. The configuration is immutable once a session starts;
//! consulted tracking lives in the
//! [`MappingRegistry`](crate::registry::MappingRegistry).

use serde::{Deserialize, Serialize};

/// Declared customizations for one mapper class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapperConfig {
    /// Auxiliary classes injected through the generated constructor.
    #[serde(default)]
    pub source_classes: Vec<String>,
    /// Destination fields to skip entirely.
    #[serde(default)]
    pub ignored_fields: Vec<String>,
    #[serde(default)]
    pub field_overrides: Vec<FieldOverride>,
    #[serde(default)]
    pub converters: Vec<CustomConverter>,
    #[serde(default)]
    pub enum_mappings: Vec<EnumMapping>,
}

/// Redirects a destination field to a source expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOverride {
    /// Destination field the override applies to.
    pub target: String,
    /// Dotted read path on the input value.
    pub source: String,
}

/// A user-supplied conversion method for an exact (input, output) pair.
///
/// The holder type is instantiated once per generated mapper and shared by
/// every method that uses it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomConverter {
    pub input: String,
    pub output: String,
    /// Type that holds the converter method.
    pub holder: String,
    pub method: String,
}

/// Constant translation table for an enum pair.
///
/// Explicit entries win over name equality between constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumMapping {
    pub input: String,
    pub output: String,
    /// (source constant, destination constant) pairs.
    #[serde(default)]
    pub table: Vec<(String, String)>,
}

impl MapperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an auxiliary class injected through the generated constructor.
    pub fn with_source(mut self, class: impl Into<String>) -> Self {
        self.source_classes.push(class.into());
        self
    }

    /// Skip a destination field entirely.
    pub fn ignore_field(mut self, field: impl Into<String>) -> Self {
        self.ignored_fields.push(field.into());
        self
    }

    /// Redirect a destination field to a dotted source expression.
    pub fn map_field(mut self, target: impl Into<String>, source: impl Into<String>) -> Self {
        self.field_overrides.push(FieldOverride {
            target: target.into(),
            source: source.into(),
        });
        self
    }

    pub fn with_converter(mut self, converter: CustomConverter) -> Self {
        self.converters.push(converter);
        self
    }

    pub fn with_enum_mapping(mut self, mapping: EnumMapping) -> Self {
        self.enum_mappings.push(mapping);
        self
    }
}

impl CustomConverter {
    pub fn new(
        input: impl Into<String>,
        output: impl Into<String>,
        holder: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            holder: holder.into(),
            method: method.into(),
        }
    }
}

impl EnumMapping {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            table: Vec::new(),
        }
    }

    /// Map a source constant to a destination constant.
    pub fn map(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.table.push((from.into(), to.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_from_json() {
        let config: MapperConfig = serde_json::from_value(serde_json::json!({
            "ignored_fields": ["internal_id"],
            "converters": [{
                "input": "Money",
                "output": "String",
                "holder": "MoneyCodec",
                "method": "format"
            }]
        }))
        .unwrap();

        assert_eq!(config.ignored_fields, ["internal_id"]);
        assert_eq!(config.converters[0].holder, "MoneyCodec");
        assert!(config.enum_mappings.is_empty());
    }

    #[test]
    fn builder_accumulates_customizations() {
        let config = MapperConfig::new()
            .with_source("Registry")
            .ignore_field("checksum")
            .map_field("city", "address.city")
            .with_enum_mapping(EnumMapping::new("Status", "StatusDto").map("INACTIVE", "DISABLED"));

        assert_eq!(config.source_classes, ["Registry"]);
        assert_eq!(config.field_overrides[0].source, "address.city");
        assert_eq!(
            config.enum_mappings[0].table,
            [("INACTIVE".to_string(), "DISABLED".to_string())]
        );
    }
}
