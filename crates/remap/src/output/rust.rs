//! Rust writer for mapper plans.
//!
//! Renders a [`MapperPlan`] as a Rust struct with one inherent method per
//! planned mapping method. The writer maps structure, not semantics:
//! qualified type names are emitted as written in the descriptors.

use std::fmt::Write;

use crate::plan::{MapperPlan, MappingStep, MethodBody, MethodPlan};
use crate::traits::{EmissionSink, EmitError};

/// Comment prepended to every generated artifact.
pub const GENERATED_HEADER: &str = "// Generated by remap. Do not edit.";

/// Options for the Rust writer.
#[derive(Debug, Clone)]
pub struct RustOptions {
    /// Emit `pub` on the generated type and its declared methods.
    pub public: bool,
    /// Derives attached to the generated struct.
    pub derives: Vec<String>,
    /// Prepend [`GENERATED_HEADER`].
    pub header: bool,
}

impl Default for RustOptions {
    fn default() -> Self {
        Self {
            public: true,
            derives: vec!["Debug".to_string()],
            header: true,
        }
    }
}

/// Emission sink that renders plans to Rust source.
#[derive(Debug, Default)]
pub struct RustMapperWriter {
    options: RustOptions,
    artifacts: Vec<(String, String)>,
}

impl RustMapperWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: RustOptions) -> Self {
        Self {
            options,
            artifacts: Vec::new(),
        }
    }

    /// Generated (type name, source) pairs, oldest first.
    pub fn artifacts(&self) -> &[(String, String)] {
        &self.artifacts
    }

    /// Render one plan to Rust source.
    pub fn render(plan: &MapperPlan, options: &RustOptions) -> String {
        Renderer {
            plan,
            options,
            out: String::new(),
        }
        .render()
    }
}

impl EmissionSink for RustMapperWriter {
    fn emit(&mut self, plan: &MapperPlan) -> Result<(), EmitError> {
        let source = Self::render(plan, &self.options);
        self.artifacts.push((plan.generated.clone(), source));
        Ok(())
    }
}

struct Renderer<'a> {
    plan: &'a MapperPlan,
    options: &'a RustOptions,
    out: String,
}

impl Renderer<'_> {
    fn render(mut self) -> String {
        if self.options.header {
            self.out.push_str(GENERATED_HEADER);
            self.out.push_str("\n\n");
        }
        self.write_struct();
        self.out.push('\n');
        self.write_impl();
        self.out
    }

    fn vis(&self) -> &'static str {
        if self.options.public { "pub " } else { "" }
    }

    fn write_struct(&mut self) {
        if !self.options.derives.is_empty() {
            writeln!(self.out, "#[derive({})]", self.options.derives.join(", ")).unwrap();
        }
        if self.plan.sources.is_empty() && self.plan.converters.is_empty() {
            writeln!(self.out, "{}struct {};", self.vis(), self.plan.generated).unwrap();
            return;
        }
        writeln!(self.out, "{}struct {} {{", self.vis(), self.plan.generated).unwrap();
        for source in &self.plan.sources {
            writeln!(self.out, "    {}: {},", source.field, source.class).unwrap();
        }
        for converter in &self.plan.converters {
            writeln!(self.out, "    {}: {},", converter.field, converter.holder).unwrap();
        }
        self.out.push_str("}\n");
    }

    fn write_impl(&mut self) {
        writeln!(self.out, "impl {} {{", self.plan.generated).unwrap();
        self.write_constructor();
        for method in &self.plan.methods {
            self.out.push('\n');
            self.write_method(method);
        }
        self.out.push_str("}\n");
    }

    fn write_constructor(&mut self) {
        let params = self
            .plan
            .sources
            .iter()
            .map(|s| format!("{}: {}", s.field, s.class))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(self.out, "    {}fn new({params}) -> Self {{", self.vis()).unwrap();
        if self.plan.sources.is_empty() && self.plan.converters.is_empty() {
            self.out.push_str("        Self\n");
        } else {
            self.out.push_str("        Self {\n");
            for source in &self.plan.sources {
                writeln!(self.out, "            {},", source.field).unwrap();
            }
            for converter in &self.plan.converters {
                writeln!(
                    self.out,
                    "            {}: {}::default(),",
                    converter.field, converter.holder
                )
                .unwrap();
            }
            self.out.push_str("        }\n");
        }
        self.out.push_str("    }\n");
    }

    fn write_method(&mut self, method: &MethodPlan) {
        let vis = if method.synthetic { "" } else { self.vis() };
        writeln!(
            self.out,
            "    {vis}fn {}(&self, input: &{}) -> {} {{",
            method.name, method.input, method.output
        )
        .unwrap();
        match &method.body {
            MethodBody::Value(step) => {
                let expr = self.step_expr(step, "input", 2);
                writeln!(self.out, "        {expr}").unwrap();
            }
            MethodBody::Fields(bindings) => {
                writeln!(self.out, "        {} {{", method.output).unwrap();
                for binding in bindings {
                    let source = format!("input.{}", binding.source);
                    let expr = self.step_expr(&binding.step, &source, 3);
                    writeln!(self.out, "            {}: {expr},", binding.target).unwrap();
                }
                self.out.push_str("        }\n");
            }
        }
        self.out.push_str("    }\n");
    }

    /// Expression that applies `step` to the value read from `src`.
    /// `depth` is the indentation level of the line the expression starts
    /// on, for multi-line match arms.
    fn step_expr(&self, step: &MappingStep, src: &str, depth: usize) -> String {
        match step {
            MappingStep::Direct => format!("{src}.clone()"),

            MappingStep::MapWith { method } => format!("self.{method}(&{src})"),

            MappingStep::Convert { holder, method } => {
                let field = self.plan.converter_field(holder).unwrap_or("converter");
                format!("self.{field}.{method}(&{src})")
            }

            MappingStep::EnumTable {
                input,
                output,
                entries,
                exhaustive,
            } => {
                let pad = "    ".repeat(depth);
                let mut arms = String::new();
                for (from, to) in entries {
                    writeln!(arms, "{pad}    {input}::{from} => {output}::{to},").unwrap();
                }
                if !exhaustive {
                    writeln!(arms, "{pad}    _ => panic!(\"unmapped {input} value\"),").unwrap();
                }
                format!("match {src} {{\n{arms}{pad}}}")
            }

            MappingStep::ForEach { element } => {
                let inner = self.step_expr(element, "value", depth);
                format!("{src}.iter().map(|value| {inner}).collect()")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{ConverterField, FieldBinding, SourceClassEntry};

    fn person_plan() -> MapperPlan {
        MapperPlan {
            class: "PersonMapper".into(),
            generated: "PersonMapperImpl".into(),
            sources: vec![SourceClassEntry::new("Registry", 0)],
            converters: vec![ConverterField::for_holder("MoneyCodec")],
            methods: vec![MethodPlan {
                name: "as_person_dto".into(),
                input: "Person".into(),
                output: "PersonDto".into(),
                synthetic: false,
                body: MethodBody::Fields(vec![
                    FieldBinding {
                        target: "name".into(),
                        source: "name".into(),
                        step: MappingStep::Direct,
                    },
                    FieldBinding {
                        target: "salary".into(),
                        source: "salary".into(),
                        step: MappingStep::Convert {
                            holder: "MoneyCodec".into(),
                            method: "format".into(),
                        },
                    },
                ]),
            }],
        }
    }

    #[test]
    fn renders_struct_constructor_and_methods() {
        let source = RustMapperWriter::render(&person_plan(), &RustOptions::default());

        assert!(source.starts_with(GENERATED_HEADER));
        assert!(source.contains("pub struct PersonMapperImpl {"));
        assert!(source.contains("    source0: Registry,"));
        assert!(source.contains("    money_codec: MoneyCodec,"));
        assert!(source.contains("    pub fn new(source0: Registry) -> Self {"));
        assert!(source.contains("            money_codec: MoneyCodec::default(),"));
        assert!(source.contains("    pub fn as_person_dto(&self, input: &Person) -> PersonDto {"));
        assert!(source.contains("            name: input.name.clone(),"));
        assert!(source.contains("            salary: self.money_codec.format(&input.salary),"));
    }

    #[test]
    fn enum_tables_render_as_match_expressions() {
        let plan = MapperPlan {
            class: "StatusMapper".into(),
            generated: "StatusMapperImpl".into(),
            sources: Vec::new(),
            converters: Vec::new(),
            methods: vec![MethodPlan {
                name: "as_status_dto".into(),
                input: "Status".into(),
                output: "StatusDto".into(),
                synthetic: false,
                body: MethodBody::Value(MappingStep::EnumTable {
                    input: "Status".into(),
                    output: "StatusDto".into(),
                    entries: vec![("ACTIVE".into(), "ACTIVE".into())],
                    exhaustive: false,
                }),
            }],
        };

        let source = RustMapperWriter::render(&plan, &RustOptions::default());
        assert!(source.contains("pub struct StatusMapperImpl;"));
        assert!(source.contains("        match input {"));
        assert!(source.contains("            Status::ACTIVE => StatusDto::ACTIVE,"));
        assert!(source.contains("            _ => panic!(\"unmapped Status value\"),"));
    }
}
