//! Structural type descriptors for mapping resolution.
//!
//! Descriptors are the engine's view of the host type system: a kind, a
//! qualified name, and the member data resolution needs (fields for declared
//! objects, constants for enums, an element for sequences). They are
//! immutable once constructed.
//!
//! Field positions may hold *shallow* descriptors (name and kind only); the
//! resolver re-fetches member data through
//! [`TypeIntrospection`](crate::traits::TypeIntrospection), so cyclic object
//! graphs stay representable.

use serde::{Deserialize, Serialize};

/// The structural category of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    /// Built-in scalar (numbers, booleans, text).
    Primitive,
    /// Object with named fields.
    Declared,
    /// Closed set of named constants.
    Enum,
    /// Growable sequence of one element type.
    Collection,
    /// Fixed sequence of one element type.
    Array,
}

/// An immutable structural summary of a type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Qualified name, `::`-separated; primitives use their keyword.
    pub name: String,
    pub kind: TypeKind,
    /// Named fields (declared-object kinds only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDescriptor>,
    /// Constant names (enum kinds only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constants: Vec<String>,
    /// Element type (collection/array kinds only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<Box<TypeDescriptor>>,
}

/// A named field of a declared-object type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: TypeDescriptor,
}

/// One requested conversion: a method name plus resolved input and output
/// descriptors, never raw names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingMethodSpec {
    pub name: String,
    pub input: TypeDescriptor,
    pub output: TypeDescriptor,
}

impl TypeDescriptor {
    pub fn primitive(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Primitive,
            fields: Vec::new(),
            constants: Vec::new(),
            element: None,
        }
    }

    pub fn declared(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Declared,
            fields,
            constants: Vec::new(),
            element: None,
        }
    }

    /// Shallow reference to a declared type; members come from introspection.
    pub fn declared_ref(name: impl Into<String>) -> Self {
        Self::declared(name, Vec::new())
    }

    pub fn enumeration(name: impl Into<String>, constants: Vec<&str>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Enum,
            fields: Vec::new(),
            constants: constants.into_iter().map(String::from).collect(),
            element: None,
        }
    }

    /// Shallow reference to an enum type; constants come from introspection.
    pub fn enum_ref(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Enum,
            fields: Vec::new(),
            constants: Vec::new(),
            element: None,
        }
    }

    pub fn collection(element: TypeDescriptor) -> Self {
        Self {
            name: format!("Vec<{}>", element.name),
            kind: TypeKind::Collection,
            fields: Vec::new(),
            constants: Vec::new(),
            element: Some(Box::new(element)),
        }
    }

    pub fn array(element: TypeDescriptor) -> Self {
        Self {
            name: format!("[{}]", element.name),
            kind: TypeKind::Array,
            fields: Vec::new(),
            constants: Vec::new(),
            element: Some(Box::new(element)),
        }
    }

    /// Last segment of the qualified name.
    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

impl MappingMethodSpec {
    pub fn new(name: impl Into<String>, input: TypeDescriptor, output: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            input,
            output,
        }
    }
}

/// Last `::` segment of a qualified path.
pub(crate) fn simple_name(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

/// Lower-snake rendering of a type name's simple segment, acronym runs kept
/// together ("AddressDTO" -> "address_dto").
pub(crate) fn snake_case(name: &str) -> String {
    let name = simple_name(name);
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev_lower = i > 0 && chars[i - 1].is_lowercase();
            let next_lower = i + 1 < chars.len() && chars[i + 1].is_lowercase();
            if i > 0 && (prev_lower || next_lower) {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(*c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_descriptors_programmatically() {
        let person = TypeDescriptor::declared(
            "model::Person",
            vec![
                FieldDescriptor::new("name", TypeDescriptor::primitive("String")),
                FieldDescriptor::new("age", TypeDescriptor::primitive("u32")),
            ],
        );

        assert_eq!(person.kind, TypeKind::Declared);
        assert_eq!(person.simple_name(), "Person");
        assert_eq!(person.fields.len(), 2);

        let items = TypeDescriptor::collection(person);
        assert_eq!(items.name, "Vec<model::Person>");
        assert!(items.element.is_some());
    }

    #[test]
    fn snake_case_handles_acronym_runs() {
        assert_eq!(snake_case("AddressDto"), "address_dto");
        assert_eq!(snake_case("AddressDTO"), "address_dto");
        assert_eq!(snake_case("util::TextCodec"), "text_codec");
    }
}
