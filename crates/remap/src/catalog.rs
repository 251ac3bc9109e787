//! In-memory type catalog.

use std::collections::HashMap;

use crate::ir::TypeDescriptor;
use crate::traits::TypeIntrospection;

/// Qualified name → descriptor table; the provided
/// [`TypeIntrospection`] implementation.
///
/// Field positions can hold shallow descriptors
/// ([`TypeDescriptor::declared_ref`]) as long as the full type is registered
/// here, which is how cyclic object graphs are described.
#[derive(Debug, Default)]
pub struct TypeCatalog {
    types: HashMap<String, TypeDescriptor>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under its qualified name. Last registration
    /// wins.
    pub fn register(&mut self, ty: TypeDescriptor) {
        self.types.insert(ty.name.clone(), ty);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, ty: TypeDescriptor) -> Self {
        self.register(ty);
        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeIntrospection for TypeCatalog {
    fn describe(&self, qualified_name: &str) -> Option<&TypeDescriptor> {
        self.types.get(qualified_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::FieldDescriptor;

    #[test]
    fn shallow_refs_resolve_through_the_catalog() {
        let address = TypeDescriptor::declared(
            "Address",
            vec![FieldDescriptor::new(
                "city",
                TypeDescriptor::primitive("String"),
            )],
        );
        let catalog = TypeCatalog::new().with(address);

        let full = catalog.describe("Address").unwrap();
        assert_eq!(full.fields[0].name, "city");
        assert!(catalog.describe("Missing").is_none());
    }
}
