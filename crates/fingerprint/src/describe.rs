//! The "describe this type" contract.
//!
//! The fingerprint core never introspects a runtime itself; it consumes
//! plain-data descriptions produced by whatever facility can see the live
//! type (a classfile parser here, reflection elsewhere).

use crate::error::Result;
use crate::model::{
    ClassFingerprint, ConstructorFingerprint, FieldFingerprint, MethodFingerprint,
};

/// Plain-data description of one type, as reported by an introspector.
///
/// Type names are expected in source notation: dotted package paths, arrays
/// as `ComponentType[]`, and a `None` return for methods that return no
/// value. Member lists may arrive in any order.
#[derive(Debug, Clone, Default)]
pub struct TypeDescription {
    pub name: String,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub constructors: Vec<ConstructorFingerprint>,
    pub methods: Vec<MethodFingerprint>,
    pub fields: Vec<FieldFingerprint>,
}

/// An introspection facility that can describe named types.
pub trait TypeDescriber {
    fn describe(&self, type_name: &str) -> Result<TypeDescription>;
}

impl From<TypeDescription> for ClassFingerprint {
    fn from(description: TypeDescription) -> Self {
        ClassFingerprint::new(
            description.name,
            description.super_class,
            description.interfaces,
            description.constructors,
            description.methods,
            description.fields,
        )
    }
}
