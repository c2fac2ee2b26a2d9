//! Structural fingerprint value objects.
//!
//! A fingerprint is an immutable summary of a type's declared shape: its
//! superclass, interfaces, constructors, methods and fields, reduced to
//! names and type descriptors. Fingerprints are captured once from a known
//! library version, persisted alongside the instrumentation that was written
//! against it, and later compared against whatever version is actually on
//! the classpath.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Access to the name a fingerprint kind is ordered by.
pub trait NamedFingerprint {
    fn name(&self) -> &str;
}

/// Fingerprint of a single field: its name and declared type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FieldFingerprint {
    name: String,
    type_name: String,
}

impl FieldFingerprint {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl NamedFingerprint for FieldFingerprint {
    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for FieldFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {};", self.type_name, self.name)
    }
}

/// Fingerprint of a method: name, ordered parameter types, and return type.
///
/// `return_type` of `None` encodes a method that returns no value.
/// Parameter order is significant, it is what distinguishes overloads.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MethodFingerprint {
    name: String,
    param_types: Vec<String>,
    return_type: Option<String>,
}

impl MethodFingerprint {
    pub fn new(
        name: impl Into<String>,
        param_types: Vec<String>,
        return_type: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_types,
            return_type,
        }
    }

    pub fn param_types(&self) -> &[String] {
        &self.param_types
    }

    pub fn return_type(&self) -> Option<&str> {
        self.return_type.as_deref()
    }
}

impl NamedFingerprint for MethodFingerprint {
    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for MethodFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}({});",
            self.return_type.as_deref().unwrap_or("void"),
            self.name,
            self.param_types.join(", ")
        )
    }
}

/// Fingerprint of a constructor: its ordered parameter types.
///
/// The constructor's name is fixed by convention, so only the parameter list
/// is stored; the diagnostic rendering prints the owning class's name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConstructorFingerprint {
    param_types: Vec<String>,
}

impl ConstructorFingerprint {
    pub fn new(param_types: Vec<String>) -> Self {
        Self { param_types }
    }

    pub fn param_types(&self) -> &[String] {
        &self.param_types
    }
}

impl fmt::Display for ConstructorFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({});", self.param_types.join(", "))
    }
}

/// Fingerprint of a class or interface.
///
/// Member arrays are sorted by natural order at construction time and empty
/// collections are normalized to `None`; the compatibility check relies on
/// both. `super_class` of `None` means the type has no explicit supertype.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassFingerprint {
    name: String,
    super_class: Option<String>,
    interfaces: Option<Vec<String>>,
    constructors: Option<Vec<ConstructorFingerprint>>,
    methods: Option<Vec<MethodFingerprint>>,
    fields: Option<Vec<FieldFingerprint>>,
}

impl ClassFingerprint {
    /// Builds a canonicalized fingerprint from unsorted inputs. Type-name
    /// syntax is not validated; any non-empty string is accepted.
    pub fn new(
        name: impl Into<String>,
        super_class: Option<String>,
        interfaces: Vec<String>,
        constructors: Vec<ConstructorFingerprint>,
        methods: Vec<MethodFingerprint>,
        fields: Vec<FieldFingerprint>,
    ) -> Self {
        Self {
            name: name.into(),
            super_class,
            interfaces: normalize(interfaces),
            constructors: normalize(constructors),
            methods: normalize(methods),
            fields: normalize(fields),
        }
    }

    pub fn super_class(&self) -> Option<&str> {
        self.super_class.as_deref()
    }

    pub fn interfaces(&self) -> Option<&[String]> {
        self.interfaces.as_deref()
    }

    pub fn constructors(&self) -> Option<&[ConstructorFingerprint]> {
        self.constructors.as_deref()
    }

    pub fn methods(&self) -> Option<&[MethodFingerprint]> {
        self.methods.as_deref()
    }

    pub fn fields(&self) -> Option<&[FieldFingerprint]> {
        self.fields.as_deref()
    }
}

impl NamedFingerprint for ClassFingerprint {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Sorts members into their natural order; empty collections become `None`,
/// never an empty non-`None` array.
fn normalize<T: Ord>(mut items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        items.sort();
        Some(items)
    }
}

// Interface lists are consulted only by the compatibility check; they do not
// participate in equality, hashing, or ordering.
impl PartialEq for ClassFingerprint {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.super_class == other.super_class
            && self.constructors == other.constructors
            && self.methods == other.methods
            && self.fields == other.fields
    }
}

impl Eq for ClassFingerprint {}

impl Hash for ClassFingerprint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.super_class.hash(state);
        self.constructors.hash(state);
        self.methods.hash(state);
        self.fields.hash(state);
    }
}

impl Ord for ClassFingerprint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.super_class.cmp(&other.super_class))
            .then_with(|| self.constructors.cmp(&other.constructors))
            .then_with(|| self.methods.cmp(&other.methods))
            .then_with(|| self.fields.cmp(&other.fields))
    }
}

impl PartialOrd for ClassFingerprint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ClassFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {}", self.name)?;
        if let Some(super_class) = &self.super_class {
            write!(f, " extends {super_class}")?;
        }
        if let Some(interfaces) = &self.interfaces {
            write!(f, " implements {}", interfaces.join(", "))?;
        }
        writeln!(f, " {{")?;
        if let Some(constructors) = &self.constructors {
            for constructor in constructors {
                writeln!(f, "  {}{constructor}", self.name)?;
            }
        }
        if let Some(methods) = &self.methods {
            for method in methods {
                writeln!(f, "  {method}")?;
            }
        }
        if let Some(fields) = &self.fields {
            for field in fields {
                writeln!(f, "  {field}")?;
            }
        }
        write!(f, "}}")
    }
}
