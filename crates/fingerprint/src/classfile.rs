//! Classfile-backed implementation of the describer contract.
//!
//! Parses compiled `.class` byte streams and renders their constant-pool
//! descriptors back into source notation, the form fingerprints are stored
//! in: dotted package paths, `ComponentType[]` arrays, `None` for a `void`
//! return.

use crate::describe::{TypeDescriber, TypeDescription};
use crate::error::{FingerprintError, Result};
use crate::model::{ConstructorFingerprint, FieldFingerprint, MethodFingerprint};
use ristretto_classfile::{BaseType, ClassFile, FieldType};
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

const ROOT_TYPE: &str = "java.lang.Object";

/// Describes types by locating their classfiles inside one jar archive.
pub struct ClassfileDescriber {
    archive: PathBuf,
}

impl ClassfileDescriber {
    pub fn new(archive: impl Into<PathBuf>) -> Self {
        Self {
            archive: archive.into(),
        }
    }

    pub fn archive(&self) -> &Path {
        &self.archive
    }
}

impl TypeDescriber for ClassfileDescriber {
    fn describe(&self, type_name: &str) -> Result<TypeDescription> {
        let file = File::open(&self.archive)?;
        let mut archive = ZipArchive::new(file)?;
        let entry_name = format!("{}.class", type_name.replace('.', "/"));
        let mut entry = match archive.by_name(&entry_name) {
            Ok(entry) => entry,
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(FingerprintError::ClassNotFound {
                    name: type_name.to_string(),
                    archive: self.archive.clone(),
                });
            }
            Err(err) => return Err(err.into()),
        };
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;
        describe_bytes(bytes)
    }
}

/// Describes a single compiled classfile.
///
/// `<clinit>` is not a member and is skipped; `<init>` entries become
/// constructor fingerprints. A direct superclass of `java.lang.Object` is
/// normalized to `None`.
pub fn describe_bytes(bytes: Vec<u8>) -> Result<TypeDescription> {
    let class = ClassFile::from_bytes(&mut Cursor::new(bytes)).map_err(classfile_err)?;

    let name = source_name(
        class
            .constant_pool
            .try_get_class(class.this_class)
            .map_err(classfile_err)?,
    );

    let super_class = match class.super_class {
        0 => None,
        index => {
            let super_name = source_name(
                class
                    .constant_pool
                    .try_get_class(index)
                    .map_err(classfile_err)?,
            );
            (super_name != ROOT_TYPE).then_some(super_name)
        }
    };

    let mut interfaces = Vec::with_capacity(class.interfaces.len());
    for index in &class.interfaces {
        interfaces.push(source_name(
            class
                .constant_pool
                .try_get_class(*index)
                .map_err(classfile_err)?,
        ));
    }

    let mut fields = Vec::with_capacity(class.fields.len());
    for field in &class.fields {
        let field_name = class
            .constant_pool
            .try_get_utf8(field.name_index)
            .map_err(classfile_err)?;
        fields.push(FieldFingerprint::new(
            field_name,
            type_name(&field.field_type),
        ));
    }

    let mut constructors = Vec::new();
    let mut methods = Vec::new();
    for method in &class.methods {
        let method_name = class
            .constant_pool
            .try_get_utf8(method.name_index)
            .map_err(classfile_err)?;
        if method_name == "<clinit>" {
            continue;
        }

        let descriptor = class
            .constant_pool
            .try_get_utf8(method.descriptor_index)
            .map_err(classfile_err)?;
        let (params, ret) = FieldType::parse_method_descriptor(descriptor).map_err(classfile_err)?;
        let param_types: Vec<String> = params.iter().map(type_name).collect();

        if method_name == "<init>" {
            constructors.push(ConstructorFingerprint::new(param_types));
        } else {
            methods.push(MethodFingerprint::new(
                method_name,
                param_types,
                ret.as_ref().map(type_name),
            ));
        }
    }

    Ok(TypeDescription {
        name,
        super_class,
        interfaces,
        constructors,
        methods,
        fields,
    })
}

/// Binary class name (`java/lang/String`) to source notation.
fn source_name(binary_name: &str) -> String {
    binary_name.replace('/', ".")
}

/// Renders a parsed descriptor type in source notation.
pub(crate) fn type_name(ty: &FieldType) -> String {
    match ty {
        FieldType::Base(BaseType::Byte) => "byte".to_string(),
        FieldType::Base(BaseType::Char) => "char".to_string(),
        FieldType::Base(BaseType::Double) => "double".to_string(),
        FieldType::Base(BaseType::Float) => "float".to_string(),
        FieldType::Base(BaseType::Int) => "int".to_string(),
        FieldType::Base(BaseType::Long) => "long".to_string(),
        FieldType::Base(BaseType::Short) => "short".to_string(),
        FieldType::Base(BaseType::Boolean) => "boolean".to_string(),
        FieldType::Object(name) => source_name(name),
        FieldType::Array(component) => format!("{}[]", type_name(component)),
    }
}

fn classfile_err(err: ristretto_classfile::Error) -> FingerprintError {
    FingerprintError::Classfile(format!("{err:?}"))
}
