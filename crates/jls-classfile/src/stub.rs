//! A [`ClassFile`] reduced to what name resolution actually needs: binary
//! names, modifiers and parsed descriptors, with annotation bodies and code
//! attributes dropped. This is what gets held in memory per indexed
//! classpath/JDK type — keeping the full classfile around for every type on
//! the classpath would be wasteful.

use crate::classfile::ClassFile;
use crate::descriptor::{parse_field_descriptor, parse_method_descriptor, FieldType, MethodDescriptor};
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct ClassStub {
    pub internal_name: String,
    pub access_flags: u16,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub signature: Option<String>,
    pub inner_classes: Vec<crate::classfile::InnerClassInfo>,
    pub fields: Vec<FieldStub>,
    pub methods: Vec<MethodStub>,
}

#[derive(Debug, Clone)]
pub struct FieldStub {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: String,
    pub parsed_descriptor: FieldType,
}

#[derive(Debug, Clone)]
pub struct MethodStub {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: String,
    pub parsed_descriptor: MethodDescriptor,
}

impl ClassStub {
    pub fn from_classfile(class: &ClassFile) -> Result<Self> {
        let fields = class
            .fields
            .iter()
            .map(|f| {
                Ok(FieldStub {
                    access_flags: f.access_flags,
                    name: f.name.clone(),
                    descriptor: f.descriptor.clone(),
                    parsed_descriptor: parse_field_descriptor(&f.descriptor)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let methods = class
            .methods
            .iter()
            .map(|m| {
                Ok(MethodStub {
                    access_flags: m.access_flags,
                    name: m.name.clone(),
                    descriptor: m.descriptor.clone(),
                    parsed_descriptor: parse_method_descriptor(&m.descriptor)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ClassStub {
            internal_name: class.this_class.clone(),
            access_flags: class.access_flags,
            super_class: class.super_class.clone(),
            interfaces: class.interfaces.clone(),
            signature: class.signature.clone(),
            inner_classes: class.inner_classes.clone(),
            fields,
            methods,
        })
    }

    pub fn binary_name(&self) -> String {
        self.internal_name.replace('/', ".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classfile::{ACC_PUBLIC, ClassMember};

    #[test]
    fn converts_descriptors_eagerly() {
        let class = ClassFile {
            minor_version: 0,
            major_version: 61,
            access_flags: ACC_PUBLIC,
            this_class: "com/example/Widget".into(),
            super_class: Some("java/lang/Object".into()),
            interfaces: Vec::new(),
            fields: vec![ClassMember {
                access_flags: ACC_PUBLIC,
                name: "count".into(),
                descriptor: "I".into(),
                signature: None,
                constant_value: None,
            }],
            methods: vec![ClassMember {
                access_flags: ACC_PUBLIC,
                name: "get".into(),
                descriptor: "()Ljava/lang/String;".into(),
                signature: None,
                constant_value: None,
            }],
            signature: None,
            inner_classes: Vec::new(),
        };

        let stub = ClassStub::from_classfile(&class).unwrap();
        assert_eq!(stub.binary_name(), "com.example.Widget");
        assert_eq!(stub.fields[0].parsed_descriptor, FieldType::Base(crate::descriptor::BaseType::Int));
        assert!(matches!(stub.methods[0].parsed_descriptor.return_type, crate::descriptor::ReturnType::Type(_)));
    }
}
