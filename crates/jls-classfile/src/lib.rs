//! Hand-rolled JVM `.class` reader (JVMS §4). No real `javac`/reflection
//! exists in this process, so every piece of type information that comes
//! from the JDK or a classpath jar is recovered by parsing the bytecode
//! directly.

mod classfile;
mod constant_pool;
mod descriptor;
mod error;
mod module_info;
mod reader;
mod stub;

pub use crate::classfile::{
    ClassFile, ClassMember, ConstantValue, InnerClassInfo, ACC_ABSTRACT, ACC_ANNOTATION, ACC_ENUM, ACC_FINAL,
    ACC_INTERFACE, ACC_PRIVATE, ACC_PROTECTED, ACC_PUBLIC, ACC_STATIC,
};
pub use crate::descriptor::{parse_field_descriptor, parse_method_descriptor, BaseType, FieldType, MethodDescriptor, ReturnType};
pub use crate::error::{Error, Result};
pub use crate::module_info::parse_module_info_class;
pub use crate::stub::{ClassStub, FieldStub, MethodStub};
