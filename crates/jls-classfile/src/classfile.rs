use crate::constant_pool::{Constant, ConstantPool};
use crate::error::{Error, Result};
use crate::reader::Cursor;

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_PRIVATE: u16 = 0x0002;
pub const ACC_PROTECTED: u16 = 0x0004;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_FINAL: u16 = 0x0010;
pub const ACC_INTERFACE: u16 = 0x0200;
pub const ACC_ABSTRACT: u16 = 0x0400;
pub const ACC_ENUM: u16 = 0x4000;
pub const ACC_ANNOTATION: u16 = 0x2000;

#[derive(Debug, Clone)]
pub struct ClassFile {
    pub minor_version: u16,
    pub major_version: u16,
    pub access_flags: u16,
    pub this_class: String,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub fields: Vec<ClassMember>,
    pub methods: Vec<ClassMember>,
    pub signature: Option<String>,
    pub inner_classes: Vec<InnerClassInfo>,
}

#[derive(Debug, Clone)]
pub struct ClassMember {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
    pub constant_value: Option<ConstantValue>,
}

#[derive(Debug, Clone)]
pub enum ConstantValue {
    Int(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    String(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerClassInfo {
    pub inner_class: String,
    pub outer_class: Option<String>,
    pub inner_name: Option<String>,
    pub access_flags: u16,
}

impl ClassFile {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        let magic = cursor.u4()?;
        if magic != 0xCAFE_BABE {
            return Err(Error::InvalidMagic(magic));
        }

        let minor_version = cursor.u2()?;
        let major_version = cursor.u2()?;
        let cp = ConstantPool::parse(&mut cursor)?;

        let access_flags = cursor.u2()?;
        let this_class = cp.class_name(cursor.u2()?)?;
        let super_index = cursor.u2()?;
        let super_class = if super_index == 0 { None } else { Some(cp.class_name(super_index)?) };

        let interface_count = cursor.u2()? as usize;
        let mut interfaces = Vec::with_capacity(interface_count);
        for _ in 0..interface_count {
            interfaces.push(cp.class_name(cursor.u2()?)?);
        }

        let field_count = cursor.u2()? as usize;
        let mut fields = Vec::with_capacity(field_count);
        for _ in 0..field_count {
            fields.push(parse_member(&mut cursor, &cp)?);
        }

        let method_count = cursor.u2()? as usize;
        let mut methods = Vec::with_capacity(method_count);
        for _ in 0..method_count {
            methods.push(parse_member(&mut cursor, &cp)?);
        }

        let mut signature = None;
        let mut inner_classes = Vec::new();
        let class_attr_count = cursor.u2()? as usize;
        for _ in 0..class_attr_count {
            let name_index = cursor.u2()?;
            let length = cursor.u4()? as usize;
            let info = cursor.bytes(length)?;
            match cp.utf8(name_index)? {
                "Signature" => {
                    let mut sig_cursor = Cursor::new(info);
                    signature = Some(cp.utf8(sig_cursor.u2()?)?.to_string());
                }
                "InnerClasses" => {
                    inner_classes = parse_inner_classes(info, &cp)?;
                }
                _ => {}
            }
        }

        Ok(ClassFile {
            minor_version,
            major_version,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            signature,
            inner_classes,
        })
    }

    pub fn is_public(&self) -> bool {
        self.access_flags & ACC_PUBLIC != 0
    }

    /// A top-level class's simple binary name never contains `$`; a nested
    /// class's does. Classpath/JDK scanning only ever indexes top-level
    /// classes, matching the javac `URLClassLoader`-style universe.
    pub fn is_top_level(&self) -> bool {
        !self.this_class.contains('$')
    }
}

fn parse_member(cursor: &mut Cursor<'_>, cp: &ConstantPool) -> Result<ClassMember> {
    let access_flags = cursor.u2()?;
    let name = cp.utf8(cursor.u2()?)?.to_string();
    let descriptor = cp.utf8(cursor.u2()?)?.to_string();

    let mut signature = None;
    let mut constant_value = None;
    let attr_count = cursor.u2()? as usize;
    for _ in 0..attr_count {
        let name_index = cursor.u2()?;
        let length = cursor.u4()? as usize;
        let info = cursor.bytes(length)?;
        match cp.utf8(name_index)? {
            "Signature" => {
                let mut sig_cursor = Cursor::new(info);
                signature = Some(cp.utf8(sig_cursor.u2()?)?.to_string());
            }
            "ConstantValue" => {
                let mut cv_cursor = Cursor::new(info);
                constant_value = Some(resolve_constant_value(cp.get(cv_cursor.u2()?)?, cp)?);
            }
            _ => {}
        }
    }

    Ok(ClassMember { access_flags, name, descriptor, signature, constant_value })
}

fn resolve_constant_value(constant: &Constant, cp: &ConstantPool) -> Result<ConstantValue> {
    match constant {
        Constant::Integer(v) => Ok(ConstantValue::Int(*v)),
        Constant::Float(v) => Ok(ConstantValue::Float(*v)),
        Constant::Long(v) => Ok(ConstantValue::Long(*v)),
        Constant::Double(v) => Ok(ConstantValue::Double(*v)),
        Constant::StringRef { utf8_index } => Ok(ConstantValue::String(cp.utf8(*utf8_index)?.to_string())),
        _ => Err(Error::MalformedAttribute("ConstantValue")),
    }
}

fn parse_inner_classes(info: &[u8], cp: &ConstantPool) -> Result<Vec<InnerClassInfo>> {
    let mut cursor = Cursor::new(info);
    let count = cursor.u2()? as usize;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let inner_index = cursor.u2()?;
        let outer_index = cursor.u2()?;
        let name_index = cursor.u2()?;
        let access_flags = cursor.u2()?;
        out.push(InnerClassInfo {
            inner_class: cp.class_name(inner_index)?,
            outer_class: if outer_index == 0 { None } else { Some(cp.class_name(outer_index)?) },
            inner_name: if name_index == 0 { None } else { Some(cp.utf8(name_index)?.to_string()) },
            access_flags,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_classfile_magic() {
        let err = ClassFile::parse(&[0, 0, 0, 0]).unwrap_err();
        assert!(matches!(err, Error::InvalidMagic(0)));
    }

    #[test]
    fn top_level_vs_nested_by_dollar_sign() {
        let mut c = minimal_class("com/example/Outer");
        assert!(c.is_top_level());
        c.this_class = "com/example/Outer$Inner".to_string();
        assert!(!c.is_top_level());
    }

    fn minimal_class(name: &str) -> ClassFile {
        ClassFile {
            minor_version: 0,
            major_version: 61,
            access_flags: ACC_PUBLIC,
            this_class: name.to_string(),
            super_class: Some("java/lang/Object".into()),
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            signature: None,
            inner_classes: Vec::new(),
        }
    }
}
