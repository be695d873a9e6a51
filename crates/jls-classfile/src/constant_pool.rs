use crate::error::{Error, Result};
use crate::reader::Cursor;

/// One slot of a classfile's constant pool. Only the tags a type-stub reader
/// or module-info parser ever dereferences are decoded; the rest are skipped
/// structurally (their byte width is still accounted for).
#[derive(Debug, Clone)]
pub enum Constant {
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class { name_index: u16 },
    StringRef { utf8_index: u16 },
    FieldRef { class_index: u16, name_and_type_index: u16 },
    MethodRef { class_index: u16, name_and_type_index: u16 },
    InterfaceMethodRef { class_index: u16, name_and_type_index: u16 },
    NameAndType { name_index: u16, descriptor_index: u16 },
    MethodHandle { reference_kind: u8, reference_index: u16 },
    MethodType { descriptor_index: u16 },
    Dynamic { bootstrap_method_attr_index: u16, name_and_type_index: u16 },
    InvokeDynamic { bootstrap_method_attr_index: u16, name_and_type_index: u16 },
    Module { name_index: u16 },
    Package { name_index: u16 },
}

impl Constant {
    fn kind(&self) -> &'static str {
        match self {
            Constant::Utf8(_) => "Utf8",
            Constant::Integer(_) => "Integer",
            Constant::Float(_) => "Float",
            Constant::Long(_) => "Long",
            Constant::Double(_) => "Double",
            Constant::Class { .. } => "Class",
            Constant::StringRef { .. } => "String",
            Constant::FieldRef { .. } => "Fieldref",
            Constant::MethodRef { .. } => "Methodref",
            Constant::InterfaceMethodRef { .. } => "InterfaceMethodref",
            Constant::NameAndType { .. } => "NameAndType",
            Constant::MethodHandle { .. } => "MethodHandle",
            Constant::MethodType { .. } => "MethodType",
            Constant::Dynamic { .. } => "Dynamic",
            Constant::InvokeDynamic { .. } => "InvokeDynamic",
            Constant::Module { .. } => "Module",
            Constant::Package { .. } => "Package",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConstantPool {
    entries: Vec<Option<Constant>>,
}

impl ConstantPool {
    pub fn parse(cursor: &mut Cursor<'_>) -> Result<Self> {
        let count = cursor.u2()? as usize;
        if count == 0 {
            return Err(Error::Other("constant_pool_count must be at least 1"));
        }

        let mut entries = vec![None; count];
        let mut i = 1usize;
        while i < count {
            let tag = cursor.u1()?;
            let entry = match tag {
                1 => {
                    let len = cursor.u2()? as usize;
                    Constant::Utf8(decode_modified_utf8(cursor.bytes(len)?)?)
                }
                3 => Constant::Integer(cursor.i4()?),
                4 => Constant::Float(f32::from_bits(cursor.u4()?)),
                5 => Constant::Long(cursor.i8()?),
                6 => Constant::Double(f64::from_bits(cursor.i8()? as u64)),
                7 => Constant::Class { name_index: cursor.u2()? },
                8 => Constant::StringRef { utf8_index: cursor.u2()? },
                9 => Constant::FieldRef { class_index: cursor.u2()?, name_and_type_index: cursor.u2()? },
                10 => Constant::MethodRef { class_index: cursor.u2()?, name_and_type_index: cursor.u2()? },
                11 => Constant::InterfaceMethodRef { class_index: cursor.u2()?, name_and_type_index: cursor.u2()? },
                12 => Constant::NameAndType { name_index: cursor.u2()?, descriptor_index: cursor.u2()? },
                15 => Constant::MethodHandle { reference_kind: cursor.u1()?, reference_index: cursor.u2()? },
                16 => Constant::MethodType { descriptor_index: cursor.u2()? },
                17 => Constant::Dynamic { bootstrap_method_attr_index: cursor.u2()?, name_and_type_index: cursor.u2()? },
                18 => Constant::InvokeDynamic { bootstrap_method_attr_index: cursor.u2()?, name_and_type_index: cursor.u2()? },
                19 => Constant::Module { name_index: cursor.u2()? },
                20 => Constant::Package { name_index: cursor.u2()? },
                other => return Err(Error::UnknownConstantTag(other)),
            };

            let widens = matches!(entry, Constant::Long(_) | Constant::Double(_));
            entries[i] = Some(entry);
            i += if widens { 2 } else { 1 };
        }

        Ok(Self { entries })
    }

    pub fn get(&self, index: u16) -> Result<&Constant> {
        self.entries
            .get(index as usize)
            .and_then(|slot| slot.as_ref())
            .ok_or(Error::BadConstantIndex(index))
    }

    pub fn utf8(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            Constant::Utf8(s) => Ok(s.as_str()),
            other => Err(Error::ConstantKindMismatch { index, expected: "Utf8", found: other.kind() }),
        }
    }

    pub fn class_name(&self, index: u16) -> Result<String> {
        match self.get(index)? {
            Constant::Class { name_index } => Ok(self.utf8(*name_index)?.to_string()),
            other => Err(Error::ConstantKindMismatch { index, expected: "Class", found: other.kind() }),
        }
    }

    pub fn module_name(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            Constant::Module { name_index } => self.utf8(*name_index),
            other => Err(Error::ConstantKindMismatch { index, expected: "Module", found: other.kind() }),
        }
    }

    pub fn package_name(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            Constant::Package { name_index } => self.utf8(*name_index),
            other => Err(Error::ConstantKindMismatch { index, expected: "Package", found: other.kind() }),
        }
    }
}

/// Classfile strings are "modified UTF-8": NUL is `0xC0 0x80` and
/// supplementary characters are surrogate pairs rather than 4-byte sequences.
/// Decoded via UTF-16 code units so unpaired surrogates (legal in identifiers
/// pulled from other JVM languages) degrade gracefully instead of erroring.
fn decode_modified_utf8(bytes: &[u8]) -> Result<String> {
    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0usize;
    while i < bytes.len() {
        let b = bytes[i];
        if b & 0x80 == 0 {
            units.push(b as u16);
            i += 1;
        } else if (b & 0xE0) == 0xC0 {
            let b2 = *bytes.get(i + 1).ok_or(Error::InvalidModifiedUtf8)?;
            if b == 0xC0 && b2 == 0x80 {
                units.push(0);
            } else {
                if (b2 & 0xC0) != 0x80 {
                    return Err(Error::InvalidModifiedUtf8);
                }
                units.push((((b & 0x1F) as u16) << 6) | ((b2 & 0x3F) as u16));
            }
            i += 2;
        } else if (b & 0xF0) == 0xE0 {
            let b2 = *bytes.get(i + 1).ok_or(Error::InvalidModifiedUtf8)?;
            let b3 = *bytes.get(i + 2).ok_or(Error::InvalidModifiedUtf8)?;
            if (b2 & 0xC0) != 0x80 || (b3 & 0xC0) != 0x80 {
                return Err(Error::InvalidModifiedUtf8);
            }
            units.push((((b & 0x0F) as u16) << 12) | (((b2 & 0x3F) as u16) << 6) | ((b3 & 0x3F) as u16));
            i += 3;
        } else {
            return Err(Error::InvalidModifiedUtf8);
        }
    }
    Ok(String::from_utf16_lossy(&units))
}
