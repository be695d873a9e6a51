//! JVM field/method descriptor grammar (JVMS §4.3), used by the resolver to
//! type-check calls and field accesses against classpath/JDK members without
//! needing the originating source.

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Base(BaseType),
    /// Binary (slash-separated) class name, without the `L`/`;` wrapper.
    Object(String),
    Array(Box<FieldType>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnType {
    Void,
    Type(FieldType),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub params: Vec<FieldType>,
    pub return_type: ReturnType,
}

pub fn parse_field_descriptor(desc: &str) -> Result<FieldType> {
    let (ty, rest) = parse_field_type(desc)?;
    if !rest.is_empty() {
        return Err(Error::InvalidDescriptor(desc.to_string()));
    }
    Ok(ty)
}

pub fn parse_method_descriptor(desc: &str) -> Result<MethodDescriptor> {
    let rest = desc.strip_prefix('(').ok_or_else(|| Error::InvalidDescriptor(desc.to_string()))?;
    let mut params = Vec::new();
    let mut cursor = rest;
    loop {
        if let Some(after) = cursor.strip_prefix(')') {
            cursor = after;
            break;
        }
        let (param, after) = parse_field_type(cursor)?;
        params.push(param);
        cursor = after;
    }

    let return_type = if let Some(after) = cursor.strip_prefix('V') {
        cursor = after;
        ReturnType::Void
    } else {
        let (ty, after) = parse_field_type(cursor)?;
        cursor = after;
        ReturnType::Type(ty)
    };

    if !cursor.is_empty() {
        return Err(Error::InvalidDescriptor(desc.to_string()));
    }
    Ok(MethodDescriptor { params, return_type })
}

fn parse_field_type(input: &str) -> Result<(FieldType, &str)> {
    let mut chars = input.chars();
    match chars.next() {
        Some('B') => Ok((FieldType::Base(BaseType::Byte), chars.as_str())),
        Some('C') => Ok((FieldType::Base(BaseType::Char), chars.as_str())),
        Some('D') => Ok((FieldType::Base(BaseType::Double), chars.as_str())),
        Some('F') => Ok((FieldType::Base(BaseType::Float), chars.as_str())),
        Some('I') => Ok((FieldType::Base(BaseType::Int), chars.as_str())),
        Some('J') => Ok((FieldType::Base(BaseType::Long), chars.as_str())),
        Some('S') => Ok((FieldType::Base(BaseType::Short), chars.as_str())),
        Some('Z') => Ok((FieldType::Base(BaseType::Boolean), chars.as_str())),
        Some('L') => {
            let rest = chars.as_str();
            let end = rest.find(';').ok_or_else(|| Error::InvalidDescriptor(input.to_string()))?;
            Ok((FieldType::Object(rest[..end].to_string()), &rest[end + 1..]))
        }
        Some('[') => {
            let (component, rest) = parse_field_type(chars.as_str())?;
            Ok((FieldType::Array(Box::new(component)), rest))
        }
        _ => Err(Error::InvalidDescriptor(input.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_and_array_field_descriptors() {
        assert_eq!(parse_field_descriptor("I").unwrap(), FieldType::Base(BaseType::Int));
        assert_eq!(
            parse_field_descriptor("[[Ljava/lang/String;").unwrap(),
            FieldType::Array(Box::new(FieldType::Array(Box::new(FieldType::Object("java/lang/String".into())))))
        );
    }

    #[test]
    fn method_descriptor_with_params_and_array_return() {
        let desc = parse_method_descriptor("(ILjava/lang/String;)[I").unwrap();
        assert_eq!(
            desc.params,
            vec![FieldType::Base(BaseType::Int), FieldType::Object("java/lang/String".into())]
        );
        assert_eq!(desc.return_type, ReturnType::Type(FieldType::Array(Box::new(FieldType::Base(BaseType::Int)))));
    }

    #[test]
    fn void_no_arg_method_descriptor() {
        let desc = parse_method_descriptor("()V").unwrap();
        assert!(desc.params.is_empty());
        assert_eq!(desc.return_type, ReturnType::Void);
    }
}
