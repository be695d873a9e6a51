use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    UnexpectedEof,
    InvalidMagic(u32),
    BadConstantIndex(u16),
    UnknownConstantTag(u8),
    ConstantKindMismatch { index: u16, expected: &'static str, found: &'static str },
    InvalidModifiedUtf8,
    InvalidDescriptor(String),
    MalformedAttribute(&'static str),
    Other(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnexpectedEof => write!(f, "unexpected end of classfile"),
            Error::InvalidMagic(magic) => write!(f, "not a classfile (magic 0x{magic:08x})"),
            Error::BadConstantIndex(idx) => write!(f, "constant pool index {idx} out of range"),
            Error::UnknownConstantTag(tag) => write!(f, "unrecognized constant pool tag {tag}"),
            Error::ConstantKindMismatch { index, expected, found } => {
                write!(f, "constant #{index}: expected {expected}, found {found}")
            }
            Error::InvalidModifiedUtf8 => write!(f, "malformed modified-UTF-8 constant"),
            Error::InvalidDescriptor(desc) => write!(f, "invalid descriptor `{desc}`"),
            Error::MalformedAttribute(name) => write!(f, "malformed {name} attribute"),
            Error::Other(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for Error {}
