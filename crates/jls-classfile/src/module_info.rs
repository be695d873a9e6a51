use jls_modules::{Exports, ModuleInfo, ModuleKind, ModuleName, Opens, Provides, Requires, Uses};

use crate::constant_pool::ConstantPool;
use crate::error::{Error, Result};
use crate::reader::Cursor;

const ACC_OPEN: u16 = 0x0020;
const ACC_TRANSITIVE: u16 = 0x0020;
const ACC_STATIC_PHASE: u16 = 0x0040;

/// Parses a `module-info.class` into a [`ModuleInfo`] — the only artifact
/// JDK/classpath module scanning needs from it (everything outside the
/// `Module` attribute is skipped).
pub fn parse_module_info_class(bytes: &[u8]) -> Result<ModuleInfo> {
    let mut cursor = Cursor::new(bytes);
    let magic = cursor.u4()?;
    if magic != 0xCAFE_BABE {
        return Err(Error::InvalidMagic(magic));
    }
    cursor.u2()?; // minor_version
    cursor.u2()?; // major_version
    let cp = ConstantPool::parse(&mut cursor)?;

    cursor.u2()?; // access_flags
    cursor.u2()?; // this_class
    cursor.u2()?; // super_class

    let interface_count = cursor.u2()? as usize;
    for _ in 0..interface_count {
        cursor.u2()?;
    }
    let field_count = cursor.u2()? as usize;
    for _ in 0..field_count {
        skip_member(&mut cursor)?;
    }
    let method_count = cursor.u2()? as usize;
    for _ in 0..method_count {
        skip_member(&mut cursor)?;
    }

    let attr_count = cursor.u2()? as usize;
    for _ in 0..attr_count {
        let name_index = cursor.u2()?;
        let length = cursor.u4()? as usize;
        let info = cursor.bytes(length)?;
        if cp.utf8(name_index)? == "Module" {
            let mut sub = Cursor::new(info);
            return parse_module_attribute(&mut sub, &cp);
        }
    }

    Err(Error::Other("module-info.class has no Module attribute"))
}

fn skip_member(cursor: &mut Cursor<'_>) -> Result<()> {
    cursor.u2()?; // access_flags
    cursor.u2()?; // name_index
    cursor.u2()?; // descriptor_index
    let attr_count = cursor.u2()? as usize;
    for _ in 0..attr_count {
        cursor.u2()?;
        let len = cursor.u4()? as usize;
        cursor.bytes(len)?;
    }
    Ok(())
}

fn parse_module_attribute(cursor: &mut Cursor<'_>, cp: &ConstantPool) -> Result<ModuleInfo> {
    let name = ModuleName::new(cp.module_name(cursor.u2()?)?);
    let flags = cursor.u2()?;
    cursor.u2()?; // module_version_index
    let is_open = flags & ACC_OPEN != 0;

    let requires_count = cursor.u2()? as usize;
    let mut requires = Vec::with_capacity(requires_count);
    for _ in 0..requires_count {
        let module = ModuleName::new(cp.module_name(cursor.u2()?)?);
        let req_flags = cursor.u2()?;
        cursor.u2()?; // requires_version_index
        requires.push(Requires {
            module,
            is_transitive: req_flags & ACC_TRANSITIVE != 0,
            is_static: req_flags & ACC_STATIC_PHASE != 0,
        });
    }

    let exports_count = cursor.u2()? as usize;
    let mut exports = Vec::with_capacity(exports_count);
    for _ in 0..exports_count {
        let package = cp.package_name(cursor.u2()?)?.replace('/', ".");
        cursor.u2()?; // exports_flags
        let to_count = cursor.u2()? as usize;
        let mut to = Vec::with_capacity(to_count);
        for _ in 0..to_count {
            to.push(ModuleName::new(cp.module_name(cursor.u2()?)?));
        }
        exports.push(Exports { package, to });
    }

    let opens_count = cursor.u2()? as usize;
    let mut opens = Vec::with_capacity(opens_count);
    for _ in 0..opens_count {
        let package = cp.package_name(cursor.u2()?)?.replace('/', ".");
        cursor.u2()?; // opens_flags
        let to_count = cursor.u2()? as usize;
        let mut to = Vec::with_capacity(to_count);
        for _ in 0..to_count {
            to.push(ModuleName::new(cp.module_name(cursor.u2()?)?));
        }
        opens.push(Opens { package, to });
    }

    let uses_count = cursor.u2()? as usize;
    let mut uses = Vec::with_capacity(uses_count);
    for _ in 0..uses_count {
        uses.push(Uses { service: cp.class_name(cursor.u2()?)?.replace('/', ".") });
    }

    let provides_count = cursor.u2()? as usize;
    let mut provides = Vec::with_capacity(provides_count);
    for _ in 0..provides_count {
        let service = cp.class_name(cursor.u2()?)?.replace('/', ".");
        let with_count = cursor.u2()? as usize;
        let mut implementations = Vec::with_capacity(with_count);
        for _ in 0..with_count {
            implementations.push(cp.class_name(cursor.u2()?)?.replace('/', "."));
        }
        provides.push(Provides { service, implementations });
    }

    Ok(ModuleInfo { kind: ModuleKind::Explicit, name, is_open, requires, exports, opens, uses, provides })
}
