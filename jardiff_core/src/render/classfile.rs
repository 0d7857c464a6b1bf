//! Minimal class file reader: header, constant pool, and member signatures.
//!
//! Reads just enough of the format to outline a class's ABI. Method bodies,
//! attributes, and annotations are skipped over without interpretation.

use byteorder::{BigEndian, ReadBytesExt};
use jardiff_common::{JarDiffError, Result};
use std::io::Cursor;

pub const CLASS_MAGIC: u32 = 0xCAFE_BABE;

/// Class access and property flags, per the JVM specification.
pub mod access {
    pub const PUBLIC: u16 = 0x0001;
    pub const PRIVATE: u16 = 0x0002;
    pub const PROTECTED: u16 = 0x0004;
    pub const STATIC: u16 = 0x0008;
    pub const FINAL: u16 = 0x0010;
    pub const SYNCHRONIZED: u16 = 0x0020;
    pub const VOLATILE: u16 = 0x0040;
    pub const BRIDGE: u16 = 0x0040;
    pub const TRANSIENT: u16 = 0x0080;
    pub const NATIVE: u16 = 0x0100;
    pub const INTERFACE: u16 = 0x0200;
    pub const ABSTRACT: u16 = 0x0400;
    pub const SYNTHETIC: u16 = 0x1000;
    pub const ANNOTATION: u16 = 0x2000;
    pub const ENUM: u16 = 0x4000;
}

/// The parts of a parsed class file the outline renderer needs.
#[derive(Debug)]
pub struct RawClass {
    pub major_version: u16,
    pub access_flags: u16,
    /// Internal binary name, e.g. `com/acme/Foo`.
    pub this_class: String,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub fields: Vec<Member>,
    pub methods: Vec<Member>,
}

/// A field or method: access flags plus name/descriptor pair.
#[derive(Debug)]
pub struct Member {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: String,
}

enum CpEntry {
    Utf8(String),
    Class(u16),
    Other,
}

pub fn parse(bytes: &[u8]) -> Result<RawClass> {
    let mut cursor = Cursor::new(bytes);

    let magic = read_u32(&mut cursor)?;
    if magic != CLASS_MAGIC {
        return Err(JarDiffError::NotAClassFile(format!(
            "bad magic 0x{magic:08x}"
        )));
    }
    let _minor_version = read_u16(&mut cursor)?;
    let major_version = read_u16(&mut cursor)?;

    let pool = read_constant_pool(&mut cursor, bytes)?;

    let access_flags = read_u16(&mut cursor)?;
    let this_class_index = read_u16(&mut cursor)?;
    let super_class_index = read_u16(&mut cursor)?;

    let this_class = class_name(&pool, this_class_index)?;
    let super_class = if super_class_index == 0 {
        None
    } else {
        Some(class_name(&pool, super_class_index)?)
    };

    let interface_count = read_u16(&mut cursor)?;
    let mut interfaces = Vec::with_capacity(interface_count as usize);
    for _ in 0..interface_count {
        let index = read_u16(&mut cursor)?;
        interfaces.push(class_name(&pool, index)?);
    }

    let fields = read_members(&mut cursor, bytes, &pool)?;
    let methods = read_members(&mut cursor, bytes, &pool)?;

    Ok(RawClass {
        major_version,
        access_flags,
        this_class,
        super_class,
        interfaces,
        fields,
        methods,
    })
}

fn read_constant_pool(cursor: &mut Cursor<&[u8]>, bytes: &[u8]) -> Result<Vec<CpEntry>> {
    let count = read_u16(cursor)?;
    let mut pool = Vec::with_capacity(count as usize);
    // Index 0 is unused by the format.
    pool.push(CpEntry::Other);

    let mut index = 1;
    while index < count {
        let tag = read_u8(cursor)?;
        let entry = match tag {
            // CONSTANT_Utf8
            1 => {
                let length = read_u16(cursor)? as usize;
                let start = cursor.position() as usize;
                let end = start + length;
                if end > bytes.len() {
                    return Err(truncated());
                }
                cursor.set_position(end as u64);
                CpEntry::Utf8(String::from_utf8_lossy(&bytes[start..end]).into_owned())
            }
            // CONSTANT_Integer, CONSTANT_Float
            3 | 4 => {
                skip(cursor, bytes, 4)?;
                CpEntry::Other
            }
            // CONSTANT_Long, CONSTANT_Double take two pool slots
            5 | 6 => {
                skip(cursor, bytes, 8)?;
                pool.push(CpEntry::Other);
                index += 1;
                CpEntry::Other
            }
            // CONSTANT_Class
            7 => CpEntry::Class(read_u16(cursor)?),
            // CONSTANT_String, CONSTANT_MethodType, CONSTANT_Module, CONSTANT_Package
            8 | 16 | 19 | 20 => {
                skip(cursor, bytes, 2)?;
                CpEntry::Other
            }
            // CONSTANT_Fieldref, Methodref, InterfaceMethodref, NameAndType,
            // Dynamic, InvokeDynamic
            9 | 10 | 11 | 12 | 17 | 18 => {
                skip(cursor, bytes, 4)?;
                CpEntry::Other
            }
            // CONSTANT_MethodHandle
            15 => {
                skip(cursor, bytes, 3)?;
                CpEntry::Other
            }
            other => {
                return Err(JarDiffError::NotAClassFile(format!(
                    "unknown constant pool tag {other}"
                )));
            }
        };
        pool.push(entry);
        index += 1;
    }
    Ok(pool)
}

fn read_members(
    cursor: &mut Cursor<&[u8]>,
    bytes: &[u8],
    pool: &[CpEntry],
) -> Result<Vec<Member>> {
    let count = read_u16(cursor)?;
    let mut members = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let access_flags = read_u16(cursor)?;
        let name_index = read_u16(cursor)?;
        let descriptor_index = read_u16(cursor)?;
        skip_attributes(cursor, bytes)?;
        members.push(Member {
            access_flags,
            name: utf8(pool, name_index)?,
            descriptor: utf8(pool, descriptor_index)?,
        });
    }
    Ok(members)
}

fn skip_attributes(cursor: &mut Cursor<&[u8]>, bytes: &[u8]) -> Result<()> {
    let count = read_u16(cursor)?;
    for _ in 0..count {
        let _name_index = read_u16(cursor)?;
        let length = read_u32(cursor)?;
        skip(cursor, bytes, length as usize)?;
    }
    Ok(())
}

fn class_name(pool: &[CpEntry], index: u16) -> Result<String> {
    match pool.get(index as usize) {
        Some(CpEntry::Class(name_index)) => utf8(pool, *name_index),
        _ => Err(JarDiffError::NotAClassFile(format!(
            "constant pool index {index} is not a class"
        ))),
    }
}

fn utf8(pool: &[CpEntry], index: u16) -> Result<String> {
    match pool.get(index as usize) {
        Some(CpEntry::Utf8(text)) => Ok(text.clone()),
        _ => Err(JarDiffError::NotAClassFile(format!(
            "constant pool index {index} is not utf8"
        ))),
    }
}

fn skip(cursor: &mut Cursor<&[u8]>, bytes: &[u8], length: usize) -> Result<()> {
    let end = cursor.position() as usize + length;
    if end > bytes.len() {
        return Err(truncated());
    }
    cursor.set_position(end as u64);
    Ok(())
}

fn read_u8(cursor: &mut Cursor<&[u8]>) -> Result<u8> {
    cursor.read_u8().map_err(|_| truncated())
}

fn read_u16(cursor: &mut Cursor<&[u8]>) -> Result<u16> {
    cursor.read_u16::<BigEndian>().map_err(|_| truncated())
}

fn read_u32(cursor: &mut Cursor<&[u8]>) -> Result<u32> {
    cursor.read_u32::<BigEndian>().map_err(|_| truncated())
}

fn truncated() -> JarDiffError {
    JarDiffError::NotAClassFile("truncated class file".to_string())
}
