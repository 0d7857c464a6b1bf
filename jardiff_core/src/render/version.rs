use super::{classfile::CLASS_MAGIC, ClassRenderer};
use byteorder::{BigEndian, ReadBytesExt};
use jardiff_common::{JarDiffError, Result};
use std::io::Cursor;

/// Class file major versions are offset from the Java release by 44,
/// e.g. major 68 is Java 24.
const MAJOR_VERSION_JAVA_OFFSET: i32 = 44;

/// Renderer that reduces a class file to its major version label.
pub struct ClassFileVersion;

impl ClassRenderer for ClassFileVersion {
    fn render(&self, bytes: &[u8]) -> Result<Vec<String>> {
        let mut cursor = Cursor::new(bytes);
        let magic = cursor
            .read_u32::<BigEndian>()
            .map_err(|_| JarDiffError::NotAClassFile("truncated class file".to_string()))?;
        if magic != CLASS_MAGIC {
            return Err(JarDiffError::NotAClassFile(format!(
                "bad magic 0x{magic:08x}"
            )));
        }
        let _minor = cursor
            .read_u16::<BigEndian>()
            .map_err(|_| JarDiffError::NotAClassFile("truncated class file".to_string()))?;
        let major = cursor
            .read_u16::<BigEndian>()
            .map_err(|_| JarDiffError::NotAClassFile("truncated class file".to_string()))?;
        Ok(vec![describe_class_version(major)])
    }
}

/// Describe a class file major version in terms of the Java release.
pub fn describe_class_version(major_version: u16) -> String {
    let java_version = i32::from(major_version) - MAJOR_VERSION_JAVA_OFFSET;
    format!("class version: {major_version} (Java {java_version})")
}

#[cfg(test)]
mod tests {
    use super::super::classfile::testdata;
    use super::*;

    #[test]
    fn renders_major_version_with_java_label() {
        let lines = ClassFileVersion.render(&testdata::simple_class(68)).unwrap();
        assert_eq!(lines, vec!["class version: 68 (Java 24)"]);
    }

    #[test]
    fn java_8_classes_are_major_52() {
        assert_eq!(describe_class_version(52), "class version: 52 (Java 8)");
    }

    #[test]
    fn fails_on_non_class_bytes() {
        let result = ClassFileVersion.render(b"not a class at all");
        assert!(matches!(result, Err(JarDiffError::NotAClassFile(_))));
    }

    #[test]
    fn fails_on_empty_input() {
        let result = ClassFileVersion.render(b"");
        assert!(matches!(result, Err(JarDiffError::NotAClassFile(_))));
    }
}
