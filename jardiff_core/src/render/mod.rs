pub mod classfile;
mod outline;
mod version;

pub use outline::ClassOutline;
pub use version::{describe_class_version, ClassFileVersion};

use jardiff_common::Result;

/// Capability that turns class file bytes into comparable text lines.
///
/// Implementations are deterministic pure functions of the bytes. A byte
/// stream that does not look like a class file fails with
/// [`jardiff_common::JarDiffError::NotAClassFile`]; the classifier treats
/// that like any other content error and falls back to the binary hash.
pub trait ClassRenderer {
    fn render(&self, bytes: &[u8]) -> Result<Vec<String>>;
}

/// The closed set of selectable renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererKind {
    /// ABI outline: declarations and signatures, no method bodies.
    ClassOutline,
    /// Class file major version mapped to a Java release label.
    ClassFileVersion,
}

impl RendererKind {
    pub fn create(self) -> Box<dyn ClassRenderer> {
        match self {
            RendererKind::ClassOutline => Box::new(ClassOutline::default()),
            RendererKind::ClassFileVersion => Box::new(ClassFileVersion),
        }
    }
}

impl Default for RendererKind {
    fn default() -> Self {
        RendererKind::ClassOutline
    }
}
