use crate::types::{ColorMode, OutputMode};
use std::collections::BTreeSet;

/// The extension always routed through the class renderer.
pub const CLASS_EXTENSION: &str = "class";

/// Comparison configuration, assembled by the CLI from its flags.
#[derive(Debug, Clone)]
pub struct DiffConfig {
    /// Include glob filters; empty means include everything.
    pub includes: Vec<String>,
    /// Exclude glob filters; an exclude match always wins over an include.
    pub excludes: Vec<String>,
    /// Additional extensions treated as class files for coalescing.
    pub class_extensions: BTreeSet<String>,
    pub output_mode: OutputMode,
    pub color_mode: ColorMode,
    /// Context lines around each unified diff hunk.
    pub context_lines: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            includes: Vec::new(),
            excludes: Vec::new(),
            class_extensions: BTreeSet::new(),
            output_mode: OutputMode::default(),
            color_mode: ColorMode::default(),
            context_lines: 4,
        }
    }
}

impl DiffConfig {
    /// The configured class-like extensions plus the built-in `class`.
    pub fn class_like_extensions(&self) -> BTreeSet<String> {
        let mut extensions = self.class_extensions.clone();
        extensions.insert(CLASS_EXTENSION.to_string());
        extensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_like_extensions_always_contain_class() {
        let config = DiffConfig::default();
        assert!(config.class_like_extensions().contains("class"));
    }

    #[test]
    fn class_like_extensions_include_configured_additions() {
        let config = DiffConfig {
            class_extensions: ["classdata".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let extensions = config.class_like_extensions();
        assert!(extensions.contains("class"));
        assert!(extensions.contains("classdata"));
    }
}
