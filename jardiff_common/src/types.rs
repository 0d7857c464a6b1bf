use std::fmt;
use std::io::IsTerminal;

/// Which side of the comparison a source belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideTag {
    Left,
    Right,
}

impl fmt::Display for SideTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SideTag::Left => write!(f, "LEFT"),
            SideTag::Right => write!(f, "RIGHT"),
        }
    }
}

/// Report style emitted on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Two-column XY status per file, like `git status --short`.
    Status,
    /// Per-file addition/deletion statistics, like `git diff --stat`.
    Stat,
    /// Full unified diff output.
    #[default]
    Diff,
}

/// Controls when ANSI color codes are used in output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    Always,
    #[default]
    Auto,
    Never,
}

impl ColorMode {
    /// Resolve the mode against the environment.
    ///
    /// `Auto` enables color only when stdout is a terminal, `TERM` is set to
    /// something other than "dumb", and `NO_COLOR` is unset or empty.
    pub fn is_enabled(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                let is_tty = std::io::stdout().is_terminal();
                let term_supports_color = std::env::var("TERM")
                    .map(|term| term != "dumb")
                    .unwrap_or(false);
                let no_color = std::env::var_os("NO_COLOR")
                    .map(|value| !value.is_empty())
                    .unwrap_or(false);
                is_tty && term_supports_color && !no_color
            }
        }
    }
}

/// Per-file comparison result handed to output formatters.
///
/// A deliberately small DTO: formatters see only the display path, side
/// presence, and the rendered unified diff (empty when unchanged).
#[derive(Debug, Clone)]
pub struct FileComparisonData {
    pub path: String,
    pub left_exists: bool,
    pub right_exists: bool,
    pub unified_diff: Vec<String>,
}
