use super::OutputFormatter;
use jardiff_common::{FileComparisonData, Logger};

/// Formatter showing a two-column XY status per file, like
/// `git status --short`:
///
/// - `"D "` missing on the left (exists on the right only)
/// - `" D"` missing on the right (exists on the left only)
/// - `"M "` present on both sides with changes
/// - `"  "` present on both sides, unchanged
pub struct StatusFormatter;

impl OutputFormatter for StatusFormatter {
    fn on_file_processed(&mut self, logger: &mut Logger, data: &FileComparisonData) {
        let line = if !data.left_exists && data.right_exists {
            format!("{} {}", logger.red("D "), data.path)
        } else if data.left_exists && !data.right_exists {
            format!("{} {}", logger.red(" D"), data.path)
        } else if !data.unified_diff.is_empty() {
            format!("{} {}", logger.red("M "), data.path)
        } else {
            format!("{} {}", logger.green("  "), data.path)
        };
        logger.out(&line);
    }
}
