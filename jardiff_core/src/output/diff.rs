use super::OutputFormatter;
use jardiff_common::{FileComparisonData, Logger};

/// Formatter that emits each unit's unified diff as-is.
///
/// Stateless; units without changes produce no output at all.
pub struct DiffFormatter;

impl OutputFormatter for DiffFormatter {
    fn on_file_processed(&mut self, logger: &mut Logger, data: &FileComparisonData) {
        for line in &data.unified_diff {
            logger.out(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jardiff_common::ColorMode;

    #[test]
    fn emits_diff_lines_verbatim() {
        let (mut logger, out, _err) = Logger::buffered(0, ColorMode::Never);
        let data = FileComparisonData {
            path: "a.txt".to_string(),
            left_exists: true,
            right_exists: true,
            unified_diff: vec!["--- a.txt".to_string(), "+++ a.txt".to_string()],
        };
        DiffFormatter.on_file_processed(&mut logger, &data);
        assert_eq!(out.contents(), "--- a.txt\n+++ a.txt\n");
    }

    #[test]
    fn unchanged_units_emit_nothing() {
        let (mut logger, out, _err) = Logger::buffered(0, ColorMode::Never);
        let data = FileComparisonData {
            path: "same.txt".to_string(),
            left_exists: true,
            right_exists: true,
            unified_diff: Vec::new(),
        };
        let mut formatter = DiffFormatter;
        formatter.on_file_processed(&mut logger, &data);
        formatter.on_complete(&mut logger);
        assert_eq!(out.contents(), "");
    }
}
