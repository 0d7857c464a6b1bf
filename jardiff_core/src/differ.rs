//! The comparison orchestrator: enumerate both sides, reconcile paths,
//! classify content and feed per-file results to the output formatter.

use crate::classify;
use crate::diff::unified_diff;
use crate::output::OutputFormatter;
use crate::reconcile::reconcile;
use crate::render::ClassRenderer;
use crate::source::DiffSource;
use jardiff_common::{DiffConfig, FileComparisonData, Logger, Result};

/// Drives one comparison run between two opened sources.
pub struct Differ {
    left: DiffSource,
    right: DiffSource,
    config: DiffConfig,
    renderer: Box<dyn ClassRenderer>,
}

impl Differ {
    pub fn new(
        left: DiffSource,
        right: DiffSource,
        config: DiffConfig,
        renderer: Box<dyn ClassRenderer>,
    ) -> Self {
        Self {
            left,
            right,
            config,
            renderer,
        }
    }

    /// Run the comparison, streaming each unit to `formatter` in path order.
    ///
    /// Returns `true` when any unit differed, including units present on
    /// only one side.
    pub fn diff(
        &mut self,
        logger: &mut Logger,
        formatter: &mut dyn OutputFormatter,
    ) -> Result<bool> {
        let left_entries = self.left.enumerate()?;
        let right_entries = self.right.enumerate()?;
        let units = reconcile(&left_entries, &right_entries, &self.config);
        logger.verbose1(&format!("comparing {} entries", units.len()));

        let class_extensions = self.config.class_like_extensions();
        let mut any_changes = false;

        for unit in &units {
            logger.verbose2(&format!("processing {}", unit.display_path));
            let left_lines = classify::read_lines(
                unit.left.as_ref(),
                &class_extensions,
                self.renderer.as_ref(),
            );
            let right_lines = classify::read_lines(
                unit.right.as_ref(),
                &class_extensions,
                self.renderer.as_ref(),
            );

            let left_label = unit.left.as_ref().map(|e| e.relative_path.as_str());
            let right_label = unit.right.as_ref().map(|e| e.relative_path.as_str());
            let diff_lines = unified_diff(
                left_label,
                right_label,
                &left_lines,
                &right_lines,
                self.config.context_lines,
            );

            let data = FileComparisonData {
                path: unit.display_path.clone(),
                left_exists: unit.left.is_some(),
                right_exists: unit.right.is_some(),
                unified_diff: diff_lines,
            };
            any_changes |=
                !data.unified_diff.is_empty() || data.left_exists != data.right_exists;
            formatter.on_file_processed(logger, &data);
        }

        formatter.on_complete(logger);
        Ok(any_changes)
    }

    /// Release both sides. A failure on one side is reported but never
    /// prevents closing the other.
    pub fn close(self, logger: &mut Logger) {
        let Self { left, right, .. } = self;
        for source in [left, right] {
            let tag = source.tag();
            if let Err(err) = source.close() {
                logger.err(&format!("failed to close {tag} source: {err}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{DiffFormatter, OutputFormatter};
    use crate::render::classfile::testdata::simple_class;
    use crate::render::RendererKind;
    use jardiff_common::{ColorMode, SideTag};
    use std::fs;
    use tempfile::TempDir;

    /// Formatter recording everything it is fed, for assertions.
    #[derive(Default)]
    struct RecordingFormatter {
        data: Vec<FileComparisonData>,
        completed: bool,
    }

    impl OutputFormatter for RecordingFormatter {
        fn on_file_processed(&mut self, _logger: &mut Logger, data: &FileComparisonData) {
            self.data.push(data.clone());
        }

        fn on_complete(&mut self, _logger: &mut Logger) {
            self.completed = true;
        }
    }

    fn populate(dir: &TempDir, files: &[(&str, &[u8])]) {
        for (name, content) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, content).unwrap();
        }
    }

    fn differ_for(left: &TempDir, right: &TempDir, renderer: RendererKind) -> Differ {
        Differ::new(
            DiffSource::open(SideTag::Left, left.path()).unwrap(),
            DiffSource::open(SideTag::Right, right.path()).unwrap(),
            DiffConfig::default(),
            renderer.create(),
        )
    }

    #[test]
    fn identical_trees_report_no_changes() {
        let left = TempDir::new().unwrap();
        let right = TempDir::new().unwrap();
        populate(&left, &[("a.txt", b"same\n"), ("sub/b.txt", b"also same\n")]);
        populate(&right, &[("a.txt", b"same\n"), ("sub/b.txt", b"also same\n")]);

        let (mut logger, out, _err) = Logger::buffered(0, ColorMode::Never);
        let mut formatter = DiffFormatter;
        let mut differ = differ_for(&left, &right, RendererKind::ClassFileVersion);

        let changed = differ.diff(&mut logger, &mut formatter).unwrap();
        differ.close(&mut logger);

        assert!(!changed);
        assert_eq!(out.contents(), "");
    }

    #[test]
    fn a_tree_compared_to_itself_is_unchanged() {
        let dir = TempDir::new().unwrap();
        populate(&dir, &[("a.txt", b"content\n"), ("b.md", b"# title\n")]);

        let (mut logger, _out, _err) = Logger::buffered(0, ColorMode::Never);
        let mut formatter = RecordingFormatter::default();
        let mut differ = differ_for(&dir, &dir, RendererKind::ClassFileVersion);

        let changed = differ.diff(&mut logger, &mut formatter).unwrap();
        differ.close(&mut logger);

        assert!(!changed);
        assert!(formatter.completed);
        assert!(formatter.data.iter().all(|d| d.unified_diff.is_empty()));
    }

    #[test]
    fn modified_text_produces_a_diff_and_signals_changes() {
        let left = TempDir::new().unwrap();
        let right = TempDir::new().unwrap();
        populate(&left, &[("a.txt", b"hello\n")]);
        populate(&right, &[("a.txt", b"hello world\n")]);

        let (mut logger, out, _err) = Logger::buffered(0, ColorMode::Never);
        let mut formatter = DiffFormatter;
        let mut differ = differ_for(&left, &right, RendererKind::ClassFileVersion);

        let changed = differ.diff(&mut logger, &mut formatter).unwrap();
        differ.close(&mut logger);

        assert!(changed);
        assert_eq!(
            out.contents(),
            "--- a.txt\n+++ a.txt\n@@ -1,1 +1,1 @@\n-hello\n+hello world\n"
        );
    }

    #[test]
    fn swapping_sides_swaps_diff_direction() {
        let left = TempDir::new().unwrap();
        let right = TempDir::new().unwrap();
        populate(&left, &[("a.txt", b"one\n")]);
        populate(&right, &[("a.txt", b"two\n")]);

        let (mut logger, _out, _err) = Logger::buffered(0, ColorMode::Never);

        let mut forward = RecordingFormatter::default();
        let mut differ = differ_for(&left, &right, RendererKind::ClassFileVersion);
        differ.diff(&mut logger, &mut forward).unwrap();
        differ.close(&mut logger);

        let mut backward = RecordingFormatter::default();
        let mut differ = differ_for(&right, &left, RendererKind::ClassFileVersion);
        differ.diff(&mut logger, &mut backward).unwrap();
        differ.close(&mut logger);

        let forward_diff = &forward.data[0].unified_diff;
        let backward_diff = &backward.data[0].unified_diff;
        assert!(forward_diff.contains(&"-one".to_string()));
        assert!(forward_diff.contains(&"+two".to_string()));
        assert!(backward_diff.contains(&"-two".to_string()));
        assert!(backward_diff.contains(&"+one".to_string()));
    }

    #[test]
    fn one_sided_files_count_as_changes() {
        let left = TempDir::new().unwrap();
        let right = TempDir::new().unwrap();
        populate(&left, &[("gone.txt", b"bye\n")]);

        let (mut logger, _out, _err) = Logger::buffered(0, ColorMode::Never);
        let mut formatter = RecordingFormatter::default();
        let mut differ = differ_for(&left, &right, RendererKind::ClassFileVersion);

        let changed = differ.diff(&mut logger, &mut formatter).unwrap();
        differ.close(&mut logger);

        assert!(changed);
        assert_eq!(formatter.data.len(), 1);
        let data = &formatter.data[0];
        assert!(data.left_exists && !data.right_exists);
        assert!(data.unified_diff.contains(&"+++ /dev/null".to_string()));
        assert!(data.unified_diff.contains(&"-bye".to_string()));
    }

    #[test]
    fn coalesced_class_aliases_with_equal_content_are_unchanged() {
        let left = TempDir::new().unwrap();
        let right = TempDir::new().unwrap();
        let bytes = simple_class(68);
        populate(&left, &[("com/acme/Foo.class", bytes.as_slice())]);
        populate(&right, &[("com/acme/Foo.classdata", bytes.as_slice())]);

        let (mut logger, _out, _err) = Logger::buffered(0, ColorMode::Never);
        let mut formatter = RecordingFormatter::default();
        let mut differ = Differ::new(
            DiffSource::open(SideTag::Left, left.path()).unwrap(),
            DiffSource::open(SideTag::Right, right.path()).unwrap(),
            DiffConfig {
                class_extensions: ["classdata".to_string()].into_iter().collect(),
                ..Default::default()
            },
            RendererKind::ClassFileVersion.create(),
        );

        let changed = differ.diff(&mut logger, &mut formatter).unwrap();
        differ.close(&mut logger);

        assert!(!changed);
        assert_eq!(formatter.data.len(), 1);
        assert_eq!(formatter.data[0].path, "com/acme/Foo.class");
        assert!(formatter.data[0].left_exists && formatter.data[0].right_exists);
    }

    #[test]
    fn class_version_bump_diffs_as_one_line_change() {
        let left = TempDir::new().unwrap();
        let right = TempDir::new().unwrap();
        populate(&left, &[("Foo.class", simple_class(52).as_slice())]);
        populate(&right, &[("Foo.class", simple_class(68).as_slice())]);

        let (mut logger, _out, _err) = Logger::buffered(0, ColorMode::Never);
        let mut formatter = RecordingFormatter::default();
        let mut differ = differ_for(&left, &right, RendererKind::ClassFileVersion);

        let changed = differ.diff(&mut logger, &mut formatter).unwrap();
        differ.close(&mut logger);

        assert!(changed);
        let diff = &formatter.data[0].unified_diff;
        assert!(diff.contains(&"-class version: 52 (Java 8)".to_string()));
        assert!(diff.contains(&"+class version: 68 (Java 24)".to_string()));
    }

    #[test]
    fn verbose_diagnostics_are_gated_and_stay_off_stdout() {
        let left = TempDir::new().unwrap();
        let right = TempDir::new().unwrap();
        populate(&left, &[("a.txt", b"same\n")]);
        populate(&right, &[("a.txt", b"same\n")]);

        let (mut logger, out, err) = Logger::buffered(2, ColorMode::Never);
        let mut formatter = DiffFormatter;
        let mut differ = differ_for(&left, &right, RendererKind::ClassFileVersion);
        differ.diff(&mut logger, &mut formatter).unwrap();
        differ.close(&mut logger);

        assert_eq!(out.contents(), "");
        let diagnostics = err.contents();
        assert!(diagnostics.contains("comparing 1 entries"));
        assert!(diagnostics.contains("processing a.txt"));

        let (mut quiet_logger, _out, quiet_err) = Logger::buffered(0, ColorMode::Never);
        let mut formatter = DiffFormatter;
        let mut differ = differ_for(&left, &right, RendererKind::ClassFileVersion);
        differ.diff(&mut quiet_logger, &mut formatter).unwrap();
        differ.close(&mut quiet_logger);
        assert_eq!(quiet_err.contents(), "");
    }

    #[test]
    fn jar_and_directory_sides_compare_transparently() {
        let dir_side = TempDir::new().unwrap();
        populate(&dir_side, &[("a.txt", b"hello\n")]);

        let jar_dir = TempDir::new().unwrap();
        let jar_path = jar_dir.path().join("side.jar");
        let file = fs::File::create(&jar_path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file("a.txt", zip::write::FileOptions::default())
            .unwrap();
        std::io::Write::write_all(&mut writer, b"hello\n").unwrap();
        writer.finish().unwrap();

        let (mut logger, _out, _err) = Logger::buffered(0, ColorMode::Never);
        let mut formatter = RecordingFormatter::default();
        let mut differ = Differ::new(
            DiffSource::open(SideTag::Left, dir_side.path()).unwrap(),
            DiffSource::open(SideTag::Right, &jar_path).unwrap(),
            DiffConfig::default(),
            RendererKind::ClassFileVersion.create(),
        );

        let changed = differ.diff(&mut logger, &mut formatter).unwrap();
        differ.close(&mut logger);

        assert!(!changed);
        assert_eq!(formatter.data.len(), 1);
        assert_eq!(formatter.data[0].path, "a.txt");
    }
}
