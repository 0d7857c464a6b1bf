use super::OutputFormatter;
use crate::diff::count_changes;
use jardiff_common::{FileComparisonData, Logger};

/// Widest allowed `+`/`-` bar; larger change counts scale down onto it.
const MAX_BAR_WIDTH: usize = 50;

/// Formatter accumulating per-file statistics, rendered on completion in
/// the style of `git diff --stat`.
#[derive(Default)]
pub struct StatFormatter {
    file_stats: Vec<FileStat>,
}

struct FileStat {
    path: String,
    additions: usize,
    deletions: usize,
}

impl OutputFormatter for StatFormatter {
    fn on_file_processed(&mut self, _logger: &mut Logger, data: &FileComparisonData) {
        let (additions, deletions) = count_changes(&data.unified_diff);
        self.file_stats.push(FileStat {
            path: data.path.clone(),
            additions,
            deletions,
        });
    }

    fn on_complete(&mut self, logger: &mut Logger) {
        if self.file_stats.is_empty() {
            return;
        }

        let max_path_length = self
            .file_stats
            .iter()
            .map(|stat| stat.path.len())
            .max()
            .unwrap_or(0);
        let max_changes = self
            .file_stats
            .iter()
            .map(|stat| stat.additions + stat.deletions)
            .max()
            .unwrap_or(0);

        for stat in &self.file_stats {
            let total = stat.additions + stat.deletions;
            if total == 0 {
                logger.out(&format!(
                    " {:<width$} | 0",
                    stat.path,
                    width = max_path_length
                ));
                continue;
            }

            let bar_width = if max_changes > MAX_BAR_WIDTH {
                let scaled = (total as f64 / max_changes as f64) * MAX_BAR_WIDTH as f64;
                (scaled as usize).max(1)
            } else {
                total
            };
            let addition_bar =
                "+".repeat((stat.additions as f64 / total as f64 * bar_width as f64) as usize);
            let deletion_bar = "-".repeat(bar_width - addition_bar.len());

            let row = format!(
                " {:<width$} | {} {}{}",
                stat.path,
                total,
                logger.green(&addition_bar),
                logger.red(&deletion_bar),
                width = max_path_length
            );
            logger.out(&row);
        }

        let files_changed = self
            .file_stats
            .iter()
            .filter(|stat| stat.additions + stat.deletions > 0)
            .count();
        let total_additions: usize = self.file_stats.iter().map(|stat| stat.additions).sum();
        let total_deletions: usize = self.file_stats.iter().map(|stat| stat.deletions).sum();

        logger.out(&format!(
            " {files_changed} files changed, {total_additions} insertions(+), {total_deletions} deletions(-)"
        ));
    }
}
