//! Report formatters: one per output mode, fed a stream of per-file
//! comparison results in reconciled path order.

mod diff;
mod stat;
mod status;

pub use diff::DiffFormatter;
pub use stat::StatFormatter;
pub use status::StatusFormatter;

use jardiff_common::{FileComparisonData, Logger, OutputMode};

/// Strategy for rendering comparison results.
pub trait OutputFormatter {
    /// Called once per comparison unit, in path order.
    fn on_file_processed(&mut self, logger: &mut Logger, data: &FileComparisonData);

    /// Called once after the last unit; summaries go here.
    fn on_complete(&mut self, _logger: &mut Logger) {}
}

/// Build the formatter for a mode. The variant set is closed; modes are
/// validated at argument-parse time.
pub fn formatter_for(mode: OutputMode) -> Box<dyn OutputFormatter> {
    match mode {
        OutputMode::Status => Box::new(StatusFormatter),
        OutputMode::Stat => Box::new(StatFormatter::default()),
        OutputMode::Diff => Box::new(DiffFormatter),
    }
}
