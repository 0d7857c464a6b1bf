use crate::types::ColorMode;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Highest accepted `-v` count; more is a usage error.
pub const MAX_VERBOSITY: u8 = 3;

const RED: &str = "\u{1b}[31m";
const GREEN: &str = "\u{1b}[32m";
const RESET: &str = "\u{1b}[0m";

/// Output sink passed to the orchestrator and the report formatters.
///
/// Report output goes to the stdout writer, diagnostics to the stderr writer,
/// so a normal run produces only the selected report on stdout. Color is
/// resolved once at construction.
pub struct Logger {
    stdout: Box<dyn Write>,
    stderr: Box<dyn Write>,
    level: u8,
    use_color: bool,
}

impl Logger {
    pub fn new(
        stdout: Box<dyn Write>,
        stderr: Box<dyn Write>,
        verbosity: u8,
        color_mode: ColorMode,
    ) -> Self {
        Self {
            stdout,
            stderr,
            level: verbosity.min(MAX_VERBOSITY),
            use_color: color_mode.is_enabled(),
        }
    }

    /// Logger writing into shared in-memory buffers, for tests.
    pub fn buffered(verbosity: u8, color_mode: ColorMode) -> (Self, BufferSink, BufferSink) {
        let out = BufferSink::default();
        let err = BufferSink::default();
        let logger = Self::new(
            Box::new(out.clone()),
            Box::new(err.clone()),
            verbosity,
            color_mode,
        );
        (logger, out, err)
    }

    pub fn out(&mut self, message: &str) {
        let _ = writeln!(self.stdout, "{message}");
    }

    pub fn err(&mut self, message: &str) {
        let _ = writeln!(self.stderr, "{message}");
    }

    pub fn verbose1(&mut self, message: &str) {
        if self.level >= 1 {
            self.err(message);
        }
    }

    pub fn verbose2(&mut self, message: &str) {
        if self.level >= 2 {
            self.err(message);
        }
    }

    pub fn red(&self, text: &str) -> String {
        if self.use_color {
            format!("{RED}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    pub fn green(&self, text: &str) -> String {
        if self.use_color {
            format!("{GREEN}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

/// Cloneable in-memory `Write` target used by tests to capture logger output.
#[derive(Clone, Default)]
pub struct BufferSink(Arc<Mutex<Vec<u8>>>);

impl BufferSink {
    pub fn contents(&self) -> String {
        let buffer = self.0.lock().expect("buffer sink poisoned");
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl Write for BufferSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut buffer = self.0.lock().expect("buffer sink poisoned");
        buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_and_err_go_to_separate_sinks() {
        let (mut logger, out, err) = Logger::buffered(0, ColorMode::Never);
        logger.out("report line");
        logger.err("diagnostic");
        assert_eq!(out.contents(), "report line\n");
        assert_eq!(err.contents(), "diagnostic\n");
    }

    #[test]
    fn verbose_messages_respect_level() {
        let (mut logger, _out, err) = Logger::buffered(1, ColorMode::Never);
        logger.verbose1("shown");
        logger.verbose2("hidden");
        assert_eq!(err.contents(), "shown\n");
    }

    #[test]
    fn color_helpers_wrap_text_when_enabled() {
        let (logger, _out, _err) = Logger::buffered(0, ColorMode::Always);
        assert_eq!(logger.red("D "), "\u{1b}[31mD \u{1b}[0m");
        assert_eq!(logger.green("ok"), "\u{1b}[32mok\u{1b}[0m");
    }

    #[test]
    fn color_helpers_pass_through_when_disabled() {
        let (logger, _out, _err) = Logger::buffered(0, ColorMode::Never);
        assert_eq!(logger.red("D "), "D ");
    }
}
