//! In-memory run transcript.
//!
//! Mirrors every line to `tracing` and keeps the rendered lines so the run
//! record can persist a bounded tail. The severity set follows the crawler's
//! streaming log: info, success, warning, error, progress.

#[derive(Debug, Default)]
pub(crate) struct RunLog {
    lines: Vec<String>,
}

impl RunLog {
    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{message}");
        self.lines.push(format!("INFO {message}"));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{message}");
        self.lines.push(format!("SUCCESS {message}"));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{message}");
        self.lines.push(format!("WARNING {message}"));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!("{message}");
        self.lines.push(format!("ERROR {message}"));
    }

    pub fn progress(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{message}");
        self.lines.push(format!("PROGRESS {message}"));
    }

    /// Last `n` lines of the transcript.
    pub fn tail(&self, n: usize) -> Vec<String> {
        let start = self.lines.len().saturating_sub(n);
        self.lines[start..].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_carry_severity_prefixes() {
        let mut log = RunLog::default();
        log.info("first");
        log.success("second");
        log.warning("third");
        log.error("fourth");
        log.progress("fifth");

        let tail = log.tail(10);
        assert_eq!(
            tail,
            vec![
                "INFO first",
                "SUCCESS second",
                "WARNING third",
                "ERROR fourth",
                "PROGRESS fifth",
            ]
        );
    }

    #[test]
    fn tail_is_bounded_and_keeps_the_newest_lines() {
        let mut log = RunLog::default();
        for i in 0..150 {
            log.info(format!("line {i}"));
        }
        let tail = log.tail(100);
        assert_eq!(tail.len(), 100);
        assert_eq!(tail.first().map(String::as_str), Some("INFO line 50"));
        assert_eq!(tail.last().map(String::as_str), Some("INFO line 149"));
    }

    #[test]
    fn tail_larger_than_transcript_returns_everything() {
        let mut log = RunLog::default();
        log.info("only line");
        assert_eq!(log.tail(100).len(), 1);
    }
}
