//! Write report model.

use std::fmt;
use std::path::PathBuf;

/// Outcome of one `write_bytes` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportWrite {
    /// Destination path as given by the caller.
    pub path: PathBuf,
    /// Number of bytes written by this call.
    pub n_bytes_written: u64,
    /// Bytes were appended to an already existing, non-empty file.
    pub if_appended: bool,
}

impl ReportWrite {
    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} path={} bytes={} appended={}",
            self.path.display(),
            self.n_bytes_written,
            self.if_appended
        )
    }
}

impl fmt::Display for ReportWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[WRITE]"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_display_summary() {
        let report = ReportWrite {
            path: PathBuf::from("out/report.xlsx"),
            n_bytes_written: 42,
            if_appended: false,
        };
        assert_eq!(
            report.to_string(),
            "[WRITE] path=out/report.xlsx bytes=42 appended=false"
        );
    }
}
