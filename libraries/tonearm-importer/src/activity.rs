//! Append-only activity log
//!
//! Records one `status path` line per notable decision (`asis`, `skip`,
//! `duplicate`) so an operator can review what a long import did and why
//! directories were left untagged.

use std::fmt;
use std::io::Write;
use std::path::Path;

pub struct ActivityLog {
    sink: Box<dyn Write + Send>,
}

impl ActivityLog {
    pub fn new(sink: Box<dyn Write + Send>) -> Self {
        Self { sink }
    }

    /// Record a status line. Log failures never interrupt the import.
    pub fn record(&mut self, status: &str, path: &Path) {
        let _ = writeln!(self.sink, "{} {}", status, path.display());
    }
}

impl fmt::Debug for ActivityLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivityLog").finish_non_exhaustive()
    }
}
