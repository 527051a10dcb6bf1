//! Simulator flow-file writer
//!
//! The simulator reads flows in this format:
//!
//! ```text
//! # flow source, destination, priority group, destination port, size (bytes), start time (s)
//! # src dst pg dport size start_time
//! 2
//! 0 3 3 100 1460 2.000001234
//! 2 1 3 100 52000 2.000002001
//! ```
//!
//! The third line holds the number of flows that follow, which is only known
//! once generation ends. Writing therefore happens in two phases:
//!
//! 1. Flow lines stream into a scratch file next to the destination (`<path>.body`).
//! 2. [`TraceWriter::finish`] writes the header and the final count into
//!    `<path>.tmp`, appends the body, and renames the result over `<path>`.
//!
//! A writer dropped before `finish` removes its scratch files, so a trace with
//! a wrong count never appears at the destination.

use crate::generator::FlowEvent;
use crate::Result;
use anyhow::Context;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Priority group written for every flow
pub const PRIORITY_CLASS: u32 = 3;

/// Destination port written for every flow
pub const DST_PORT: u32 = 100;

/// Comment lines at the top of every trace
pub const HEADER: [&str; 2] = [
    "# flow source, destination, priority group, destination port, size (bytes), start time (s)",
    "# src dst pg dport size start_time",
];

/// Render one flow line (without trailing newline)
pub fn format_event(event: &FlowEvent) -> String {
    format!(
        "{} {} {} {} {} {}",
        event.src,
        event.dst,
        PRIORITY_CLASS,
        DST_PORT,
        event.size,
        event.start_time()
    )
}

/// Two-phase trace writer
pub struct TraceWriter {
    path: PathBuf,
    body_path: PathBuf,
    tmp_path: PathBuf,
    body: Option<BufWriter<File>>,
    count: u64,
    finished: bool,
}

impl TraceWriter {
    /// Start a trace at `path`, creating its parent directory if needed
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
        }

        let body_path = with_suffix(path, ".body");
        let body = File::create(&body_path)
            .with_context(|| format!("Failed to create scratch file: {}", body_path.display()))?;

        Ok(Self {
            path: path.to_path_buf(),
            tmp_path: with_suffix(path, ".tmp"),
            body_path,
            body: Some(BufWriter::new(body)),
            count: 0,
            finished: false,
        })
    }

    /// Append one flow
    pub fn write_event(&mut self, event: &FlowEvent) -> Result<()> {
        let body = self
            .body
            .as_mut()
            .context("trace writer already finished")?;
        writeln!(body, "{}", format_event(event))?;
        self.count += 1;
        Ok(())
    }

    /// Flows written so far
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Destination path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write header and final count, publish the trace, and return the count
    pub fn finish(mut self) -> Result<u64> {
        if let Some(mut body) = self.body.take() {
            body.flush()?;
        }

        {
            let mut out = BufWriter::new(
                File::create(&self.tmp_path)
                    .with_context(|| format!("Failed to create {}", self.tmp_path.display()))?,
            );
            for line in HEADER {
                writeln!(out, "{}", line)?;
            }
            writeln!(out, "{}", self.count)?;

            let mut body = File::open(&self.body_path)
                .with_context(|| format!("Failed to reopen {}", self.body_path.display()))?;
            io::copy(&mut body, &mut out)?;
            out.flush()?;
        }

        fs::rename(&self.tmp_path, &self.path)
            .with_context(|| format!("Failed to move trace into place: {}", self.path.display()))?;
        fs::remove_file(&self.body_path)?;

        self.finished = true;
        Ok(self.count)
    }
}

impl Drop for TraceWriter {
    fn drop(&mut self) {
        if !self.finished {
            self.body.take();
            let _ = fs::remove_file(&self.body_path);
            let _ = fs::remove_file(&self.tmp_path);
        }
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
