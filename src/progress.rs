//! Search progress reporting.
//!
//! A full-text scan over the corpus can take a while, so the search driver
//! reports how many hits it has collected after every batch. Progress goes to
//! **stderr** so stdout stays parseable for scripts.

use std::io::Write;

/// A single progress event for a search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchProgressEvent {
    /// The scan has started.
    Scanning { query: String },
    /// `found` documents collected so far.
    Found { found: u64 },
    /// The scan finished with `found` documents.
    Done { found: u64 },
}

/// Receives progress events from the search driver.
///
/// Any `Fn(SearchProgressEvent)` closure is a reporter, so library callers can
/// pass a callback instead of implementing the trait.
pub trait SearchProgressReporter: Send + Sync {
    fn report(&self, event: SearchProgressEvent);
}

impl<F> SearchProgressReporter for F
where
    F: Fn(SearchProgressEvent) + Send + Sync,
{
    fn report(&self, event: SearchProgressEvent) {
        self(event)
    }
}

/// Human-friendly progress on stderr: "search  found 1,230 files so far...".
pub struct StderrProgress;

impl SearchProgressReporter for StderrProgress {
    fn report(&self, event: SearchProgressEvent) {
        let line = match &event {
            SearchProgressEvent::Scanning { query } => {
                format!("search  scanning for '{}'...\n", query)
            }
            SearchProgressEvent::Found { found } => {
                format!("search  found {} files so far...\n", format_number(*found))
            }
            SearchProgressEvent::Done { found } => {
                format!("search  done - {} files found\n", format_number(*found))
            }
        };
        let mut err = std::io::stderr().lock();
        let _ = err.write_all(line.as_bytes());
        let _ = err.flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl SearchProgressReporter for JsonProgress {
    fn report(&self, event: SearchProgressEvent) {
        let obj = match &event {
            SearchProgressEvent::Scanning { query } => serde_json::json!({
                "event": "progress",
                "phase": "scanning",
                "query": query
            }),
            SearchProgressEvent::Found { found } => serde_json::json!({
                "event": "progress",
                "phase": "found",
                "found": found
            }),
            SearchProgressEvent::Done { found } => serde_json::json!({
                "event": "progress",
                "phase": "done",
                "found": found
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let mut err = std::io::stderr().lock();
            let _ = writeln!(err, "{}", line);
            let _ = err.flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl SearchProgressReporter for NoProgress {
    fn report(&self, _event: SearchProgressEvent) {}
}

/// Format an integer with thousands separators.
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    pub fn reporter(&self) -> Box<dyn SearchProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
