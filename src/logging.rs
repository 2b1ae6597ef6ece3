//! Tracing subscriber setup.
//!
//! Console output always goes to stderr because stdout carries the stdio
//! transport. A JSON log file per run is written into the log directory
//! unless disabled. Files roll over at a size limit, and old files are
//! pruned by count and age.

use crate::error::Result;
use crate::info::APP_NAME;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

/// Default size at which a log file is rolled over (100 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;
/// Default number of old log files kept besides the active one.
pub const DEFAULT_MAX_FILES: usize = 10;
/// Default age after which log files are deleted (30 days).
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Log file rotation and retention policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRetention {
    /// Roll over to a new file once the active one reaches this many bytes
    pub max_file_size: u64,
    /// Old log files kept besides the active one
    pub max_files: usize,
    /// Log files last modified longer ago than this are deleted
    pub max_age: Duration,
}

impl Default for LogRetention {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_files: DEFAULT_MAX_FILES,
            max_age: DEFAULT_MAX_AGE,
        }
    }
}

/// Logging options resolved from the command line and configuration.
#[derive(Debug, Clone)]
pub struct LogSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Debug level plus source locations
    pub verbose: bool,
    /// JSON console output
    pub json: bool,
    /// Directory for per-run log files; `None` disables file logging
    pub log_dir: Option<PathBuf>,
    pub retention: LogRetention,
}

impl LogSettings {
    /// Effective filter directive.
    pub fn filter_directive(&self) -> &str {
        if self.verbose { "debug" } else { &self.level }
    }
}

/// Default log directory: `~/.taskbridge-mcp/logs`.
pub fn default_log_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(format!(".{}", APP_NAME)).join("logs"))
}

/// Log file name for a run started now: `taskbridge-mcp-<YYYYmmddHHMMSS>.log`.
pub fn log_file_name() -> String {
    format!(
        "{}-{}.log",
        APP_NAME,
        chrono::Local::now().format("%Y%m%d%H%M%S")
    )
}

fn is_log_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(&format!("{}-", APP_NAME)) && name.ends_with(".log"))
}

/// Delete log files in `dir` that are older than `max_age`, then all but
/// the `max_files` most recently modified. `active` is never deleted and
/// does not count towards the limit. Other files are left alone.
///
/// Returns the deleted paths.
pub fn prune_log_files(
    dir: &Path,
    retention: &LogRetention,
    active: Option<&Path>,
) -> io::Result<Vec<PathBuf>> {
    let now = SystemTime::now();
    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || !is_log_file(&path) || Some(path.as_path()) == active {
            continue;
        }
        let modified = fs::metadata(&path)?.modified()?;
        candidates.push((modified, path));
    }

    // newest first
    candidates.sort_by(|a, b| b.0.cmp(&a.0));

    let mut removed = Vec::new();
    for (index, (modified, path)) in candidates.into_iter().enumerate() {
        let age = now.duration_since(modified).unwrap_or_default();
        if index >= retention.max_files || age > retention.max_age {
            fs::remove_file(&path)?;
            removed.push(path);
        }
    }
    Ok(removed)
}

/// Log file writer that rolls over to a new file at a size limit.
///
/// Roll-over files share the run's base name with a sequence suffix:
/// `taskbridge-mcp-<timestamp>.1.log`, `.2.log`, ...
#[derive(Debug)]
pub struct RotatingFile {
    dir: PathBuf,
    stem: String,
    retention: LogRetention,
    path: PathBuf,
    file: File,
    written: u64,
    sequence: u32,
}

impl RotatingFile {
    /// Create the log directory, prune old files and open a fresh log file.
    pub fn create(dir: &Path, retention: LogRetention) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let name = log_file_name();
        let stem = name.trim_end_matches(".log").to_string();
        let path = dir.join(&name);
        let file = File::create(&path)?;
        prune_log_files(dir, &retention, Some(&path))?;

        Ok(Self {
            dir: dir.to_path_buf(),
            stem,
            retention,
            path,
            file,
            written: 0,
            sequence: 0,
        })
    }

    /// Path of the file currently written to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        self.sequence += 1;
        let path = self.dir.join(format!("{}.{}.log", self.stem, self.sequence));
        self.file = File::create(&path)?;
        self.path = path;
        self.written = 0;
        prune_log_files(&self.dir, &self.retention, Some(&self.path))?;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.retention.max_file_size {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Initialize the tracing subscriber for logging.
///
/// Returns the path of the log file, if one was created.
pub fn init_tracing(settings: &LogSettings) -> Result<Option<PathBuf>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.filter_directive()));

    let console = if settings.json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(settings.verbose)
            .with_line_number(settings.verbose)
            .boxed()
    };

    let (log_path, file_layer) = match &settings.log_dir {
        Some(dir) => {
            let file = RotatingFile::create(dir, settings.retention)?;
            let path = file.path().to_path_buf();
            let layer = fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .boxed();
            (Some(path), Some(layer))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .init();

    Ok(log_path)
}
