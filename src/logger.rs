use crate::models::CorpusStats;
use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;
use walkdir::WalkDir;

const LOG_PREFIX: &str = "session-";
const LOG_SUFFIX: &str = ".jsonl";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

/// One line of the session log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: String,
    pub timestamp: String,
    pub summary: ReportSummary,
    pub entries: Vec<LogEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub errors: usize,
    pub warnings: usize,
    pub corpus: CorpusStats,
}

#[derive(Default)]
struct LogState {
    writer: Option<BufWriter<File>>,
    entries: Vec<LogEntry>,
    errors: usize,
    warnings: usize,
}

impl LogState {
    fn record(&mut self, entry: LogEntry) {
        match entry.level {
            LogLevel::Error => self.errors += 1,
            LogLevel::Warning => self.warnings += 1,
            LogLevel::Info => {}
        }
        // A failed log write must not take the reader down with it.
        if let (Some(writer), Ok(line)) = (self.writer.as_mut(), serde_json::to_string(&entry)) {
            let _ = writeln!(writer, "{}", line);
        }
        self.entries.push(entry);
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// JSON-lines diagnostics for one reader session, written to
/// `<log_dir>/session-<id>.jsonl`. Clones share the file and the counters.
#[derive(Clone)]
pub struct DiagnosticLogger {
    log_dir: PathBuf,
    log_path: PathBuf,
    session_id: String,
    state: Arc<Mutex<LogState>>,
}

impl DiagnosticLogger {
    pub fn new(log_dir: &Path) -> Result<Self> {
        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {:?}", log_dir))?;

        let session_id = Utc::now().format("%Y%m%d-%H%M%S").to_string();
        let path = log_dir.join(format!("{}{}{}", LOG_PREFIX, session_id, LOG_SUFFIX));
        let file = File::create(&path)
            .with_context(|| format!("Failed to open session log: {:?}", path))?;

        Ok(DiagnosticLogger {
            log_dir: log_dir.to_path_buf(),
            log_path: path,
            session_id,
            state: Arc::new(Mutex::new(LogState {
                writer: Some(BufWriter::new(file)),
                ..Default::default()
            })),
        })
    }

    fn state(&self) -> MutexGuard<'_, LogState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>, context: Option<Value>) {
        self.state().record(LogEntry {
            timestamp: now(),
            level,
            message: message.into(),
            context,
        });
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message, None);
    }

    pub fn warning(&self, message: impl Into<String>, context: Option<Value>) {
        self.log(LogLevel::Warning, message, context);
    }

    pub fn error(&self, message: impl Into<String>, context: Option<Value>) {
        self.log(LogLevel::Error, message, context);
    }

    #[allow(dead_code)]
    pub fn warning_count(&self) -> usize {
        self.state().warnings
    }

    #[allow(dead_code)]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.state().entries.clone()
    }

    /// Flushes the log and summarizes the session against the active corpus.
    pub fn generate_report(&self, corpus: CorpusStats) -> Result<SessionReport> {
        let mut state = self.state();
        if let Some(writer) = state.writer.as_mut() {
            writer.flush().context("Failed to flush session log")?;
        }

        Ok(SessionReport {
            session_id: self.session_id.clone(),
            timestamp: now(),
            summary: ReportSummary {
                errors: state.errors,
                warnings: state.warnings,
                corpus,
            },
            entries: state.entries.clone(),
        })
    }

    /// Keeps the `keep` most recently modified session logs and deletes the
    /// rest. The live log always survives and counts toward `keep`; other
    /// files in the log directory are left alone.
    pub fn rotate_logs(&self, keep: usize) -> Result<()> {
        let mut logs: Vec<(SystemTime, PathBuf)> = WalkDir::new(&self.log_dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_session_log(e.path()))
            .filter(|e| e.path() != self.log_path)
            .filter_map(|e| {
                let modified = e.metadata().ok()?.modified().ok()?;
                Some((modified, e.into_path()))
            })
            .collect();

        let keep_older = keep.saturating_sub(1);
        if logs.len() <= keep_older {
            return Ok(());
        }

        logs.sort();
        let excess = logs.len() - keep_older;
        for (_, path) in logs.into_iter().take(excess) {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove stale session log: {:?}", path))?;
        }
        Ok(())
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

fn is_session_log(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(LOG_PREFIX) && name.ends_with(LOG_SUFFIX))
}

impl Drop for DiagnosticLogger {
    fn drop(&mut self) {
        if let Some(writer) = self.state().writer.as_mut() {
            let _ = writer.flush();
        }
    }
}
