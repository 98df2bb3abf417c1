// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Datelike, Local, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Monthly token accounting keyed by `"<provider>/<model>"`.
pub trait UsageLedger: Send + Sync {
    /// Open the backing store. Calling it again is a no-op.
    fn start(&self) -> Result<()>;

    fn insert_token_usage(&self, count: u64, model_key: &str) -> Result<()>;

    /// Sum of tokens recorded for `model_key` in the current calendar month.
    fn current_month_tokens_used(&self, model_key: &str) -> Result<u64>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageEntry {
    pub timestamp: DateTime<Utc>,
    pub year: i32,
    pub month: u32,
    pub tokens_used: u64,
    pub model: String,
}

/// Append-only JSON lines file, one [`UsageEntry`] per line.
pub struct FileLedger {
    path: PathBuf,
    writer: Mutex<Option<BufWriter<File>>>,
}

impl FileLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(None),
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "gitmit").map(|dirs| dirs.data_dir().join("usage.jsonl"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn writer(&self) -> MutexGuard<'_, Option<BufWriter<File>>> {
        self.writer.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Flush and release the file handle. `start` reopens it.
    pub fn close(&self) -> Result<()> {
        if let Some(mut writer) = self.writer().take() {
            writer.flush()?;
            debug!(path = %self.path.display(), "usage ledger closed");
        }
        Ok(())
    }

    pub fn tokens_used_in(&self, model_key: &str, year: i32, month: u32) -> Result<u64> {
        if let Some(writer) = self.writer().as_mut() {
            writer.flush()?;
        }

        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut total = 0;
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<UsageEntry>(&line) {
                Ok(entry) if entry.model == model_key && entry.year == year && entry.month == month => {
                    total += entry.tokens_used;
                }
                Ok(_) => {}
                Err(e) => warn!(line = index + 1, error = %e, "skipping malformed usage entry"),
            }
        }
        Ok(total)
    }
}

impl UsageLedger for FileLedger {
    fn start(&self) -> Result<()> {
        let mut writer = self.writer();
        if writer.is_some() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        *writer = Some(BufWriter::new(file));
        debug!(path = %self.path.display(), "usage ledger opened");
        Ok(())
    }

    fn insert_token_usage(&self, count: u64, model_key: &str) -> Result<()> {
        self.start()?;

        let now = Local::now();
        let entry = UsageEntry {
            timestamp: now.with_timezone(&Utc),
            year: now.year(),
            month: now.month(),
            tokens_used: count,
            model: model_key.to_string(),
        };
        let line = serde_json::to_string(&entry).map_err(|e| Error::Ledger(e.to_string()))?;

        let mut guard = self.writer();
        let writer = guard
            .as_mut()
            .ok_or_else(|| Error::Ledger("ledger is not open".into()))?;
        writeln!(writer, "{line}")?;
        writer.flush()?;

        debug!(tokens = count, model = model_key, "token usage recorded");
        Ok(())
    }

    fn current_month_tokens_used(&self, model_key: &str) -> Result<u64> {
        let now = Local::now();
        self.tokens_used_in(model_key, now.year(), now.month())
    }
}

impl Drop for FileLedger {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(error = %e, "failed to close usage ledger");
        }
    }
}
