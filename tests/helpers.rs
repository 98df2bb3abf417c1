// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use gitmit::domain::ChangeRecord;
use gitmit::error::{Error, Result};
use gitmit::services::generator::CommitPromptGenerator;
use gitmit::services::git::WorkingTree;
use gitmit::services::ignore::DEFAULT_IGNORE_FILE;
use gitmit::services::prompt::PromptBuilder;
use gitmit::services::templates::PromptTemplateStore;
use gitmit::services::usage::UsageLedger;

/// In-memory working tree. `None` content means the read (or diff) fails.
#[allow(dead_code)]
pub struct FakeTree {
    pub root: PathBuf,
    pub untracked: Vec<(String, Option<String>)>,
    pub modified: Vec<(String, Option<String>)>,
}

#[allow(dead_code)]
impl FakeTree {
    pub fn new() -> Self {
        Self::with_root(PathBuf::from("/nonexistent/gitmit-fake-tree"))
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            untracked: Vec::new(),
            modified: Vec::new(),
        }
    }

    pub fn untracked(mut self, name: &str, content: &str) -> Self {
        self.untracked.push((name.into(), Some(content.into())));
        self
    }

    pub fn unreadable(mut self, name: &str) -> Self {
        self.untracked.push((name.into(), None));
        self
    }

    pub fn modified(mut self, name: &str, diff: &str) -> Self {
        self.modified.push((name.into(), Some(diff.into())));
        self
    }

    pub fn broken_diff(mut self, name: &str) -> Self {
        self.modified.push((name.into(), None));
        self
    }
}

fn lookup(entries: &[(String, Option<String>)], path: &str) -> Result<String> {
    entries
        .iter()
        .find(|(name, _)| name == path)
        .and_then(|(_, content)| content.clone())
        .ok_or_else(|| Error::Git(format!("cannot read {path}")))
}

impl WorkingTree for FakeTree {
    fn root(&self) -> &Path {
        &self.root
    }

    fn untracked_paths(&self) -> Result<Vec<String>> {
        Ok(self.untracked.iter().map(|(n, _)| n.clone()).collect())
    }

    fn modified_paths(&self) -> Result<Vec<String>> {
        Ok(self.modified.iter().map(|(n, _)| n.clone()).collect())
    }

    fn read_file(&self, path: &str) -> Result<String> {
        lookup(&self.untracked, path)
    }

    fn diff_of(&self, path: &str) -> Result<String> {
        lookup(&self.modified, path)
    }
}

/// Ledger that keeps entries in memory and ignores the calendar.
#[allow(dead_code)]
#[derive(Default)]
pub struct MemoryLedger {
    pub entries: Mutex<Vec<(u64, String)>>,
    pub starts: AtomicUsize,
}

#[allow(dead_code)]
impl MemoryLedger {
    pub fn entries(&self) -> Vec<(u64, String)> {
        self.entries.lock().unwrap().clone()
    }
}

impl UsageLedger for MemoryLedger {
    fn start(&self) -> Result<()> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn insert_token_usage(&self, count: u64, model_key: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .push((count, model_key.to_string()));
        Ok(())
    }

    fn current_month_tokens_used(&self, model_key: &str) -> Result<u64> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, key)| key == model_key)
            .map(|(count, _)| count)
            .sum())
    }
}

/// Unified diff of one file with `added` and `removed` plain lines.
#[allow(dead_code)]
pub fn make_diff(name: &str, added: usize, removed: usize) -> String {
    let mut lines = vec![
        format!("diff --git a/{name} b/{name}"),
        format!("--- a/{name}"),
        format!("+++ b/{name}"),
        format!("@@ -1,{removed} +1,{added} @@"),
    ];
    lines.extend((0..removed).map(|i| format!("-old value {i}")));
    lines.extend((0..added).map(|i| format!("+new value {i}")));
    lines.join("\n")
}

/// New file content with `lines` plain lines.
#[allow(dead_code)]
pub fn make_content(lines: usize) -> String {
    (0..lines).map(|i| format!("line {i}\n")).collect()
}

#[allow(dead_code)]
pub fn new_record(name: &str, lines: usize) -> ChangeRecord {
    ChangeRecord::new(name, make_content(lines))
}

#[allow(dead_code)]
pub fn modified_record(name: &str, added: usize, removed: usize) -> ChangeRecord {
    ChangeRecord::modified(name, make_diff(name, added, removed))
}

#[allow(dead_code)]
pub fn bundled_generator() -> CommitPromptGenerator {
    CommitPromptGenerator::new(
        PromptBuilder::new(PromptTemplateStore::bundled(None)),
        DEFAULT_IGNORE_FILE,
    )
}
