// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

/// Content stored for new files that cannot be read as text.
pub const UNREADABLE_CONTENT: &str = "<unknown>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Untracked file, content is the full file text
    New,
    /// Tracked file changed since HEAD, content is a unified diff
    Modified,
}

impl ChangeKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::New => "untracked",
            Self::Modified => "modified",
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub name: String,
    pub content: String,
    pub kind: ChangeKind,
}

impl ChangeRecord {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            kind: ChangeKind::New,
        }
    }

    pub fn modified(name: impl Into<String>, diff: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: diff.into(),
            kind: ChangeKind::Modified,
        }
    }

    pub fn is_new(&self) -> bool {
        self.kind == ChangeKind::New
    }
}

/// Facts derived from a single [`ChangeRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileAnalysis {
    pub filename: String,
    pub is_new: bool,
    pub lines_added: usize,
    pub lines_removed: usize,
    pub is_config: bool,
    pub is_test: bool,
    pub is_doc: bool,
    pub is_dependency: bool,
    pub has_function_changes: bool,
    pub has_class_changes: bool,
    pub rename_only: bool,
}

impl FileAnalysis {
    pub fn total_changes(&self) -> usize {
        self.lines_added + self.lines_removed
    }

    pub fn net_changes(&self) -> i64 {
        self.lines_added as i64 - self.lines_removed as i64
    }

    pub fn has_structural_changes(&self) -> bool {
        self.has_function_changes || self.has_class_changes
    }
}
