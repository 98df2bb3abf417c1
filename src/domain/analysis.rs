// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use super::{CommitType, FileAnalysis};

/// Coarse size of a change set, used to pick the prompt template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChangeMagnitude {
    Trivial,
    Small,
    Medium,
    Large,
    Major,
}

impl ChangeMagnitude {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trivial => "trivial",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Major => "major",
        }
    }
}

impl std::fmt::Display for ChangeMagnitude {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primary shape of a change set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeCategory {
    NewFiles,
    Modifications,
    Mixed,
    Deletions,
    RenameRefactor,
    Config,
    Documentation,
    Tests,
    Dependencies,
}

impl ChangeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewFiles => "new_files",
            Self::Modifications => "modifications",
            Self::Mixed => "mixed",
            Self::Deletions => "deletions",
            Self::RenameRefactor => "rename_refactor",
            Self::Config => "config",
            Self::Documentation => "documentation",
            Self::Tests => "tests",
            Self::Dependencies => "dependencies",
        }
    }
}

impl std::fmt::Display for ChangeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeAnalysis {
    pub magnitude: ChangeMagnitude,
    pub category: ChangeCategory,
    pub total_files: usize,
    pub new_files_count: usize,
    pub modified_files_count: usize,
    pub total_lines_added: usize,
    pub total_lines_removed: usize,
    pub file_analyses: Vec<FileAnalysis>,
    /// Best candidate first, no duplicates
    pub suggested_types: Vec<CommitType>,
    pub warnings: Vec<String>,
    pub context_hints: Vec<String>,
}

impl ChangeAnalysis {
    /// Stand-in used when prompting from a natural-language resume, where no
    /// per-file data exists.
    pub fn placeholder() -> Self {
        Self {
            magnitude: ChangeMagnitude::Medium,
            category: ChangeCategory::Mixed,
            total_files: 0,
            new_files_count: 0,
            modified_files_count: 0,
            total_lines_added: 0,
            total_lines_removed: 0,
            file_analyses: Vec::new(),
            suggested_types: Vec::new(),
            warnings: Vec::new(),
            context_hints: Vec::new(),
        }
    }

    pub fn net_changes(&self) -> i64 {
        self.total_lines_added as i64 - self.total_lines_removed as i64
    }

    /// Render the verdict as the grounding block embedded in user prompts.
    pub fn to_context_string(&self) -> String {
        let mut lines = vec![
            format!(
                "CHANGE MAGNITUDE: {}",
                self.magnitude.as_str().to_uppercase()
            ),
            format!(
                "CHANGE CATEGORY: {}",
                self.category.as_str().to_uppercase()
            ),
            format!(
                "FILES: {} total ({} new, {} modified)",
                self.total_files, self.new_files_count, self.modified_files_count
            ),
            format!(
                "LINES: +{} -{} (net: {:+})",
                self.total_lines_added,
                self.total_lines_removed,
                self.net_changes()
            ),
        ];

        if !self.suggested_types.is_empty() {
            let types: Vec<&str> = self.suggested_types.iter().map(|t| t.as_str()).collect();
            lines.push(format!("SUGGESTED TYPES: {}", types.join(", ")));
        }

        if !self.warnings.is_empty() {
            lines.push("WARNINGS:".into());
            for warning in &self.warnings {
                lines.push(format!("  ⚠️ {warning}"));
            }
        }

        if !self.context_hints.is_empty() {
            lines.push("CONTEXT HINTS:".into());
            for hint in &self.context_hints {
                lines.push(format!("  • {hint}"));
            }
        }

        lines.join("\n")
    }
}
