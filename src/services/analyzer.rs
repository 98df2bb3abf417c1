// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use std::sync::LazyLock;

use regex::{Regex, RegexSet};

use crate::domain::{
    ChangeAnalysis, ChangeCategory, ChangeKind, ChangeMagnitude, ChangeRecord, CommitType,
    FileAnalysis,
};

// Rename heuristic: small, balanced edits on both sides. Tunable.
const RENAME_MAX_LINES: usize = 10;
const RENAME_MIN_RATIO: f64 = 0.7;

// One side must exceed the other by this factor to dominate a mixed change set.
const DOMINANCE_FACTOR: usize = 2;

const HINT_FILE_LIMIT: usize = 5;

fn filename_set(patterns: &[&str]) -> RegexSet {
    RegexSet::new(patterns.iter().map(|p| format!("(?i){p}"))).unwrap()
}

static CONFIG_FILES: LazyLock<RegexSet> = LazyLock::new(|| {
    filename_set(&[
        r"\.json$",
        r"\.ya?ml$",
        r"\.toml$",
        r"\.ini$",
        r"\.cfg$",
        r"\.env",
        r"Makefile$",
        r"Dockerfile$",
        r"\.conf$",
        r"pyproject\.toml$",
        r"setup\.py$",
        r"setup\.cfg$",
        r"tsconfig\.json$",
        r"package\.json$",
        r"\.eslintrc",
        r"\.prettierrc",
        r"\.gitignore$",
        r"\.dockerignore$",
    ])
});

static TEST_FILES: LazyLock<RegexSet> = LazyLock::new(|| {
    filename_set(&[
        r"test[_/]",
        r"_test\.py$",
        r"\.test\.[jt]sx?$",
        r"spec[_/]",
        r"\.spec\.[jt]sx?$",
        r"__tests__/",
        r"tests?\.py$",
        r"conftest\.py$",
    ])
});

static DOC_FILES: LazyLock<RegexSet> = LazyLock::new(|| {
    filename_set(&[
        r"README",
        r"CHANGELOG",
        r"LICENSE",
        r"CONTRIBUTING",
        r"\.md$",
        r"\.rst$",
        r"\.txt$",
        r"docs?/",
        r"\.adoc$",
    ])
});

static DEPENDENCY_FILES: LazyLock<RegexSet> = LazyLock::new(|| {
    filename_set(&[
        r"requirements.*\.txt$",
        r"Pipfile",
        r"poetry\.lock$",
        r"package-lock\.json$",
        r"yarn\.lock$",
        r"pnpm-lock\.yaml$",
        r"go\.mod$",
        r"go\.sum$",
        r"Cargo\.toml$",
        r"Cargo\.lock$",
        r"Gemfile",
        r"composer\.json$",
        r"composer\.lock$",
    ])
});

const FUNCTION_DECL: &str = r"(def |async def |function |const \w+ = \(|const \w+ = async|export (default )?(function|const)|(pub(\([\w:]+\))? )?(async )?fn \w+|func )";
const CLASS_DECL: &str = r"(class \w+|export (default )?class|(pub(\([\w:]+\))? )?(struct|enum|trait) \w+)";

// Declarations anywhere in a full file
static FUNCTION_IN_CONTENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?m)^\s*{FUNCTION_DECL}")).unwrap());
static CLASS_IN_CONTENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?m)^\s*{CLASS_DECL}")).unwrap());

// Declarations on added or removed diff lines
static FUNCTION_IN_DIFF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?m)^[+-]\s*{FUNCTION_DECL}")).unwrap());
static CLASS_IN_DIFF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?m)^[+-]\s*{CLASS_DECL}")).unwrap());

/// Deterministic, I/O-free classification of a change set.
pub struct ChangeAnalyzer;

impl ChangeAnalyzer {
    pub fn analyze(records: &[ChangeRecord]) -> ChangeAnalysis {
        let file_analyses: Vec<FileAnalysis> = records.iter().map(Self::analyze_file).collect();

        let magnitude = Self::magnitude(&file_analyses);
        let category = Self::category(&file_analyses);
        let suggested_types = Self::suggest_types(&file_analyses, category);
        let warnings = Self::warnings(&file_analyses, magnitude);
        let context_hints = Self::context_hints(&file_analyses);

        let new_files_count = file_analyses.iter().filter(|a| a.is_new).count();

        ChangeAnalysis {
            magnitude,
            category,
            total_files: file_analyses.len(),
            new_files_count,
            modified_files_count: file_analyses.len() - new_files_count,
            total_lines_added: file_analyses.iter().map(|a| a.lines_added).sum(),
            total_lines_removed: file_analyses.iter().map(|a| a.lines_removed).sum(),
            file_analyses,
            suggested_types,
            warnings,
            context_hints,
        }
    }

    pub fn analyze_file(record: &ChangeRecord) -> FileAnalysis {
        let mut analysis = FileAnalysis {
            filename: record.name.clone(),
            is_new: record.is_new(),
            is_config: CONFIG_FILES.is_match(&record.name),
            is_test: TEST_FILES.is_match(&record.name),
            is_doc: DOC_FILES.is_match(&record.name),
            is_dependency: DEPENDENCY_FILES.is_match(&record.name),
            ..FileAnalysis::default()
        };

        match record.kind {
            ChangeKind::New => {
                analysis.lines_added = Self::count_lines(&record.content);
                analysis.has_function_changes = FUNCTION_IN_CONTENT.is_match(&record.content);
                analysis.has_class_changes = CLASS_IN_CONTENT.is_match(&record.content);
            }
            ChangeKind::Modified => {
                let (added, removed) = Self::count_changes(&record.content);
                analysis.lines_added = added;
                analysis.lines_removed = removed;
                analysis.has_function_changes = FUNCTION_IN_DIFF.is_match(&record.content);
                analysis.has_class_changes = CLASS_IN_DIFF.is_match(&record.content);
                analysis.rename_only = Self::is_rename_like(added, removed);
            }
        }

        analysis
    }

    fn count_lines(content: &str) -> usize {
        let newlines = content.matches('\n').count();
        if !content.is_empty() && !content.ends_with('\n') {
            newlines + 1
        } else {
            newlines
        }
    }

    fn count_changes(diff: &str) -> (usize, usize) {
        let mut additions = 0;
        let mut deletions = 0;

        for line in diff.lines() {
            if line.starts_with('+') && !line.starts_with("+++") {
                additions += 1;
            } else if line.starts_with('-') && !line.starts_with("---") {
                deletions += 1;
            }
        }

        (additions, deletions)
    }

    /// Balanced small edits usually mean an identifier was renamed.
    pub fn is_rename_like(added: usize, removed: usize) -> bool {
        if added == 0 || removed == 0 {
            return false;
        }
        if added > RENAME_MAX_LINES || removed > RENAME_MAX_LINES {
            return false;
        }
        let ratio = added.min(removed) as f64 / added.max(removed) as f64;
        ratio > RENAME_MIN_RATIO
    }

    fn magnitude(analyses: &[FileAnalysis]) -> ChangeMagnitude {
        if analyses.is_empty() {
            return ChangeMagnitude::Trivial;
        }

        let files = analyses.len();
        let total: usize = analyses.iter().map(FileAnalysis::total_changes).sum();
        let structural = analyses.iter().any(FileAnalysis::has_structural_changes);
        let all_rename = analyses
            .iter()
            .filter(|a| !a.is_new)
            .all(|a| a.rename_only);

        if files == 1 && total <= 5 && (all_rename || !structural) {
            ChangeMagnitude::Trivial
        } else if total <= 30 && files <= 2 {
            ChangeMagnitude::Small
        } else if total <= 150 && files <= 5 {
            ChangeMagnitude::Medium
        } else if total <= 500 && files <= 15 {
            ChangeMagnitude::Large
        } else {
            ChangeMagnitude::Major
        }
    }

    fn category(analyses: &[FileAnalysis]) -> ChangeCategory {
        if analyses.is_empty() {
            return ChangeCategory::Modifications;
        }

        let (new_files, modified): (Vec<&FileAnalysis>, Vec<&FileAnalysis>) =
            analyses.iter().partition(|a| a.is_new);

        if analyses.iter().all(|a| a.is_test) {
            return ChangeCategory::Tests;
        }
        if analyses.iter().all(|a| a.is_doc) {
            return ChangeCategory::Documentation;
        }
        if analyses.iter().all(|a| a.is_config) {
            return ChangeCategory::Config;
        }
        if analyses.iter().all(|a| a.is_dependency) {
            return ChangeCategory::Dependencies;
        }
        if new_files.is_empty() && !modified.is_empty() && modified.iter().all(|a| a.rename_only)
        {
            return ChangeCategory::RenameRefactor;
        }

        let added: usize = analyses.iter().map(|a| a.lines_added).sum();
        let removed: usize = analyses.iter().map(|a| a.lines_removed).sum();
        if new_files.is_empty() && removed > added * DOMINANCE_FACTOR {
            return ChangeCategory::Deletions;
        }

        match (new_files.is_empty(), modified.is_empty()) {
            (false, false) => {
                let new_lines: usize = new_files.iter().map(|a| a.lines_added).sum();
                let mod_lines: usize = modified.iter().map(|a| a.total_changes()).sum();
                if new_lines > mod_lines * DOMINANCE_FACTOR {
                    ChangeCategory::NewFiles
                } else if mod_lines > new_lines * DOMINANCE_FACTOR {
                    ChangeCategory::Modifications
                } else {
                    ChangeCategory::Mixed
                }
            }
            (false, true) => ChangeCategory::NewFiles,
            _ => ChangeCategory::Modifications,
        }
    }

    fn suggest_types(analyses: &[FileAnalysis], category: ChangeCategory) -> Vec<CommitType> {
        let mut types: Vec<CommitType> = match category {
            ChangeCategory::Tests => vec![CommitType::Test],
            ChangeCategory::Documentation => vec![CommitType::Docs],
            ChangeCategory::Config => vec![CommitType::Chore, CommitType::Build, CommitType::Ci],
            ChangeCategory::Dependencies => vec![
                CommitType::Dependencies,
                CommitType::DevDependencies,
                CommitType::PeerDependencies,
            ],
            ChangeCategory::RenameRefactor => vec![CommitType::Refactor, CommitType::Style],
            ChangeCategory::Deletions => vec![CommitType::Refactor, CommitType::Chore],
            _ => Vec::new(),
        };

        let new_functions = analyses.iter().any(|a| a.is_new && a.has_function_changes);
        let new_classes = analyses.iter().any(|a| a.is_new && a.has_class_changes);
        let modified_functions = analyses
            .iter()
            .any(|a| !a.is_new && a.has_function_changes);

        if new_classes || (new_functions && category == ChangeCategory::NewFiles) {
            types.insert(0, CommitType::Feat);
        }

        if modified_functions && category == ChangeCategory::Modifications {
            types.insert(0, CommitType::Enhancement);
            types.push(CommitType::Refactor);
        }

        if types.is_empty() {
            types = if category == ChangeCategory::NewFiles {
                vec![CommitType::Feat, CommitType::Chore]
            } else {
                vec![CommitType::Enhancement, CommitType::Refactor, CommitType::Chore]
            };
        }

        let mut seen = Vec::with_capacity(types.len());
        types.retain(|t| {
            if seen.contains(t) {
                false
            } else {
                seen.push(*t);
                true
            }
        });
        types
    }

    fn warnings(analyses: &[FileAnalysis], magnitude: ChangeMagnitude) -> Vec<String> {
        let mut warnings = Vec::new();

        if magnitude == ChangeMagnitude::Trivial {
            warnings.push(
                "This is a TRIVIAL change. Do NOT use 'feat' unless explicitly requested. \
                 Consider: style, refactor, chore, or docs."
                    .to_string(),
            );
        }

        let renamed: Vec<&str> = analyses
            .iter()
            .filter(|a| a.rename_only)
            .map(|a| a.filename.as_str())
            .collect();
        if !renamed.is_empty() {
            warnings.push(format!(
                "Files with rename-like patterns detected: {renamed:?}. \
                 Consider 'refactor' or 'style' instead of 'feat'."
            ));
        }

        if !analyses.is_empty() && analyses.iter().all(|a| a.is_test) {
            warnings.push("All changes are in test files. Use 'test' commit type.".to_string());
        }

        if !analyses.is_empty() && analyses.iter().all(|a| a.is_config) {
            warnings.push(
                "All changes are in configuration files. Consider 'chore', 'build', or 'ci'."
                    .to_string(),
            );
        }

        warnings
    }

    fn context_hints(analyses: &[FileAnalysis]) -> Vec<String> {
        let mut hints = Vec::new();

        let new_files: Vec<&str> = analyses
            .iter()
            .filter(|a| a.is_new)
            .map(|a| a.filename.as_str())
            .collect();
        let modified: Vec<&str> = analyses
            .iter()
            .filter(|a| !a.is_new)
            .map(|a| a.filename.as_str())
            .collect();

        if !new_files.is_empty() {
            hints.push(format!("New files: {}", Self::file_list(&new_files)));
        }
        if !modified.is_empty() {
            hints.push(format!("Modified files: {}", Self::file_list(&modified)));
        }

        let structural = analyses
            .iter()
            .filter(|a| a.has_structural_changes())
            .count();
        if structural > 0 {
            hints.push(format!(
                "Files with structural changes (classes/functions): {structural}"
            ));
        }

        hints
    }

    fn file_list(names: &[&str]) -> String {
        let shown = names[..names.len().min(HINT_FILE_LIMIT)].join(", ");
        if names.len() > HINT_FILE_LIMIT {
            format!("{shown} (+{} more)", names.len() - HINT_FILE_LIMIT)
        } else {
            shown
        }
    }
}
