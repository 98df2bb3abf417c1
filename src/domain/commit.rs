// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommitType {
    Feat,
    Bugfix,
    Docs,
    Style,
    Refactor,
    Perf,
    Enhancement,
    Test,
    Lint,
    Build,
    Ci,
    Chore,
    Revert,
    Dependencies,
    PeerDependencies,
    DevDependencies,
    Metadata,
    Version,
    Security,
    Hotfix,
    Review,
    Other,
}

/// Static description of a commit type, shown to the user and the model.
#[derive(Debug, Clone, Copy)]
pub struct CommitTypeInfo {
    pub commit_type: CommitType,
    pub emoji: &'static str,
    pub meaning: &'static str,
    pub title: &'static str,
}

const fn info(
    commit_type: CommitType,
    emoji: &'static str,
    title: &'static str,
    meaning: &'static str,
) -> CommitTypeInfo {
    CommitTypeInfo {
        commit_type,
        emoji,
        meaning,
        title,
    }
}

/// Ordered catalog embedded in the system prompt.
pub const COMMIT_TYPES: [CommitTypeInfo; 22] = [
    info(
        CommitType::Feat,
        "✨",
        "Feature",
        "Use this when introducing a new feature that changes or adds functionality from the user's perspective.",
    ),
    info(
        CommitType::Bugfix,
        "🐞",
        "Bugfix",
        "Use this when fixing an issue or bug. This typically addresses flaws in logic or unintended behavior.",
    ),
    info(
        CommitType::Docs,
        "📚",
        "Documentation",
        "Use this when adding or improving documentation (e.g., README, comments, or any form of project documentation).",
    ),
    info(
        CommitType::Style,
        "💎",
        "Style",
        "Use this when making purely stylistic changes that do not affect code behavior (formatting, indentation, etc.).",
    ),
    info(
        CommitType::Refactor,
        "📦",
        "Refactor",
        "Use this when restructuring or reorganizing the code without altering its external behavior.",
    ),
    info(
        CommitType::Perf,
        "🐎",
        "Performance",
        "Use this when improving performance, optimizing code, or reducing resource usage.",
    ),
    info(
        CommitType::Enhancement,
        "♻️",
        "Enhancement",
        "Use this when making minor improvements to existing functionality that are not fixes or new features.",
    ),
    info(
        CommitType::Test,
        "✅",
        "Test",
        "Use this when adding or updating tests.",
    ),
    info(
        CommitType::Lint,
        "🚨",
        "Lint",
        "Use this when fixing or adjusting linter, compiler warnings, or related code-quality checks.",
    ),
    info(
        CommitType::Build,
        "🔧",
        "Build",
        "Use this when making changes to the build process or external dependencies that affect the build system.",
    ),
    info(
        CommitType::Ci,
        "⚙️",
        "CI",
        "Use this when modifying CI configuration or scripts (e.g., GitHub Actions, Jenkins, CircleCI).",
    ),
    info(
        CommitType::Chore,
        "♻️",
        "Chore",
        "Use this when performing general maintenance tasks that do not affect source or test files directly (e.g., package updates, minor config changes).",
    ),
    info(
        CommitType::Revert,
        "⏪",
        "Revert",
        "Use this when reverting a previous commit.",
    ),
    info(
        CommitType::Dependencies,
        "⏫",
        "Dependencies",
        "Use this when updating or modifying production dependencies.",
    ),
    info(
        CommitType::PeerDependencies,
        "⏫",
        "Peer Dependencies",
        "Use this when updating or changing peer dependencies (often relevant for libraries/plugins).",
    ),
    info(
        CommitType::DevDependencies,
        "⏫",
        "Dev Dependencies",
        "Use this when updating or modifying development dependencies (testing, linting, building, etc.).",
    ),
    info(
        CommitType::Metadata,
        "📇",
        "Metadata",
        "Use this when updating metadata like project settings, documentation metadata, or repository information.",
    ),
    info(
        CommitType::Version,
        "🔖",
        "Version",
        "Use this when bumping or modifying version numbers.",
    ),
    info(
        CommitType::Security,
        "🔒",
        "Security",
        "Use this when addressing security vulnerabilities or implementing security-related fixes.",
    ),
    info(
        CommitType::Hotfix,
        "🚑",
        "Hotfix",
        "Use this for urgent or high-priority fixes addressing critical issues in production.",
    ),
    info(
        CommitType::Review,
        "👌",
        "Review",
        "Use this when reviewing code, merging PRs, or making changes based on code reviews.",
    ),
    info(
        CommitType::Other,
        "🧱",
        "Other",
        "Use this for any commit that does not fit into the other categories.",
    ),
];

impl CommitType {
    pub const ALL: &'static [&'static str] = &[
        "feat",
        "bugfix",
        "docs",
        "style",
        "refactor",
        "perf",
        "enhancement",
        "test",
        "lint",
        "build",
        "ci",
        "chore",
        "revert",
        "dependencies",
        "peerDependencies",
        "devDependencies",
        "metadata",
        "version",
        "security",
        "hotfix",
        "review",
        "other",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feat => "feat",
            Self::Bugfix => "bugfix",
            Self::Docs => "docs",
            Self::Style => "style",
            Self::Refactor => "refactor",
            Self::Perf => "perf",
            Self::Enhancement => "enhancement",
            Self::Test => "test",
            Self::Lint => "lint",
            Self::Build => "build",
            Self::Ci => "ci",
            Self::Chore => "chore",
            Self::Revert => "revert",
            Self::Dependencies => "dependencies",
            Self::PeerDependencies => "peerDependencies",
            Self::DevDependencies => "devDependencies",
            Self::Metadata => "metadata",
            Self::Version => "version",
            Self::Security => "security",
            Self::Hotfix => "hotfix",
            Self::Review => "review",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        COMMIT_TYPES
            .iter()
            .map(|i| i.commit_type)
            .find(|t| t.as_str() == s)
    }

    pub fn info(&self) -> &'static CommitTypeInfo {
        // COMMIT_TYPES lists every variant in declaration order
        &COMMIT_TYPES[*self as usize]
    }

    /// Render the catalog as the `type;meaning` block used in system prompts.
    pub fn catalog_csv() -> String {
        let rows: Vec<String> = COMMIT_TYPES
            .iter()
            .map(|i| format!("{};{}", i.commit_type.as_str(), i.meaning))
            .collect();
        format!("type;meaning\n{}", rows.join("\n"))
    }
}

impl std::fmt::Display for CommitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured commit message returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMessage {
    #[serde(rename = "type")]
    pub commit_type: CommitType,
    pub scope: String,
    pub short_description: String,
    pub description: String,
    pub reason: String,
}

impl CommitMessage {
    /// `<emoji> <type>(<scope>): <title>` followed by the body.
    pub fn format(&self) -> String {
        let header = format!(
            "{} {}({}): {}",
            self.commit_type.info().emoji,
            self.commit_type.as_str(),
            self.scope.trim(),
            self.short_description.trim()
        );

        let body = self.description.trim();
        if body.is_empty() {
            header
        } else {
            format!("{header}\n\n{body}")
        }
    }

    /// JSON schema handed to backends that support constrained output.
    pub fn json_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "type": { "type": "string", "enum": CommitType::ALL },
                "scope": { "type": "string" },
                "short_description": { "type": "string" },
                "description": { "type": "string" },
                "reason": { "type": "string" }
            },
            "required": ["type", "scope", "short_description", "description", "reason"]
        })
    }
}
