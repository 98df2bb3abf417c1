// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use console::style;
use tracing::debug;

use crate::domain::{ChangeAnalysis, ChangeRecord, CommitType, PromptPair};
use crate::error::Result;
use crate::services::analyzer::ChangeAnalyzer;
use crate::services::git::WorkingTree;
use crate::services::ignore::IgnoreMatcher;
use crate::services::loader::ChangeLoader;
use crate::services::prompt::PromptBuilder;

#[derive(Debug, Clone)]
pub struct GeneratedPrompt {
    pub prompt: PromptPair,
    pub analysis: ChangeAnalysis,
}

/// Loads changes, classifies them and assembles the prompts sent to a provider.
pub struct CommitPromptGenerator {
    builder: PromptBuilder,
    ignore_file: String,
}

impl CommitPromptGenerator {
    pub fn new(builder: PromptBuilder, ignore_file: impl Into<String>) -> Self {
        Self {
            builder,
            ignore_file: ignore_file.into(),
        }
    }

    pub fn builder(&self) -> &PromptBuilder {
        &self.builder
    }

    /// Filtered change records of `tree`.
    pub fn load_changes(&self, tree: &dyn WorkingTree) -> Result<Vec<ChangeRecord>> {
        let matcher = IgnoreMatcher::load(tree.root(), &self.ignore_file);
        ChangeLoader::load(tree, &matcher)
    }

    /// `None` when the working tree has nothing to commit.
    pub fn generate(
        &self,
        tree: &dyn WorkingTree,
        explanation: Option<&str>,
        no_feat: bool,
        debug: bool,
    ) -> Result<Option<GeneratedPrompt>> {
        let records = self.load_changes(tree)?;
        if records.is_empty() {
            return Ok(None);
        }

        let analysis = ChangeAnalyzer::analyze(&records);
        debug!(
            magnitude = %analysis.magnitude,
            category = %analysis.category,
            files = analysis.total_files,
            "changes analyzed"
        );

        if debug {
            Self::print_debug(&records, &analysis);
        }

        let changes = ChangeLoader::render_changes(&records);
        let prompt = self.builder.build_commit_prompt(
            &changes,
            &CommitType::catalog_csv(),
            &analysis,
            explanation,
            no_feat,
        )?;

        Ok(Some(GeneratedPrompt { prompt, analysis }))
    }

    /// Commit prompt built from a natural-language summary instead of raw changes.
    pub fn generate_from_resume(
        &self,
        resume: &str,
        explanation: Option<&str>,
        no_feat: bool,
    ) -> Result<PromptPair> {
        self.builder.build_commit_prompt(
            resume,
            &CommitType::catalog_csv(),
            &ChangeAnalysis::placeholder(),
            explanation,
            no_feat,
        )
    }

    pub fn resume_prompt(
        &self,
        tree: &dyn WorkingTree,
        explanation: Option<&str>,
    ) -> Result<Option<String>> {
        let records = self.load_changes(tree)?;
        if records.is_empty() {
            return Ok(None);
        }

        let changes = ChangeLoader::render_changes(&records);
        self.builder.build_resume_prompt(&changes, explanation).map(Some)
    }

    fn print_debug(records: &[ChangeRecord], analysis: &ChangeAnalysis) {
        eprintln!("{}", style("--- FILES ---").dim());
        for record in records {
            eprintln!("{} ({})", record.name, record.kind);
        }
        eprintln!("{}", style("--- ANALYSIS ---").dim());
        eprintln!("{}", analysis.to_context_string());
        eprintln!("{}", style("--- END ---").dim());
    }
}
