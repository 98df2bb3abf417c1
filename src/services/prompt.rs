// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use crate::domain::{ChangeAnalysis, ChangeMagnitude, PromptPair};
use crate::error::Result;
use crate::services::templates::{
    COMMIT_SYSTEM, MAJOR_CHANGES, MEDIUM_CHANGES, PromptTemplateStore, RESUME_CHANGES,
    SMALL_CHANGES,
};

const NO_FEAT_SECTION: &str = "
## ⚠️ EXPLICIT INSTRUCTION: NO FEAT TYPE
The user has indicated this is NOT a feature. Do NOT use the `feat` commit type.
Choose from: enhancement, refactor, chore, bugfix, style, or other appropriate types.
";

pub struct PromptBuilder {
    templates: PromptTemplateStore,
}

impl PromptBuilder {
    pub fn new(templates: PromptTemplateStore) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &PromptTemplateStore {
        &self.templates
    }

    pub fn template_for(magnitude: ChangeMagnitude) -> &'static str {
        match magnitude {
            ChangeMagnitude::Trivial | ChangeMagnitude::Small => SMALL_CHANGES,
            ChangeMagnitude::Medium => MEDIUM_CHANGES,
            ChangeMagnitude::Large | ChangeMagnitude::Major => MAJOR_CHANGES,
        }
    }

    /// Empty when there is nothing to say.
    pub fn explanation_section(explanation: Option<&str>) -> String {
        match explanation.map(str::trim) {
            Some(text) if !text.is_empty() => format!(
                "
## USER EXPLANATION (HIGH PRIORITY)
⚠️ **The user has provided context. Use this as your PRIMARY guide for categorization.**

> {text}

This explanation should:
1. Guide your choice of commit type
2. Influence your description wording
3. Be reflected in the final message
"
            ),
            _ => String::new(),
        }
    }

    pub fn build_commit_prompt(
        &self,
        changes: &str,
        commit_types_csv: &str,
        analysis: &ChangeAnalysis,
        explanation: Option<&str>,
        no_feat: bool,
    ) -> Result<PromptPair> {
        let system = self.templates.load(COMMIT_SYSTEM)?;
        let user = self.templates.load(Self::template_for(analysis.magnitude))?;

        let mut section = Self::explanation_section(explanation);
        if no_feat {
            section.push_str(NO_FEAT_SECTION);
        }
        let context = analysis.to_context_string();

        Ok(PromptPair {
            system_prompt: PromptTemplateStore::substitute(
                &system,
                &[("COMMIT_TYPES_CSV", commit_types_csv)],
            ),
            user_prompt: PromptTemplateStore::substitute(
                &user,
                &[
                    ("CHANGE_ANALYSIS", &context),
                    ("CHANGES", changes),
                    ("USER_EXPLANATION_SECTION", &section),
                ],
            ),
        })
    }

    pub fn build_resume_prompt(&self, changes: &str, explanation: Option<&str>) -> Result<String> {
        let template = self.templates.load(RESUME_CHANGES)?;
        let section = Self::explanation_section(explanation);

        Ok(PromptTemplateStore::substitute(
            &template,
            &[("CHANGES", changes), ("USER_EXPLANATION_SECTION", &section)],
        ))
    }
}
