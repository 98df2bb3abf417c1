// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptPair {
    pub system_prompt: String,
    pub user_prompt: String,
}

impl PromptPair {
    /// Single-string form used for token estimates.
    pub fn combined(&self) -> String {
        format!("{}\n\n---\n\n{}", self.system_prompt, self.user_prompt)
    }
}
