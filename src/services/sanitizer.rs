// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use crate::domain::{CommitMessage, CommitType};
use crate::error::{Error, Result};

pub struct CommitSanitizer;

impl CommitSanitizer {
    /// Parse and validate a commit message from model output.
    ///
    /// Accepts a bare JSON object or one wrapped in a markdown code fence.
    /// Never falls back to a guessed message.
    pub fn parse(raw: &str) -> Result<CommitMessage> {
        let json = Self::extract_json(raw).ok_or_else(|| {
            Error::InvalidCommitMessage(format!(
                "no JSON object in response: '{}'",
                raw.trim().chars().take(40).collect::<String>()
            ))
        })?;

        let message: CommitMessage = serde_json::from_str(json).map_err(|e| {
            Error::InvalidCommitMessage(format!(
                "{e}. Type must be one of: {}",
                CommitType::ALL.join(", ")
            ))
        })?;

        if message.short_description.trim().is_empty() {
            return Err(Error::InvalidCommitMessage(
                "short_description is empty".into(),
            ));
        }

        Ok(message)
    }

    fn extract_json(raw: &str) -> Option<&str> {
        let trimmed = raw.trim();

        // Direct JSON
        if trimmed.starts_with('{') && trimmed.ends_with('}') {
            return Some(trimmed);
        }

        // JSON in code fence
        if let Some(start) = trimmed.find("```json") {
            let after_fence = &trimmed[start + 7..];
            if let Some(end) = after_fence.find("```") {
                return Some(after_fence[..end].trim());
            }
        }

        // Plain code fence
        if let Some(start) = trimmed.find("```") {
            let after_fence = &trimmed[start + 3..];
            if let Some(end) = after_fence.find("```") {
                let content = after_fence[..end].trim();
                if content.starts_with('{') {
                    return Some(content);
                }
            }
        }

        // Object surrounded by prose
        let start = trimmed.find('{')?;
        let end = trimmed.rfind('}')?;
        (start < end).then(|| &trimmed[start..=end])
    }
}
