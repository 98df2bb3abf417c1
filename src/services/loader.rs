// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use tracing::{debug, warn};

use crate::domain::{ChangeRecord, UNREADABLE_CONTENT};
use crate::error::Result;
use crate::services::git::WorkingTree;
use crate::services::ignore::IgnoreMatcher;

pub struct ChangeLoader;

impl ChangeLoader {
    /// Collect untracked files first, then files modified since HEAD.
    ///
    /// Listing failures are errors. A new file that cannot be read is kept with
    /// placeholder content; a modified file whose diff fails is skipped.
    pub fn load(tree: &dyn WorkingTree, matcher: &IgnoreMatcher) -> Result<Vec<ChangeRecord>> {
        let mut records = Vec::new();

        for path in tree.untracked_paths()? {
            if matcher.should_ignore(&path) {
                debug!(path, "ignored");
                continue;
            }
            let content = match tree.read_file(&path) {
                Ok(text) => text,
                Err(e) => {
                    debug!(path, error = %e, "unreadable new file");
                    UNREADABLE_CONTENT.to_string()
                }
            };
            records.push(ChangeRecord::new(path, content));
        }

        for path in tree.modified_paths()? {
            if matcher.should_ignore(&path) {
                debug!(path, "ignored");
                continue;
            }
            match tree.diff_of(&path) {
                Ok(diff) => records.push(ChangeRecord::modified(path, diff)),
                Err(e) => warn!(path, error = %e, "skipping file, diff failed"),
            }
        }

        debug!(count = records.len(), "changes loaded");
        Ok(records)
    }

    /// Render records as the raw changes block sent to the model.
    pub fn render_changes(records: &[ChangeRecord]) -> String {
        records
            .iter()
            .map(|r| format!(">>>> {} ({})\n{}\n<<<< end of file", r.name, r.kind, r.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
