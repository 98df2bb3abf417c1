// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use std::path::Path;

use globset::{GlobBuilder, GlobMatcher};
use tracing::{debug, warn};

pub const DEFAULT_IGNORE_FILE: &str = ".gitmitignore";

#[derive(Debug, Clone)]
struct IgnoreRule {
    matchers: Vec<GlobMatcher>,
    negated: bool,
}

impl IgnoreRule {
    fn is_match(&self, path: &str) -> bool {
        self.matchers.iter().any(|m| m.is_match(path))
    }
}

/// Ordered set of ignore patterns. The last matching pattern decides.
#[derive(Debug, Clone, Default)]
pub struct IgnoreMatcher {
    rules: Vec<IgnoreRule>,
}

impl IgnoreMatcher {
    /// Read `<base_dir>/<filename>`. A missing or unreadable file ignores nothing.
    pub fn load(base_dir: &Path, filename: &str) -> Self {
        let path = base_dir.join(filename);
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                let matcher = Self::parse(&text);
                debug!(path = %path.display(), rules = matcher.len(), "ignore file loaded");
                matcher
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read ignore file, ignoring nothing");
                Self::default()
            }
        }
    }

    pub fn parse(text: &str) -> Self {
        let rules = text.lines().filter_map(Self::parse_line).collect();
        Self { rules }
    }

    fn parse_line(line: &str) -> Option<IgnoreRule> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let (negated, pattern) = match line.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, line),
        };
        let (dir_only, pattern) = match pattern.strip_suffix('/') {
            Some(rest) => (true, rest),
            None => (false, pattern),
        };
        let (anchored, pattern) = match pattern.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (false, pattern),
        };
        if pattern.is_empty() {
            return None;
        }

        // Braces are literal here, globset would treat them as alternation
        let escaped = pattern.replace('{', "[{]").replace('}', "[}]");
        let base = if anchored {
            escaped
        } else {
            format!("**/{escaped}")
        };

        let globs = if dir_only {
            vec![format!("{base}/**")]
        } else {
            vec![base.clone(), format!("{base}/**")]
        };

        let mut matchers = Vec::with_capacity(globs.len());
        for glob in &globs {
            match GlobBuilder::new(glob).literal_separator(true).build() {
                Ok(g) => matchers.push(g.compile_matcher()),
                Err(e) => {
                    warn!(pattern = line, error = %e, "skipping invalid ignore pattern");
                    return None;
                }
            }
        }

        Some(IgnoreRule { matchers, negated })
    }

    /// Whether `relative_path` (relative to the repository root) is excluded.
    pub fn should_ignore(&self, relative_path: &str) -> bool {
        let normalized = relative_path.replace('\\', "/");
        let normalized = normalized.trim_start_matches("./");

        self.rules
            .iter()
            .rev()
            .find(|rule| rule.is_match(normalized))
            .is_some_and(|rule| !rule.negated)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
