// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

use regex::{Captures, Regex};
use tracing::debug;

use crate::error::{Error, Result};

pub const COMMIT_SYSTEM: &str = "commit_system";
pub const SMALL_CHANGES: &str = "small_changes";
pub const MEDIUM_CHANGES: &str = "medium_changes";
pub const MAJOR_CHANGES: &str = "major_changes";
pub const RESUME_CHANGES: &str = "resume_changes";

const BUNDLED: &[(&str, &str)] = &[
    (COMMIT_SYSTEM, include_str!("../prompts/commit_system.txt")),
    (SMALL_CHANGES, include_str!("../prompts/small_changes.txt")),
    (MEDIUM_CHANGES, include_str!("../prompts/medium_changes.txt")),
    (MAJOR_CHANGES, include_str!("../prompts/major_changes.txt")),
    (RESUME_CHANGES, include_str!("../prompts/resume_changes.txt")),
];

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").unwrap());

/// Where template text comes from.
pub trait TemplateSource: Send + Sync {
    fn read(&self, name: &str) -> Result<String>;
}

/// `<override_dir>/<name>.txt` when present, else the templates compiled into the binary.
#[derive(Debug, Clone, Default)]
pub struct BundledTemplates {
    override_dir: Option<PathBuf>,
}

impl BundledTemplates {
    pub fn new(override_dir: Option<PathBuf>) -> Self {
        Self { override_dir }
    }
}

impl TemplateSource for BundledTemplates {
    fn read(&self, name: &str) -> Result<String> {
        if let Some(dir) = &self.override_dir {
            let path = dir.join(format!("{name}.txt"));
            if path.is_file() {
                debug!(name, path = %path.display(), "template override");
                return Ok(std::fs::read_to_string(path)?);
            }
        }

        BUNDLED
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, text)| (*text).to_string())
            .ok_or_else(|| Error::TemplateNotFound { name: name.into() })
    }
}

/// Caches template text by name. Each name is read from its source at most
/// once until invalidated.
pub struct PromptTemplateStore {
    source: Box<dyn TemplateSource>,
    cache: Mutex<HashMap<String, Arc<str>>>,
}

impl PromptTemplateStore {
    pub fn new(source: Box<dyn TemplateSource>) -> Self {
        Self {
            source,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn bundled(override_dir: Option<PathBuf>) -> Self {
        Self::new(Box::new(BundledTemplates::new(override_dir)))
    }

    fn cache(&self) -> MutexGuard<'_, HashMap<String, Arc<str>>> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn load(&self, name: &str) -> Result<Arc<str>> {
        let mut cache = self.cache();
        if let Some(text) = cache.get(name) {
            return Ok(Arc::clone(text));
        }

        let text: Arc<str> = self.source.read(name)?.into();
        cache.insert(name.to_string(), Arc::clone(&text));
        Ok(text)
    }

    /// Drop one cached template; the next `load` reads it again.
    pub fn invalidate(&self, name: &str) {
        self.cache().remove(name);
    }

    pub fn clear_all(&self) {
        self.cache().clear();
    }

    /// Replace every `{{KEY}}` found in `values`, in one pass. Unknown
    /// placeholders are kept as written.
    pub fn substitute(template: &str, values: &[(&str, &str)]) -> String {
        PLACEHOLDER
            .replace_all(template, |caps: &Captures| {
                let key = &caps[1];
                values
                    .iter()
                    .find(|(k, _)| *k == key)
                    .map_or_else(|| caps[0].to_string(), |(_, v)| (*v).to_string())
            })
            .into_owned()
    }
}
