// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{Error, Result};

/// Read-only view of the uncommitted state of a working directory.
pub trait WorkingTree: Send + Sync {
    fn root(&self) -> &Path;

    /// Untracked files, relative to the root, honoring the standard excludes.
    fn untracked_paths(&self) -> Result<Vec<String>>;

    /// Tracked files that differ from HEAD. Empty when the repository has no commits.
    fn modified_paths(&self) -> Result<Vec<String>>;

    fn read_file(&self, path: &str) -> Result<String>;

    /// Unified diff of one file against HEAD.
    fn diff_of(&self, path: &str) -> Result<String>;
}

pub struct GitService {
    work_dir: PathBuf,
    has_commits: bool,
}

impl GitService {
    pub fn discover(path: &Path) -> Result<Self> {
        let repo = gix::discover(path).map_err(|_| Error::NotAGitRepo)?;

        let work_dir = repo
            .workdir()
            .ok_or_else(|| Error::Git("Bare repository not supported".into()))?
            .to_path_buf();
        let has_commits = repo.head_id().is_ok();

        debug!(root = %work_dir.display(), has_commits, "repository discovered");
        Ok(Self {
            work_dir,
            has_commits,
        })
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(["-c", "core.quotepath=off"])
            .args(args)
            .current_dir(&self.work_dir)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Git(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Split NUL-terminated `-z` output. Names are kept verbatim.
    fn path_list(output: &str) -> Vec<String> {
        output
            .split('\0')
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect()
    }

    /// Stage everything and commit with `message`.
    pub fn commit(&self, message: &str) -> Result<()> {
        self.git(&["add", "--all"])?;
        self.git(&["commit", "-m", message])?;
        Ok(())
    }
}

impl WorkingTree for GitService {
    fn root(&self) -> &Path {
        &self.work_dir
    }

    fn untracked_paths(&self) -> Result<Vec<String>> {
        let out = self.git(&["ls-files", "-z", "--others", "--exclude-standard"])?;
        Ok(Self::path_list(&out))
    }

    fn modified_paths(&self) -> Result<Vec<String>> {
        if !self.has_commits {
            return Ok(Vec::new());
        }
        let out = self.git(&["diff", "HEAD", "-z", "--name-only", "--no-renames"])?;
        Ok(Self::path_list(&out))
    }

    fn read_file(&self, path: &str) -> Result<String> {
        let bytes = std::fs::read(self.work_dir.join(path))?;
        String::from_utf8(bytes)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
    }

    fn diff_of(&self, path: &str) -> Result<String> {
        self.git(&[
            "--literal-pathspecs",
            "diff",
            "HEAD",
            "--no-ext-diff",
            "--unified=3",
            "--",
            path,
        ])
    }
}
