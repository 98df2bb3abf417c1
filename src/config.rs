// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::cli::Cli;
use crate::error::{Error, Result};
use crate::services::ignore::DEFAULT_IGNORE_FILE;

pub const PROJECT_CONFIG_FILE: &str = ".gitmit.toml";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Ollama,
    Google,
    OpenRouter,
}

impl Service {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Some(Self::Ollama),
            "google" => Some(Self::Google),
            "openrouter" => Some(Self::OpenRouter),
            _ => None,
        }
    }
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ollama => write!(f, "ollama"),
            Self::Google => write!(f, "google"),
            Self::OpenRouter => write!(f, "openrouter"),
        }
    }
}

/// `service/model`, split on the first slash so model names may contain slashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    pub service: Service,
    pub model: String,
}

impl ModelSpec {
    pub fn parse(s: &str) -> Result<Self> {
        let (service, model) = s.split_once('/').ok_or_else(|| {
            Error::Config(format!("model must be written as service/model, got '{s}'"))
        })?;

        let service = Service::parse(service.trim()).ok_or_else(|| {
            Error::Config(format!(
                "unknown service '{service}'. Use ollama, google or openrouter"
            ))
        })?;

        let model = model.trim();
        if model.is_empty() {
            return Err(Error::Config(format!("model name missing in '{s}'")));
        }

        Ok(Self {
            service,
            model: model.to_string(),
        })
    }
}

impl std::fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.service, self.model)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Model that writes the commit message, as service/model
    #[serde(default = "default_commit_model")]
    pub commit_model: String,

    /// Optional model that summarizes the changes first (ollama only)
    #[serde(default)]
    pub resume_model: Option<String>,

    #[serde(default = "default_ollama_host")]
    pub ollama_host: String,

    #[serde(default)]
    pub google_api_key: Option<String>,

    #[serde(default = "default_google_base_url")]
    pub google_base_url: String,

    #[serde(default)]
    pub openrouter_api_key: Option<String>,

    #[serde(default = "default_openrouter_base_url")]
    pub openrouter_base_url: String,

    /// OpenRouter upstream providers allowed to serve the request
    #[serde(default)]
    pub openrouter_providers: Vec<String>,

    /// Request timeout in seconds (default 120)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// LLM temperature (0.0-2.0, default 0.3)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Directory whose `<name>.txt` files replace the bundled prompt templates
    #[serde(default)]
    pub prompts_dir: Option<PathBuf>,

    /// Ignore file name at the repository root
    #[serde(default = "default_ignore_file")]
    pub ignore_file: String,

    /// Token usage ledger (default: user data dir)
    #[serde(default)]
    pub usage_file: Option<PathBuf>,
}

fn default_commit_model() -> String {
    "ollama/qwen3:4b".into()
}
fn default_ollama_host() -> String {
    "http://localhost:11434".into()
}
fn default_google_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}
fn default_openrouter_base_url() -> String {
    "https://openrouter.ai/api/v1".into()
}
fn default_timeout_secs() -> u64 {
    120
}
fn default_temperature() -> f32 {
    0.3
}
fn default_ignore_file() -> String {
    DEFAULT_IGNORE_FILE.into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            commit_model: default_commit_model(),
            resume_model: None,
            ollama_host: default_ollama_host(),
            google_api_key: None,
            google_base_url: default_google_base_url(),
            openrouter_api_key: None,
            openrouter_base_url: default_openrouter_base_url(),
            openrouter_providers: Vec::new(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
            prompts_dir: None,
            ignore_file: default_ignore_file(),
            usage_file: None,
        }
    }
}

impl Config {
    /// Load with priority: CLI > ENV > user config > project config > defaults
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = Self::figment(&cli.path)
            .extract::<Config>()
            .map_err(|e| Error::Config(e.to_string()))?;

        // Service-specific API key fallback
        if config.google_api_key.is_none() {
            config.google_api_key = std::env::var("GOOGLE_API_KEY").ok();
        }
        if config.openrouter_api_key.is_none() {
            config.openrouter_api_key = std::env::var("OPENROUTER_API_KEY").ok();
        }

        // CLI overrides (highest priority)
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Layered sources below the CLI, rooted at `project_dir`.
    pub fn figment(project_dir: &Path) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Project-level config (.gitmit.toml in repo root)
        let project_config = project_dir.join(PROJECT_CONFIG_FILE);
        if project_config.exists() {
            figment = figment.merge(Toml::file(&project_config));
        }

        // User-level config
        if let Some(path) = Self::config_path()
            && path.exists()
        {
            figment = figment.merge(Toml::file(&path));
        }

        // Environment variables (GITMIT_COMMIT_MODEL, GITMIT_TIMEOUT_SECS, etc.)
        figment.merge(Env::prefixed("GITMIT_").split("__"))
    }

    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "gitmit").map(|dirs| dirs.config_dir().to_path_buf())
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(ref m) = cli.model {
            self.commit_model = m.clone();
        }
    }

    pub fn commit_spec(&self) -> Result<ModelSpec> {
        ModelSpec::parse(&self.commit_model)
    }

    /// Resume summaries are only produced by ollama models.
    pub fn resume_spec(&self) -> Result<Option<ModelSpec>> {
        let Some(ref raw) = self.resume_model else {
            return Ok(None);
        };
        let spec = ModelSpec::parse(raw)?;
        if spec.service != Service::Ollama {
            return Err(Error::Config(format!(
                "resume_model must use the ollama service, got '{spec}'"
            )));
        }
        Ok(Some(spec))
    }

    pub fn usage_path(&self) -> Result<PathBuf> {
        self.usage_file
            .clone()
            .or_else(crate::services::usage::FileLedger::default_path)
            .ok_or_else(|| Error::Config("Cannot determine data directory for usage_file".into()))
    }

    pub fn validate(&self) -> Result<()> {
        self.commit_spec()?;
        self.resume_spec()?;

        if !(1..=3600).contains(&self.timeout_secs) {
            return Err(Error::Config(format!(
                "timeout_secs must be 1–3600, got {}",
                self.timeout_secs
            )));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::Config(format!(
                "temperature must be 0.0–2.0, got {}",
                self.temperature
            )));
        }

        for (key, value) in [
            ("ollama_host", &self.ollama_host),
            ("google_base_url", &self.google_base_url),
            ("openrouter_base_url", &self.openrouter_base_url),
        ] {
            Self::validate_url(key, value)?;
        }

        if self.ignore_file.trim().is_empty() {
            return Err(Error::Config("ignore_file cannot be empty".into()));
        }

        Ok(())
    }

    fn validate_url(key: &str, value: &str) -> Result<()> {
        let url = Url::parse(value)
            .map_err(|e| Error::Config(format!("{key} is not a valid URL ('{value}'): {e}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "{key} must start with http:// or https://, got '{value}'"
            )));
        }

        Ok(())
    }

    /// Create default config file with secure permissions
    pub fn create_default() -> Result<PathBuf> {
        let Some(dir) = Self::config_dir() else {
            return Err(Error::Config("Cannot determine config directory".into()));
        };

        fs::create_dir_all(&dir)?;

        let path = dir.join("config.toml");
        let content = r#"# gitmit configuration

# Model that writes the commit message, as service/model.
# Services: ollama, google, openrouter
commit_model = "ollama/qwen3:4b"

# Optional local model that summarizes large change sets first (ollama only)
# resume_model = "ollama/llama3.2"

# Ollama server URL
ollama_host = "http://localhost:11434"

# API keys (or set GOOGLE_API_KEY / OPENROUTER_API_KEY)
# google_api_key = ""
# openrouter_api_key = ""

# Restrict OpenRouter to these upstream providers
# openrouter_providers = ["anthropic"]

# Request timeout in seconds
timeout_secs = 120

# Sampling temperature (0.0-2.0)
temperature = 0.3

# Directory with <name>.txt files overriding the bundled prompt templates
# prompts_dir = "/path/to/prompts"

# Patterns in this file (at the repository root) are never sent to a model
ignore_file = ".gitmitignore"
"#;

        fs::write(&path, content)?;

        // Set secure permissions (0600)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&path, perms)?;
        }

        Ok(path)
    }
}
