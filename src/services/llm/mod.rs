// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

pub mod google;
pub mod ollama;
pub mod openrouter;

use crate::config::{Config, ModelSpec, Service};
use crate::domain::{CommitMessage, PromptPair};
use crate::error::{Error, Result};
use crate::services::generator::CommitPromptGenerator;
use crate::services::git::WorkingTree;
use crate::services::usage::UsageLedger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderAction {
    ResumeChanges,
    CommitMessage,
    CountTokens,
    TokensUsed,
}

impl std::fmt::Display for ProviderAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::ResumeChanges => "resume changes",
            Self::CommitMessage => "commit messages",
            Self::CountTokens => "token counting",
            Self::TokensUsed => "token usage",
        })
    }
}

/// Options for one commit message request.
#[derive(Clone, Copy, Default)]
pub struct CommitRequest<'a> {
    pub explanation: Option<&'a str>,
    /// Adapter that summarizes the changes first, when it supports it
    pub resume: Option<&'a dyn ProviderAdapter>,
    pub no_feat: bool,
    pub debug: bool,
}

#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn name(&self) -> &str;

    fn model(&self) -> &str;

    fn supports(&self, action: ProviderAction) -> bool;

    fn generator(&self) -> &CommitPromptGenerator;

    /// Ledger key, `<provider>/<model>`.
    fn model_key(&self) -> String {
        format!("{}/{}", self.name(), self.model())
    }

    /// Tokens recorded for this model in the current month.
    async fn tokens_used(&self) -> Result<u64> {
        Err(unsupported(self.name(), ProviderAction::TokensUsed))
    }

    async fn count_tokens(&self, _prompt: &PromptPair) -> Result<u64> {
        Err(unsupported(self.name(), ProviderAction::CountTokens))
    }

    /// Natural-language summary of the working tree, `None` when nothing changed.
    async fn resume_changes(
        &self,
        _tree: &dyn WorkingTree,
        _explanation: Option<&str>,
    ) -> Result<Option<String>> {
        Err(unsupported(self.name(), ProviderAction::ResumeChanges))
    }

    /// Send an already built commit prompt and parse the reply.
    async fn send_prompt(&self, prompt: &PromptPair) -> Result<CommitMessage>;

    /// `None` when nothing changed.
    async fn commit_message(
        &self,
        tree: &dyn WorkingTree,
        request: &CommitRequest<'_>,
    ) -> Result<Option<CommitMessage>> {
        match prepare_prompt(self.generator(), tree, request).await? {
            Some(prompt) => self.send_prompt(&prompt).await.map(Some),
            None => Ok(None),
        }
    }
}

/// Outcome of the model-driven commit flow.
#[derive(Debug)]
pub enum Draft {
    Message(CommitMessage),
    /// The user declined a step, or no usable message came back.
    Manual,
}

pub fn unsupported(provider: &str, action: ProviderAction) -> Error {
    Error::Unsupported {
        provider: provider.into(),
        action: action.to_string(),
    }
}

/// Build the commit prompt, summarizing through `request.resume` first when it can.
pub async fn prepare_prompt(
    generator: &CommitPromptGenerator,
    tree: &dyn WorkingTree,
    request: &CommitRequest<'_>,
) -> Result<Option<PromptPair>> {
    if let Some(resume) = request
        .resume
        .filter(|r| r.supports(ProviderAction::ResumeChanges))
    {
        let Some(summary) = resume.resume_changes(tree, request.explanation).await? else {
            return Ok(None);
        };
        return generator
            .generate_from_resume(&summary, request.explanation, request.no_feat)
            .map(Some);
    }

    Ok(generator
        .generate(tree, request.explanation, request.no_feat, request.debug)?
        .map(|g| g.prompt))
}

/// Token count of the prompt `adapter` would send. Zero when there is nothing to commit.
pub async fn count_request_tokens(
    adapter: &dyn ProviderAdapter,
    generator: &CommitPromptGenerator,
    tree: &dyn WorkingTree,
    request: &CommitRequest<'_>,
) -> Result<u64> {
    if !adapter.supports(ProviderAction::CountTokens) {
        return Err(unsupported(adapter.name(), ProviderAction::CountTokens));
    }

    match prepare_prompt(generator, tree, request).await? {
        Some(prompt) => adapter.count_tokens(&prompt).await,
        None => Ok(0),
    }
}

/// Run the model-driven flow: report monthly usage, build the prompt once,
/// report its size, then send it. `confirm` receives each status line and gates
/// the next step; a `false` answer ends in [`Draft::Manual`].
pub async fn draft_commit_message(
    adapter: &dyn ProviderAdapter,
    tree: &dyn WorkingTree,
    request: &CommitRequest<'_>,
    confirm: &mut dyn FnMut(&str) -> Result<bool>,
) -> Result<Draft> {
    if adapter.supports(ProviderAction::TokensUsed) {
        let used = adapter.tokens_used().await?;
        let status = format!("{used} tokens used this month on {}", adapter.model_key());
        if !confirm(&status)? {
            return Ok(Draft::Manual);
        }
    }

    let Some(prompt) = prepare_prompt(adapter.generator(), tree, request).await? else {
        debug!("no changes produced a prompt");
        return Ok(Draft::Manual);
    };

    if adapter.supports(ProviderAction::CountTokens) {
        let estimate = adapter.count_tokens(&prompt).await?;
        if !confirm(&format!("Prompt is about {estimate} tokens"))? {
            return Ok(Draft::Manual);
        }
    }

    match adapter.send_prompt(&prompt).await {
        Ok(message) => Ok(Draft::Message(message)),
        Err(Error::InvalidCommitMessage(reason)) => {
            warn!(%reason, "unusable reply, switching to manual mode");
            Ok(Draft::Manual)
        }
        Err(e) => Err(e),
    }
}

/// Rough count at ~4 characters per token.
pub fn estimate_tokens(prompt: &PromptPair) -> u64 {
    prompt.combined().chars().count().div_ceil(4) as u64
}

pub(crate) fn http_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_default()
}

pub(crate) fn request_error(provider: &str, e: reqwest::Error) -> Error {
    let message = if e.is_timeout() {
        "request timed out".to_string()
    } else {
        e.to_string()
    };
    Error::Provider {
        provider: provider.into(),
        message,
    }
}

pub(crate) async fn ensure_success(
    provider: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(Error::Provider {
        provider: provider.into(),
        message: format!("HTTP {status}: {body}"),
    })
}

pub fn create_provider(
    spec: &ModelSpec,
    config: &Config,
    generator: Arc<CommitPromptGenerator>,
    ledger: Arc<dyn UsageLedger>,
) -> Result<Box<dyn ProviderAdapter>> {
    match spec.service {
        Service::Ollama => Ok(Box::new(ollama::OllamaProvider::new(
            config, &spec.model, generator,
        ))),
        Service::Google => Ok(Box::new(google::GoogleProvider::new(
            config, &spec.model, generator, ledger,
        )?)),
        Service::OpenRouter => Ok(Box::new(openrouter::OpenRouterProvider::new(
            config, &spec.model, generator, ledger,
        )?)),
    }
}
