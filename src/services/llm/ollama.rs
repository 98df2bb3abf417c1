// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ProviderAction, ProviderAdapter, ensure_success, http_client};
use crate::config::Config;
use crate::domain::{CommitMessage, PromptPair};
use crate::error::{Error, Result};
use crate::services::generator::CommitPromptGenerator;
use crate::services::git::WorkingTree;
use crate::services::sanitizer::CommitSanitizer;

const NAME: &str = "ollama";

pub struct OllamaProvider {
    client: Client,
    host: String,
    model: String,
    temperature: f32,
    generator: Arc<CommitPromptGenerator>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<serde_json::Value>,
    stream: bool,
    options: Options,
}

#[derive(Serialize)]
struct Options {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaProvider {
    pub fn new(config: &Config, model: &str, generator: Arc<CommitPromptGenerator>) -> Self {
        Self {
            client: http_client(config.timeout_secs),
            // Sanitize: remove trailing slashes to avoid //api/generate
            host: config.ollama_host.trim_end_matches('/').to_string(),
            model: model.to_string(),
            temperature: config.temperature,
            generator,
        }
    }

    async fn generate(
        &self,
        prompt: &str,
        system: Option<&str>,
        format: Option<serde_json::Value>,
    ) -> Result<String> {
        let url = format!("{}/api/generate", self.host);

        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                system,
                format,
                stream: false,
                options: Options {
                    temperature: self.temperature,
                },
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    Error::OllamaNotRunning {
                        host: self.host.clone(),
                    }
                } else {
                    super::request_error(NAME, e)
                }
            })?;

        let response = ensure_success(NAME, response).await?;
        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| super::request_error(NAME, e))?;

        debug!(chars = body.response.len(), "ollama response received");
        Ok(body.response.trim().to_string())
    }
}

#[async_trait]
impl ProviderAdapter for OllamaProvider {
    fn name(&self) -> &str {
        NAME
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn generator(&self) -> &CommitPromptGenerator {
        &self.generator
    }

    fn supports(&self, action: ProviderAction) -> bool {
        matches!(
            action,
            ProviderAction::ResumeChanges | ProviderAction::CommitMessage
        )
    }

    async fn resume_changes(
        &self,
        tree: &dyn WorkingTree,
        explanation: Option<&str>,
    ) -> Result<Option<String>> {
        let Some(prompt) = self.generator.resume_prompt(tree, explanation)? else {
            return Ok(None);
        };

        let summary = self.generate(&prompt, None, None).await?;
        Ok(Some(summary))
    }

    async fn send_prompt(&self, prompt: &PromptPair) -> Result<CommitMessage> {
        let raw = self
            .generate(
                &prompt.user_prompt,
                Some(&prompt.system_prompt),
                Some(CommitMessage::json_schema()),
            )
            .await?;

        CommitSanitizer::parse(&raw)
    }
}
