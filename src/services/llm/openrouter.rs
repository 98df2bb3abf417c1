// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    ProviderAction, ProviderAdapter, ensure_success, estimate_tokens, http_client,
    request_error,
};
use crate::config::Config;
use crate::domain::{CommitMessage, PromptPair};
use crate::error::{Error, Result};
use crate::services::generator::CommitPromptGenerator;
use crate::services::sanitizer::CommitSanitizer;
use crate::services::usage::UsageLedger;

const NAME: &str = "openrouter";

pub struct OpenRouterProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: SecretString,
    temperature: f32,
    providers: Vec<String>,
    generator: Arc<CommitPromptGenerator>,
    ledger: Arc<dyn UsageLedger>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    response_format: ResponseFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    provider: Option<ProviderPreferences<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ProviderPreferences<'a> {
    only: &'a [String],
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: u64,
}

impl OpenRouterProvider {
    pub fn new(
        config: &Config,
        model: &str,
        generator: Arc<CommitPromptGenerator>,
        ledger: Arc<dyn UsageLedger>,
    ) -> Result<Self> {
        let api_key = config.openrouter_api_key.clone().ok_or_else(|| {
            Error::Config(
                "openrouter requires an API key. Set GITMIT_OPENROUTER_API_KEY or OPENROUTER_API_KEY"
                    .into(),
            )
        })?;

        let providers = config
            .openrouter_providers
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            client: http_client(config.timeout_secs),
            base_url: config.openrouter_base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: SecretString::from(api_key),
            temperature: config.temperature,
            providers,
            generator,
            ledger,
        })
    }
}

#[async_trait]
impl ProviderAdapter for OpenRouterProvider {
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
            ProviderAction::CountTokens | ProviderAction::TokensUsed | ProviderAction::CommitMessage
        )
    }

    async fn tokens_used(&self) -> Result<u64> {
        self.ledger.start()?;
        self.ledger.current_month_tokens_used(&self.model_key())
    }

    async fn count_tokens(&self, prompt: &PromptPair) -> Result<u64> {
        Ok(estimate_tokens(prompt))
    }

    async fn send_prompt(&self, prompt: &PromptPair) -> Result<CommitMessage> {
        self.ledger.start()?;

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&ChatRequest {
                model: &self.model,
                messages: vec![
                    Message {
                        role: "system",
                        content: &prompt.system_prompt,
                    },
                    Message {
                        role: "user",
                        content: &prompt.user_prompt,
                    },
                ],
                temperature: self.temperature,
                response_format: ResponseFormat {
                    kind: "json_object",
                },
                provider: (!self.providers.is_empty()).then(|| ProviderPreferences {
                    only: &self.providers,
                }),
            })
            .send()
            .await
            .map_err(|e| request_error(NAME, e))?;

        let response = ensure_success(NAME, response).await?;
        let body: ChatResponse = response.json().await.map_err(|e| request_error(NAME, e))?;

        if let Some(usage) = &body.usage {
            self.ledger
                .insert_token_usage(usage.total_tokens, &self.model_key())?;
        }

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        debug!(chars = content.len(), "openrouter response received");

        CommitSanitizer::parse(&content)
    }
}
