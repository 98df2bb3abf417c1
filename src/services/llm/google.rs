// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ProviderAction, ProviderAdapter, ensure_success, http_client, request_error};
use crate::config::Config;
use crate::domain::{CommitMessage, PromptPair};
use crate::error::{Error, Result};
use crate::services::generator::CommitPromptGenerator;
use crate::services::sanitizer::CommitSanitizer;
use crate::services::usage::UsageLedger;

const NAME: &str = "google";

pub struct GoogleProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: SecretString,
    temperature: f32,
    generator: Arc<CommitPromptGenerator>,
    ledger: Arc<dyn UsageLedger>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct CountRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    temperature: f32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    total_token_count: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CountResponse {
    total_tokens: u64,
}

impl<'a> Content<'a> {
    fn text(role: Option<&'a str>, text: &'a str) -> Self {
        Self {
            role,
            parts: vec![Part { text }],
        }
    }
}

impl GoogleProvider {
    pub fn new(
        config: &Config,
        model: &str,
        generator: Arc<CommitPromptGenerator>,
        ledger: Arc<dyn UsageLedger>,
    ) -> Result<Self> {
        let api_key = config.google_api_key.clone().ok_or_else(|| {
            Error::Config("google requires an API key. Set GITMIT_GOOGLE_API_KEY or GOOGLE_API_KEY".into())
        })?;

        Ok(Self {
            client: http_client(config.timeout_secs),
            base_url: config.google_base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: SecretString::from(api_key),
            temperature: config.temperature,
            generator,
            ledger,
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, self.model, method)
    }
}

#[async_trait]
impl ProviderAdapter for GoogleProvider {
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
        let response = self
            .client
            .post(self.endpoint("countTokens"))
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&CountRequest {
                contents: vec![
                    Content::text(Some("user"), &prompt.system_prompt),
                    Content::text(Some("user"), &prompt.user_prompt),
                ],
            })
            .send()
            .await
            .map_err(|e| request_error(NAME, e))?;

        let response = ensure_success(NAME, response).await?;
        let body: CountResponse = response.json().await.map_err(|e| request_error(NAME, e))?;
        Ok(body.total_tokens)
    }

    async fn send_prompt(&self, prompt: &PromptPair) -> Result<CommitMessage> {
        self.ledger.start()?;

        let response = self
            .client
            .post(self.endpoint("generateContent"))
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&GenerateRequest {
                system_instruction: Content::text(None, &prompt.system_prompt),
                contents: vec![Content::text(Some("user"), &prompt.user_prompt)],
                generation_config: GenerationConfig {
                    response_mime_type: "application/json",
                    temperature: self.temperature,
                },
            })
            .send()
            .await
            .map_err(|e| request_error(NAME, e))?;

        let response = ensure_success(NAME, response).await?;
        let body: GenerateResponse = response.json().await.map_err(|e| request_error(NAME, e))?;

        if let Some(usage) = &body.usage_metadata {
            self.ledger
                .insert_token_usage(usage.total_token_count, &self.model_key())?;
        }

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();
        debug!(chars = text.len(), "google response received");

        CommitSanitizer::parse(&text)
    }
}
