use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::GeminiConfig;
use crate::diagnostics::{self, Kind};
use crate::session::Outcome;

const MAX_ERROR_BODY_CHARS: usize = 800;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Client for the `generateContent` endpoint. Each call sends exactly one
/// prompt part; no history or system instruction goes upstream.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn with_config(config: &GeminiConfig) -> Self {
        Self::new(config.endpoint.clone(), config.model.clone(), config.api_key())
    }

    pub fn new(endpoint: String, model: String, api_key: String) -> Self {
        GeminiClient {
            http: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model,
            api_key,
        }
    }

    pub fn get_model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let body = GenerateRequest {
            contents: vec![Content { parts: vec![Part { text: prompt }] }],
        };

        let resp = self
            .http
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            // The URL carries `?key=`, keep it out of every error.
            .map_err(|e| e.without_url())
            .context("sending generateContent request")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let body = body.trim();
            if body.is_empty() {
                return Err(anyhow!("generateContent returned {}", status));
            }
            let body: String = if body.chars().count() > MAX_ERROR_BODY_CHARS {
                format!("{}...", body.chars().take(MAX_ERROR_BODY_CHARS).collect::<String>())
            } else {
                body.to_string()
            };
            return Err(anyhow!("generateContent returned {}\n{}", status, body));
        }

        let parsed: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| e.without_url())
            .context("decoding generateContent response")?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| anyhow!("response carried no candidate text"))
    }

    /// Never fails: errors are logged and folded into [`Outcome::Failure`].
    pub async fn answer(&self, prompt: &str) -> Outcome {
        diagnostics::log_with(
            Kind::Request,
            format!("{} <- {} chars", self.model, prompt.chars().count()),
        );
        match self.generate(prompt).await {
            Ok(text) => {
                diagnostics::log_with(Kind::Answer, format!("{} chars", text.chars().count()));
                Outcome::Answer(text)
            }
            Err(e) => {
                let reason = format!("{:#}", e);
                diagnostics::log_with(Kind::Failure, reason.clone());
                Outcome::Failure(reason)
            }
        }
    }
}
