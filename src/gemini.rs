// src/gemini.rs
//! Gemini client for the tailoring call: one prompt in, one block of LaTeX
//! out. Single attempt, no auto-retry; the caller decides whether to re-run.

use serde::{Deserialize, Serialize};
use std::env;
use tracing::{error, info};

use crate::error::{Result, TailorError};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Seam for the AI backend so the pipeline can run against a mock in tests.
#[allow(async_fn_in_trait)]
pub trait TextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
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
    parts: Vec<Part>,
}

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, timeout_secs: u64) -> Result<Self> {
        let base_url =
            env::var("GEMINI_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model,
            base_url,
        })
    }

    async fn generate_content(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        info!("Calling Gemini model {}", self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Gemini API error {}: {}", status, body);
            return Err(match status.as_u16() {
                401 | 403 => TailorError::Authentication(trim_error_body(&body)),
                400 if body.contains("API_KEY") || body.contains("API key") => {
                    TailorError::Authentication(trim_error_body(&body))
                }
                429 => TailorError::RateLimited,
                code => TailorError::Api {
                    status: code,
                    message: trim_error_body(&body),
                },
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        info!("Received {} bytes from Gemini", text.len());
        Ok(text)
    }
}

impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let raw = self.generate_content(prompt).await?;
        ensure_latex(&raw)
    }
}

/// Validate that generated text is usable LaTeX source. A markdown code
/// fence around an otherwise valid document is stripped first; the model
/// wraps output that way routinely.
pub fn ensure_latex(raw: &str) -> Result<String> {
    let text = strip_code_fence(raw.trim());

    if text.is_empty() {
        return Err(TailorError::MalformedResponse(
            "service returned empty text".to_string(),
        ));
    }
    if !text.contains(r"\documentclass") {
        return Err(TailorError::MalformedResponse(
            "missing \\documentclass declaration".to_string(),
        ));
    }
    if !text.contains(r"\begin{document}") {
        return Err(TailorError::MalformedResponse(
            "missing \\begin{document} marker".to_string(),
        ));
    }

    Ok(text.to_string())
}

/// Strip one layer of ``` fencing (with or without a language tag).
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the language tag line, then the closing fence.
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => return text,
    };
    body.trim_end()
        .strip_suffix("```")
        .map(str::trim_end)
        .unwrap_or(body)
}

fn trim_error_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() > 300 {
        let head: String = trimmed.chars().take(300).collect();
        format!("{}...", head)
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "\\documentclass{resume}\n\\begin{document}\nbody\n\\end{document}";

    #[test]
    fn valid_latex_passes_through() {
        assert_eq!(ensure_latex(VALID).unwrap(), VALID);
    }

    #[test]
    fn empty_response_is_malformed() {
        assert!(matches!(
            ensure_latex("   \n  "),
            Err(TailorError::MalformedResponse(_))
        ));
    }

    #[test]
    fn missing_documentclass_is_malformed() {
        let err = ensure_latex("\\begin{document}hi\\end{document}").unwrap_err();
        match err {
            TailorError::MalformedResponse(msg) => assert!(msg.contains("documentclass")),
            other => panic!("expected MalformedResponse, got {:?}", other),
        }
    }

    #[test]
    fn missing_begin_document_is_malformed() {
        assert!(matches!(
            ensure_latex("\\documentclass{resume} only a preamble"),
            Err(TailorError::MalformedResponse(_))
        ));
    }

    #[test]
    fn code_fence_is_stripped() {
        let fenced = format!("```latex\n{}\n```", VALID);
        assert_eq!(ensure_latex(&fenced).unwrap(), VALID);

        let bare_fence = format!("```\n{}\n```", VALID);
        assert_eq!(ensure_latex(&bare_fence).unwrap(), VALID);
    }

    #[test]
    fn response_deserializes_candidate_text() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "\\documentclass{x}"}], "role": "model"}}
            ]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.candidates.len(), 1);
        assert_eq!(
            parsed.candidates[0]
                .content
                .as_ref()
                .unwrap()
                .parts[0]
                .text,
            "\\documentclass{x}"
        );
    }
}
