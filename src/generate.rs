//! Final answer generation.
//!
//! Wraps the text-generation HTTP endpoint (Ollama's `/api/generate`
//! contract). The generator receives the question and the assembled
//! evidence context and returns free text. Any transport failure,
//! non-success status, or malformed body is a hard failure of the whole
//! answer request; no partial or empty answer is ever returned in its
//! place.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::GenerationConfig;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Build the generation prompt from the question and evidence context.
pub fn build_prompt(question: &str, context: &str) -> String {
    format!(
        "You are a car recommendation assistant.\n\
         \n\
         You will receive:\n\
         - Context: car descriptions, stats (trips, avg_km, fuel_type, maintenance_score), and car-feature relations.\n\
         - Question: what the user wants.\n\
         \n\
         Task:\n\
         1. Use the context to reason about which car fits the user's needs.\n\
         2. If no car is explicitly marked best, infer using higher avg_km for long trips, more trips for reliability, and features such as \"High Mileage\", \"Suitable for Long Trips\", or \"Comfort\".\n\
         3. Give a clear recommendation and explain why.\n\
         \n\
         Context:\n\
         {}\n\
         \n\
         User question:\n\
         {}\n\
         \n\
         Now give the best possible answer based on the context.\n",
        context, question
    )
}

/// Ask the generation model for the final answer.
///
/// Sends `{model, prompt, stream: false}` to `{url}/api/generate` and
/// returns the trimmed response text.
///
/// # Errors
///
/// Fails on network errors and non-success statuses once retries are
/// exhausted (429/5xx retry with the usual capped backoff; other 4xx fail
/// immediately), and on response bodies missing the `response` field.
pub async fn generate_answer(
    config: &GenerationConfig,
    question: &str,
    context: &str,
) -> Result<String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .context("Failed to create HTTP client")?;

    let prompt = build_prompt(question, context);
    let body = GenerateRequest {
        model: &config.model,
        prompt: &prompt,
        stream: false,
    };

    let mut last_err = None;

    for attempt in 0..=config.max_retries {
        if attempt > 0 {
            let delay = Duration::from_secs(1 << (attempt - 1).min(5));
            tokio::time::sleep(delay).await;
        }

        let resp = client
            .post(format!("{}/api/generate", config.url))
            .json(&body)
            .send()
            .await;

        match resp {
            Ok(response) => {
                let status = response.status();

                if status.is_success() {
                    let text = response
                        .text()
                        .await
                        .context("Failed to read generation response")?;
                    return parse_generate_response(&text);
                }

                if status.as_u16() == 429 || status.is_server_error() {
                    let body_text = response.text().await.unwrap_or_default();
                    last_err = Some(anyhow::anyhow!(
                        "Generation API error {}: {}",
                        status,
                        body_text
                    ));
                    continue;
                }

                let body_text = response.text().await.unwrap_or_default();
                bail!("Generation API error {}: {}", status, body_text);
            }
            Err(e) => {
                last_err = Some(anyhow::anyhow!(
                    "Generation connection error (is the model server running at {}?): {}",
                    config.url,
                    e
                ));
                continue;
            }
        }
    }

    Err(last_err
        .unwrap_or_else(|| anyhow::anyhow!("Generation failed after {} retries", config.max_retries)))
}

/// Parse the generation endpoint's JSON body into the answer text.
fn parse_generate_response(body: &str) -> Result<String> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).context("Malformed generation response")?;
    Ok(parsed.response.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response_ok() {
        let answer = parse_generate_response(r#"{"response": "  Car B is the pick.  "}"#).unwrap();
        assert_eq!(answer, "Car B is the pick.");
    }

    #[test]
    fn test_parse_response_ignores_extra_fields() {
        let body = r#"{"model": "gemma:2b", "response": "ok", "done": true}"#;
        assert_eq!(parse_generate_response(body).unwrap(), "ok");
    }

    #[test]
    fn test_parse_response_missing_field_is_error() {
        let err = parse_generate_response(r#"{"done": true}"#).unwrap_err();
        assert!(err.to_string().contains("Malformed generation response"));
    }

    #[test]
    fn test_parse_response_invalid_json_is_error() {
        assert!(parse_generate_response("not json").is_err());
    }

    #[test]
    fn test_prompt_embeds_question_and_context() {
        let prompt = build_prompt("Which car?", "User Question: Which car?\n");
        assert!(prompt.contains("Which car?"));
        assert!(prompt.contains("Context:\nUser Question: Which car?"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_hard_error() {
        let config = GenerationConfig {
            model: "test".to_string(),
            url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            max_retries: 0,
        };

        let err = generate_answer(&config, "q", "ctx").await.unwrap_err();
        assert!(err.to_string().contains("Generation"));
    }
}
