//! Live HTTP transport for OpenAI-compatible endpoints.

use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::GatewayError;
use crate::models::GatewayConfig;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedItem>,
}

#[derive(Debug, Deserialize)]
struct EmbedItem {
    index: usize,
    embedding: Vec<f32>,
}

/// Network-backed gateway transport. One call here is one attempt; the
/// retry loop lives in the client above.
pub(super) struct LiveGateway {
    client: Client,
    base_url: String,
    api_key: String,
    chat_model: String,
    embedding_model: String,
}

impl LiveGateway {
    pub(super) fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            GatewayError::Invalid("live gateway requires an API key".to_string())
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Transient(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            chat_model: config.chat_model.clone(),
            embedding_model: config.embedding_model.clone(),
        })
    }

    pub(super) async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, GatewayError> {
        let request = ChatRequest {
            model: &self.chat_model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens,
            temperature,
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(classify_send_error)?;

        let response = check_status(response).await?;

        let body: ChatResponse = response.json().await.map_err(|e| GatewayError::Permanent {
            status: 200,
            message: format!("invalid completion response: {}", e),
        })?;

        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| GatewayError::Permanent {
                status: 200,
                message: "completion response had no choices".to_string(),
            })
    }

    pub(super) async fn embed_batch(
        &self,
        texts: &[String],
    ) -> Result<Vec<Vec<f32>>, GatewayError> {
        let request = EmbedRequest {
            model: &self.embedding_model,
            input: texts,
        };

        let response = self
            .client
            .post(format!("{}/v1/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(classify_send_error)?;

        let response = check_status(response).await?;

        let body: EmbedResponse = response.json().await.map_err(|e| GatewayError::Permanent {
            status: 200,
            message: format!("invalid embedding response: {}", e),
        })?;

        // The API reports an index per item; reorder so position i of the
        // result is the vector for texts[i].
        let mut ordered: Vec<Option<Vec<f32>>> = vec![None; texts.len()];
        for item in body.data {
            match ordered.get_mut(item.index) {
                Some(slot) => *slot = Some(item.embedding),
                None => {
                    return Err(GatewayError::Permanent {
                        status: 200,
                        message: format!("embedding index {} out of range", item.index),
                    });
                }
            }
        }

        ordered
            .into_iter()
            .enumerate()
            .map(|(i, slot)| {
                slot.ok_or_else(|| GatewayError::Permanent {
                    status: 200,
                    message: format!("embedding missing for input {}", i),
                })
            })
            .collect()
    }
}

fn classify_send_error(error: reqwest::Error) -> GatewayError {
    // Anything that failed before an HTTP status came back is a network
    // problem: connect refusals, timeouts, resets.
    GatewayError::Transient(error.to_string())
}

async fn check_status(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = format!("status {}: {}", status, body);

    if status == StatusCode::TOO_MANY_REQUESTS {
        Err(GatewayError::RateLimited(message))
    } else if status.is_server_error() {
        Err(GatewayError::Transient(message))
    } else {
        Err(GatewayError::Permanent {
            status: status.as_u16(),
            message: body,
        })
    }
}
