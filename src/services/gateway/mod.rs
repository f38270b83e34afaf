//! Completion and embedding gateway.
//!
//! One client instance is either live (real network calls) or simulated
//! (deterministic synthetic output); the mode is fixed at construction
//! and instances with different modes may coexist. All operations apply
//! the bounded retry policy: rate limits and transient failures are
//! retried, permanent failures are not, and exhausting the budget
//! escalates to `GatewayError::Unavailable`.

mod live;
mod simulated;

use live::LiveGateway;
use simulated::SimulatedGateway;

use crate::error::GatewayError;
use crate::models::GatewayConfig;
use crate::utils::retry::{Retryable, RetryPolicy, RetryResult, with_retry};
use crate::utils::text::{is_embeddable, normalize_for_embedding};

/// What the caller is asking the model to do.
///
/// Passed explicitly so the simulation never has to sniff intent out of
/// the prompt text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    TopicExtraction,
    Classification,
    Generic,
}

/// Per-call completion knobs.
#[derive(Debug, Clone, Copy)]
pub struct CompletionOptions {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            max_tokens: 60,
            temperature: 0.2,
        }
    }
}

enum Transport {
    Live(LiveGateway),
    Simulated(SimulatedGateway),
}

pub struct GatewayClient {
    transport: Transport,
    retry: RetryPolicy,
    dimension: usize,
}

impl GatewayClient {
    /// Build the mode the configuration asks for.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        if config.enable_real_calls {
            Self::live(config)
        } else {
            Ok(Self::simulated(config))
        }
    }

    pub fn live(config: &GatewayConfig) -> Result<Self, GatewayError> {
        Ok(Self {
            transport: Transport::Live(LiveGateway::new(config)?),
            retry: RetryPolicy::default(),
            dimension: config.embedding_dimension as usize,
        })
    }

    pub fn simulated(config: &GatewayConfig) -> Self {
        Self {
            transport: Transport::Simulated(SimulatedGateway::new(config)),
            retry: RetryPolicy::default(),
            dimension: config.embedding_dimension as usize,
        }
    }

    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self.transport, Transport::Simulated(_))
    }

    pub fn embedding_dimension(&self) -> usize {
        self.dimension
    }

    /// Request a chat completion for `prompt`.
    pub async fn complete(
        &self,
        prompt: &str,
        kind: RequestKind,
        opts: CompletionOptions,
    ) -> Result<String, GatewayError> {
        if prompt.trim().is_empty() {
            return Err(GatewayError::Invalid("empty prompt".to_string()));
        }

        let result = with_retry(&self.retry, || self.dispatch_complete(prompt, kind, opts)).await;
        finish(result)
    }

    /// Embed a single text.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, GatewayError> {
        if !is_embeddable(text) {
            return Err(GatewayError::Invalid("empty text".to_string()));
        }

        let texts = [text.to_string()];
        let vectors = self.embed_batch(&texts).await?;
        vectors
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::Permanent {
                status: 200,
                message: "embedding response contained no vector".to_string(),
            })
    }

    /// Embed a batch of texts in one call.
    ///
    /// Batch-atomic: either every text gets a vector, in input order, or
    /// the whole batch fails as one outcome. Callers that want partial
    /// success split their input into chunks (see `BatchEmbedder`).
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, GatewayError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        if texts.iter().any(|t| !is_embeddable(t)) {
            return Err(GatewayError::Invalid(
                "batch contains empty text".to_string(),
            ));
        }

        let normalized: Vec<String> = texts.iter().map(|t| normalize_for_embedding(t)).collect();

        let result = with_retry(&self.retry, || self.dispatch_embed_batch(&normalized)).await;
        let vectors = finish(result)?;

        if vectors.len() != normalized.len() {
            return Err(GatewayError::Permanent {
                status: 200,
                message: format!(
                    "embedding count {} does not match input count {}",
                    vectors.len(),
                    normalized.len()
                ),
            });
        }
        for vector in &vectors {
            if vector.len() != self.dimension {
                return Err(GatewayError::Permanent {
                    status: 200,
                    message: format!(
                        "embedding dimension {} does not match configured {}",
                        vector.len(),
                        self.dimension
                    ),
                });
            }
        }

        Ok(vectors)
    }

    async fn dispatch_complete(
        &self,
        prompt: &str,
        kind: RequestKind,
        opts: CompletionOptions,
    ) -> Result<String, GatewayError> {
        match &self.transport {
            Transport::Live(t) => t.complete(prompt, opts.max_tokens, opts.temperature).await,
            Transport::Simulated(t) => Ok(t.complete(prompt, kind).await),
        }
    }

    async fn dispatch_embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, GatewayError> {
        match &self.transport {
            Transport::Live(t) => t.embed_batch(texts).await,
            Transport::Simulated(t) => Ok(t.embed_batch(texts).await),
        }
    }
}

/// Map an exhausted retry onto the error taxonomy: a retryable error
/// that survived every attempt becomes `Unavailable`; anything else
/// passes through.
fn finish<T>(result: RetryResult<T, GatewayError>) -> Result<T, GatewayError> {
    match result {
        RetryResult::Success(value) => Ok(value),
        RetryResult::Failed {
            last_error,
            attempts,
        } => {
            if last_error.is_retryable() {
                Err(GatewayError::Unavailable {
                    attempts,
                    last_error: last_error.to_string(),
                })
            } else {
                Err(last_error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, GatewayConfig};

    fn test_client() -> GatewayClient {
        let config = GatewayConfig {
            sim_latency_ms_min: 0,
            sim_latency_ms_max: 0,
            embedding_dimension: 1536,
            ..Default::default()
        };
        GatewayClient::simulated(&config)
    }

    #[tokio::test]
    async fn test_simulated_classification_is_deterministic_and_valid() {
        let client = test_client();
        let opts = CompletionOptions {
            max_tokens: 20,
            temperature: 0.0,
        };

        let first = client
            .complete("Categoría: factura duplicada", RequestKind::Classification, opts)
            .await
            .unwrap();
        let second = client
            .complete("Categoría: factura duplicada", RequestKind::Classification, opts)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert!(first.parse::<Category>().is_ok());
    }

    #[tokio::test]
    async fn test_simulated_topics_are_comma_joined_labels() {
        let client = test_client();
        let response = client
            .complete(
                "Temas principales: cliente sin internet",
                RequestKind::TopicExtraction,
                CompletionOptions::default(),
            )
            .await
            .unwrap();

        let topics: Vec<&str> = response.split(',').map(str::trim).collect();
        assert!((2..=3).contains(&topics.len()));
        assert!(topics.iter().all(|t| !t.is_empty()));
    }

    #[tokio::test]
    async fn test_simulated_generic_response_is_marked() {
        let client = test_client();
        let response = client
            .complete("resume esta llamada", RequestKind::Generic, CompletionOptions::default())
            .await
            .unwrap();
        assert!(response.contains("simulated"));
    }

    #[tokio::test]
    async fn test_empty_prompt_is_invalid() {
        let client = test_client();
        let result = client
            .complete("   ", RequestKind::Generic, CompletionOptions::default())
            .await;
        assert!(matches!(result, Err(GatewayError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_embed_matches_configured_dimension() {
        let client = test_client();
        let vector = client.embed("hola mundo").await.unwrap();
        assert_eq!(vector.len(), 1536);
    }

    #[tokio::test]
    async fn test_embed_same_text_same_vector() {
        let client = test_client();
        let a = client.embed("plan de datos").await.unwrap();
        let b = client.embed("plan de datos").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_embed_empty_text_is_invalid() {
        let client = test_client();
        assert!(matches!(
            client.embed("").await,
            Err(GatewayError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn test_embed_batch_rejects_empty_member() {
        let client = test_client();
        let texts = vec!["hola".to_string(), "".to_string()];
        assert!(matches!(
            client.embed_batch(&texts).await,
            Err(GatewayError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn test_embed_batch_empty_input_is_empty_output() {
        let client = test_client();
        assert!(client.embed_batch(&[]).await.unwrap().is_empty());
    }

    #[test]
    fn test_finish_escalates_exhausted_retryable_to_unavailable() {
        let result: RetryResult<(), GatewayError> = RetryResult::Failed {
            last_error: GatewayError::RateLimited("429".to_string()),
            attempts: 3,
        };
        match finish(result) {
            Err(GatewayError::Unavailable { attempts, .. }) => assert_eq!(attempts, 3),
            other => panic!("expected Unavailable, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_finish_passes_permanent_through() {
        let result: RetryResult<(), GatewayError> = RetryResult::Failed {
            last_error: GatewayError::Permanent {
                status: 400,
                message: "bad request".to_string(),
            },
            attempts: 1,
        };
        assert!(matches!(
            finish(result),
            Err(GatewayError::Permanent { status: 400, .. })
        ));
    }
}
