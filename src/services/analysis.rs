//! Transcript analysis: topic extraction and classification.
//!
//! Stateless over the injected gateway: identical input against a
//! deterministic gateway yields identical output. Failures degrade to
//! empty results with a log line, never an error the boundary has to
//! unwrap.

use std::sync::Arc;

use crate::models::{Category, Classification};
use crate::services::gateway::{CompletionOptions, GatewayClient, RequestKind};
use crate::utils::text::truncate_chars;

/// Longest transcript prefix included in a prompt, to stay inside the
/// completion token budget.
const PROMPT_CHAR_BUDGET: usize = 4000;

const TOPIC_OPTIONS: CompletionOptions = CompletionOptions {
    max_tokens: 50,
    temperature: 0.1,
};

const CLASSIFY_OPTIONS: CompletionOptions = CompletionOptions {
    max_tokens: 20,
    temperature: 0.0,
};

fn build_topic_prompt(transcript_text: &str) -> String {
    format!(
        "Analiza la siguiente transcripción de una llamada de atención al cliente.\n\
         Extrae los 2 o 3 temas o problemas principales discutidos.\n\
         Responde únicamente con una lista de temas breves separados por comas. \
         No incluyas introducciones ni explicaciones.\n\
         \n\
         Transcripción:\n\
         ---\n\
         {transcript_text}\n\
         ---\n\
         Temas principales:"
    )
}

fn build_classification_prompt(transcript_text: &str) -> String {
    format!(
        "Clasifica la siguiente transcripción de atención al cliente en UNA de las \
         siguientes categorías:\n\
         {categories}\n\
         \n\
         Responde únicamente con el nombre exacto de la categoría elegida. \
         No añadas ninguna otra palabra o puntuación.\n\
         \n\
         Transcripción:\n\
         ---\n\
         {transcript_text}\n\
         ---\n\
         Categoría:",
        categories = Category::prompt_list(),
    )
}

pub struct AnalysisOrchestrator {
    gateway: Arc<GatewayClient>,
}

impl AnalysisOrchestrator {
    pub fn new(gateway: Arc<GatewayClient>) -> Self {
        Self { gateway }
    }

    /// Extract the 2-3 main topics of a transcript.
    ///
    /// Empty input or a failed completion yields an empty list.
    pub async fn extract_topics(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let prompt = build_topic_prompt(truncate_chars(text, PROMPT_CHAR_BUDGET));
        match self
            .gateway
            .complete(&prompt, RequestKind::TopicExtraction, TOPIC_OPTIONS)
            .await
        {
            Ok(response) => {
                let topics: Vec<String> = response
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect();
                tracing::debug!(count = topics.len(), "topics extracted");
                topics
            }
            Err(e) => {
                tracing::warn!(error = %e, "topic extraction failed");
                Vec::new()
            }
        }
    }

    /// Classify a transcript into the fixed category set.
    ///
    /// A response that matches an enumerated label verbatim is verified;
    /// anything else comes back as `Unverified` raw text for human
    /// review. Empty input yields no result; so does a gateway failure.
    pub async fn classify(&self, text: &str) -> Option<Classification> {
        if text.trim().is_empty() {
            return None;
        }

        let prompt = build_classification_prompt(truncate_chars(text, PROMPT_CHAR_BUDGET));
        match self
            .gateway
            .complete(&prompt, RequestKind::Classification, CLASSIFY_OPTIONS)
            .await
        {
            Ok(response) => match response.parse::<Category>() {
                Ok(category) => Some(Classification::Category(category)),
                Err(_) => {
                    tracing::warn!(response = %response, "classification did not match any category");
                    Some(Classification::Unverified(response))
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "classification failed");
                None
            }
        }
    }
}
