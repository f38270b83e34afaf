//! Deterministic simulation transport.
//!
//! Produces synthetic completions and embeddings without touching the
//! network. Output is a pure function of the input text, so repeated
//! calls agree and timing-sensitive callers still see a realistic pause.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::sleep;

use super::RequestKind;
use crate::models::{Category, GatewayConfig};
use crate::utils::text::truncate_chars;

/// Label pool for simulated topic extraction.
const SIMULATED_TOPICS: [&str; 5] = [
    "Conectividad Internet",
    "Facturación",
    "Cambio de Plan",
    "Soporte Técnico",
    "Consulta General",
];

pub(super) struct SimulatedGateway {
    latency_ms: (u64, u64),
    dimension: usize,
}

impl SimulatedGateway {
    pub(super) fn new(config: &GatewayConfig) -> Self {
        Self {
            latency_ms: (config.sim_latency_ms_min, config.sim_latency_ms_max),
            dimension: config.embedding_dimension as usize,
        }
    }

    /// Sleep a random duration inside the configured window, like a real
    /// round trip would.
    async fn pause(&self) {
        let (min, max) = self.latency_ms;
        let ms = if max > min {
            rand::thread_rng().gen_range(min..max)
        } else {
            min
        };
        if ms > 0 {
            sleep(Duration::from_millis(ms)).await;
        }
    }

    pub(super) async fn complete(&self, prompt: &str, kind: RequestKind) -> String {
        self.pause().await;

        let seed = stable_hash(prompt);
        match kind {
            RequestKind::Classification => {
                let idx = (seed % Category::ALL.len() as u64) as usize;
                Category::ALL[idx].label().to_string()
            }
            RequestKind::TopicExtraction => {
                let count = 2 + (seed % 2) as usize;
                let start = (seed / 7) as usize % SIMULATED_TOPICS.len();
                let labels: Vec<&str> = (0..count)
                    .map(|i| SIMULATED_TOPICS[(start + i) % SIMULATED_TOPICS.len()])
                    .collect();
                labels.join(", ")
            }
            RequestKind::Generic => {
                format!(
                    "simulated response for prompt starting with: {}...",
                    truncate_chars(prompt, 30)
                )
            }
        }
    }

    pub(super) async fn embed_batch(&self, texts: &[String]) -> Vec<Vec<f32>> {
        self.pause().await;
        texts
            .iter()
            .map(|t| deterministic_vector(t, self.dimension))
            .collect()
    }
}

fn stable_hash(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

/// Unit-length vector derived from the text alone: identical text maps
/// to an identical embedding, so a self-search scores cosine 1.0.
fn deterministic_vector(text: &str, dimension: usize) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(stable_hash(text));
    let mut vector: Vec<f32> = (0..dimension).map(|_| rng.gen_range(-1.0..1.0)).collect();

    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in &mut vector {
            *v /= norm;
        }
    }
    vector
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_vector_repeatable() {
        let a = deterministic_vector("hola mundo", 64);
        let b = deterministic_vector("hola mundo", 64);
        assert_eq!(a, b);

        let c = deterministic_vector("adiós", 64);
        assert_ne!(a, c);
    }

    #[test]
    fn test_deterministic_vector_unit_norm() {
        let v = deterministic_vector("texto de prueba", 1536);
        assert_eq!(v.len(), 1536);
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }
}
