mod analysis;
mod config;
mod search;
mod transcript;

pub use analysis::{Category, Classification};
pub use config::{
    Config, DEFAULT_COLLECTION, DEFAULT_EMBEDDING_DIMENSION, GatewayConfig, IndexingConfig,
    SearchConfig, VectorStoreConfig,
};
pub use search::{MAX_TOP_N, MIN_TOP_N, SearchHit, SearchMode, SearchResponse, clamp_top_n};
pub use transcript::{EmbeddingOutcome, TranscriptRecord};
