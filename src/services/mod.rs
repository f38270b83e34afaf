mod analysis;
mod embedder;
pub mod gateway;
mod index;
mod search;
pub mod vector_store;

pub use analysis::AnalysisOrchestrator;
pub use embedder::BatchEmbedder;
pub use gateway::{CompletionOptions, GatewayClient, RequestKind};
pub use index::{CollectionMode, IndexSummary, IndexWriter};
pub use search::SearchService;
pub use vector_store::{MemoryBackend, QdrantBackend, TranscriptPoint, VectorStore, create_backend};
