pub mod counter;
pub mod error;
pub mod keys;
pub mod message;
pub mod persist;
pub mod report;
pub mod stats;
pub mod store;
pub mod tfidf;
pub mod tokenizer;

pub use counter::WordCounter;
pub use error::{Result, StatError};
pub use message::ChatMessage;
pub use persist::SledStore;
pub use stats::*;
pub use store::{CorpusStore, MemoryStore};
pub use tokenizer::Normalizer;
