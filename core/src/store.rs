use crate::error::Result;
use crate::keys::{decode_counters, decode_key, encode_counters, encode_scores};
use crate::stats::{TermCounter, TfIdfTable, WordStat};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

/// Persistence seen by the statistics jobs.
///
/// Identifiers are passed in their natural form; implementations escape user
/// sub-keys with [`crate::keys::encode_key`] and hand back decoded ids.
/// Every `put_*` replaces whatever was stored for the chat.
pub trait CorpusStore {
    fn get_counters(&self, chat_id: &str) -> Result<Option<WordStat>>;
    fn put_counters(&self, chat_id: &str, stat: &WordStat) -> Result<()>;
    fn get_metadata(&self, user_id: &str) -> Result<Option<String>>;
    fn put_tfidf(&self, chat_id: &str, table: &TfIdfTable) -> Result<()>;
    fn get_tfidf(&self, chat_id: &str) -> Result<Option<TfIdfTable>>;
}

/// In-process store with the same key handling as the on-disk one.
#[derive(Default)]
pub struct MemoryStore {
    counters: RwLock<HashMap<String, BTreeMap<String, TermCounter>>>,
    tf_idf: RwLock<HashMap<String, BTreeMap<String, HashMap<String, f64>>>>,
    metadata: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    pub fn put_metadata(&self, user_id: &str, name: &str) {
        self.metadata.write().insert(user_id.to_string(), name.to_string());
    }
}

impl CorpusStore for MemoryStore {
    fn get_counters(&self, chat_id: &str) -> Result<Option<WordStat>> {
        let stored = self.counters.read().get(chat_id).cloned();
        Ok(stored.map(|b| WordStat::from_buckets(decode_counters(b))))
    }

    fn put_counters(&self, chat_id: &str, stat: &WordStat) -> Result<()> {
        self.counters.write().insert(chat_id.to_string(), encode_counters(stat.buckets()));
        Ok(())
    }

    fn get_metadata(&self, user_id: &str) -> Result<Option<String>> {
        Ok(self.metadata.read().get(user_id).cloned())
    }

    fn put_tfidf(&self, chat_id: &str, table: &TfIdfTable) -> Result<()> {
        self.tf_idf.write().insert(chat_id.to_string(), encode_scores(table.iter()));
        Ok(())
    }

    fn get_tfidf(&self, chat_id: &str) -> Result<Option<TfIdfTable>> {
        let stored = self.tf_idf.read().get(chat_id).cloned();
        Ok(stored.map(|users| {
            let mut table = TfIdfTable::new();
            for (k, scores) in users {
                table.insert(decode_key(&k), scores);
            }
            table
        }))
    }
}
