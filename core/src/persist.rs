use crate::error::Result;
use crate::keys::{decode_counters, decode_key, encode_counters, encode_scores};
use crate::message::{ChatMessage, StoredMessage};
use crate::stats::{TermCounter, TfIdfTable, WordStat};
use crate::store::CorpusStore;
use serde::{Deserialize, Serialize};
use sled::{Batch, Db, Tree};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use time::format_description::well_known::Rfc3339;

const CONTENT_TREE: &str = "content";
const METADATA_TREE: &str = "metadata";
const WORD_STAT_TREE: &str = "word_stat";
const TF_IDF_TREE: &str = "tf_idf";

#[derive(Debug, Serialize, Deserialize)]
pub struct CountersRecord {
    pub chat_id: String,
    pub computed_at: String,
    /// Escaped user id → counter.
    pub counters: BTreeMap<String, TermCounter>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TfIdfRecord {
    pub chat_id: String,
    pub computed_at: String,
    /// Escaped user id → term → score.
    pub scores: BTreeMap<String, HashMap<String, f64>>,
}

/// Corpus store on top of an embedded sled database.
///
/// Trees:
/// - `content`: `chat_id \0 message_id` → [`StoredMessage`]
/// - `metadata`: user id → display name
/// - `word_stat`: chat id → [`CountersRecord`]
/// - `tf_idf`: chat id → [`TfIdfRecord`]
pub struct SledStore {
    db: Db,
    content: Tree,
    metadata: Tree,
    word_stat: Tree,
    tf_idf: Tree,
}

impl SledStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    /// Store that disappears when dropped.
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    fn from_db(db: Db) -> Result<Self> {
        let content = db.open_tree(CONTENT_TREE)?;
        let metadata = db.open_tree(METADATA_TREE)?;
        let word_stat = db.open_tree(WORD_STAT_TREE)?;
        let tf_idf = db.open_tree(TF_IDF_TREE)?;
        Ok(Self { db, content, metadata, word_stat, tf_idf })
    }

    pub fn put_metadata(&self, user_id: &str, name: &str) -> Result<()> {
        self.metadata.insert(user_id.as_bytes(), name.as_bytes())?;
        Ok(())
    }

    /// Archives one message and returns the id it was stored under. Messages
    /// without an id get a generated one; an existing id is overwritten.
    pub fn insert_message(&self, message_id: Option<&str>, message: &StoredMessage) -> Result<String> {
        let id = match message_id {
            Some(id) => id.to_string(),
            None => format!("gen-{:020}", self.db.generate_id()?),
        };
        let bytes = bincode::serialize(message)?;
        self.content.insert(content_key(&message.chat_id, &id), bytes)?;
        Ok(id)
    }

    /// Messages of `chat_id` that carry text or a non-empty caption, in key order.
    pub fn load_messages(&self, chat_id: &str) -> Result<Vec<ChatMessage>> {
        let mut out = Vec::new();
        for entry in self.content.scan_prefix(content_prefix(chat_id)) {
            let (_, value) = entry?;
            let msg: StoredMessage = bincode::deserialize(&value)?;
            if msg.has_text() {
                out.push(msg.into_chat_message());
            }
        }
        Ok(out)
    }

    /// Number of archived messages for `chat_id`, with or without text.
    pub fn message_count(&self, chat_id: &str) -> Result<usize> {
        let mut n = 0;
        for entry in self.content.scan_prefix(content_prefix(chat_id)) {
            entry?;
            n += 1;
        }
        Ok(n)
    }

    /// Moves every message of `from` to `to`. Returns the number moved.
    ///
    /// A message whose id is already taken in `to` is stored under a
    /// generated id instead, so nothing in either chat is overwritten.
    pub fn repoint_chat(&self, from: &str, to: &str) -> Result<usize> {
        if from == to {
            return Ok(0);
        }
        let prefix_len = content_prefix(from).len();
        let mut batch = Batch::default();
        let mut moved = 0usize;
        for entry in self.content.scan_prefix(content_prefix(from)) {
            let (key, value) = entry?;
            let mut msg: StoredMessage = bincode::deserialize(&value)?;
            msg.chat_id = to.to_string();
            let mut new_key = content_prefix(to);
            new_key.extend_from_slice(&key[prefix_len..]);
            if self.content.contains_key(&new_key)? {
                let renamed = format!("gen-{:020}", self.db.generate_id()?);
                tracing::warn!(
                    from,
                    to,
                    message_id = %String::from_utf8_lossy(&key[prefix_len..]),
                    renamed = %renamed,
                    "message id already used in target chat"
                );
                new_key = content_key(to, &renamed);
            }
            batch.remove(key);
            batch.insert(new_key, bincode::serialize(&msg)?);
            moved += 1;
        }
        self.content.apply_batch(batch)?;
        Ok(moved)
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

impl CorpusStore for SledStore {
    fn get_counters(&self, chat_id: &str) -> Result<Option<WordStat>> {
        match self.word_stat.get(chat_id.as_bytes())? {
            Some(bytes) => {
                let rec: CountersRecord = bincode::deserialize(&bytes)?;
                Ok(Some(WordStat::from_buckets(decode_counters(rec.counters))))
            }
            None => Ok(None),
        }
    }

    fn put_counters(&self, chat_id: &str, stat: &WordStat) -> Result<()> {
        let rec = CountersRecord {
            chat_id: chat_id.to_string(),
            computed_at: now_rfc3339(),
            counters: encode_counters(stat.buckets()),
        };
        self.word_stat.insert(chat_id.as_bytes(), bincode::serialize(&rec)?)?;
        Ok(())
    }

    fn get_metadata(&self, user_id: &str) -> Result<Option<String>> {
        Ok(self
            .metadata
            .get(user_id.as_bytes())?
            .map(|v| String::from_utf8_lossy(&v).into_owned()))
    }

    fn put_tfidf(&self, chat_id: &str, table: &TfIdfTable) -> Result<()> {
        let rec = TfIdfRecord {
            chat_id: chat_id.to_string(),
            computed_at: now_rfc3339(),
            scores: encode_scores(table.iter()),
        };
        self.tf_idf.insert(chat_id.as_bytes(), bincode::serialize(&rec)?)?;
        Ok(())
    }

    fn get_tfidf(&self, chat_id: &str) -> Result<Option<TfIdfTable>> {
        match self.tf_idf.get(chat_id.as_bytes())? {
            Some(bytes) => {
                let rec: TfIdfRecord = bincode::deserialize(&bytes)?;
                let mut table = TfIdfTable::new();
                for (k, scores) in rec.scores {
                    table.insert(decode_key(&k), scores);
                }
                Ok(Some(table))
            }
            None => Ok(None),
        }
    }
}

fn content_prefix(chat_id: &str) -> Vec<u8> {
    let mut k = Vec::with_capacity(chat_id.len() + 1);
    k.extend_from_slice(chat_id.as_bytes());
    k.push(0);
    k
}

fn content_key(chat_id: &str, message_id: &str) -> Vec<u8> {
    let mut k = content_prefix(chat_id);
    k.extend_from_slice(message_id.as_bytes());
    k
}

fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default()
}
