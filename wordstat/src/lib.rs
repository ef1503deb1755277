//! Batch jobs behind the `wordstat` command line.
//!
//! Jobs read their inputs from the corpus store and must run in order:
//! `import`, then `count`, then `cloud` or `tf-idf`, then `top-words`.

pub mod import;

use anyhow::Result;
use clap::ValueEnum;
use cloud::{CloudOptions, CloudRenderer};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use wordstat_core::report::{render_human, render_json, top_words};
use wordstat_core::tfidf::tf_idf;
use wordstat_core::{CorpusStore, Normalizer, SledStore, StatError, TfIdfTable, WordCounter, WordStat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Counts words of every stored message of `chat_id` and replaces the stored counters.
pub fn count_words(store: &SledStore, normalizer: &Normalizer, chat_id: &str) -> Result<WordStat> {
    info!(chat_id, "collecting word counts");
    let messages = store.load_messages(chat_id)?;
    if messages.is_empty() {
        warn!(chat_id, "no messages with text for chat");
    }
    let stat = WordCounter::new(normalizer).count(messages);
    info!(chat_id, "storing word counts");
    store.put_counters(chat_id, &stat)?;
    Ok(stat)
}

pub fn render_clouds<S: CorpusStore + ?Sized>(
    store: &S,
    chat_id: &str,
    out_dir: &Path,
    options: &CloudOptions,
) -> Result<Vec<PathBuf>> {
    info!(chat_id, out_dir = %out_dir.display(), "rendering word clouds");
    let stat = store
        .get_counters(chat_id)?
        .ok_or_else(|| StatError::MissingCounters { chat_id: chat_id.to_string() })?;
    let renderer = CloudRenderer::new(options)?;
    renderer.render_all(&stat, out_dir)
}

pub fn compute_tfidf<S: CorpusStore + ?Sized>(store: &S, chat_id: &str) -> Result<TfIdfTable> {
    info!(chat_id, "computing tf-idf");
    let stat = store
        .get_counters(chat_id)?
        .ok_or_else(|| StatError::MissingCounters { chat_id: chat_id.to_string() })?;
    let table = tf_idf(&stat);
    store.put_tfidf(chat_id, &table)?;
    Ok(table)
}

pub fn top_words_report<S: CorpusStore + ?Sized>(store: &S, chat_id: &str, n: usize, format: OutputFormat) -> Result<String> {
    info!(chat_id, n, "top words");
    let table = store
        .get_tfidf(chat_id)?
        .ok_or_else(|| StatError::MissingTfIdf { chat_id: chat_id.to_string() })?;
    let report = top_words(&table, store, n)?;
    Ok(match format {
        OutputFormat::Human => render_human(&report),
        OutputFormat::Json => render_json(&report)?,
    })
}

/// Moves all archived messages from one chat id to another.
pub fn repoint(store: &SledStore, from: &str, to: &str) -> Result<usize> {
    let moved = store.repoint_chat(from, to)?;
    store.flush()?;
    info!(from, to, moved, "messages repointed");
    Ok(moved)
}
