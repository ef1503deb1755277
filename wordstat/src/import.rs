use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use wordstat_core::message::InputMessage;
use wordstat_core::{SledStore, StatError};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportStats {
    pub files: usize,
    pub messages: usize,
    pub skipped: usize,
    pub senders: usize,
}

/// Archives every message found in `input` (a `.json`/`.jsonl` file or a
/// directory of them). `chat_id` fills records that do not name their chat.
pub fn import_path(store: &SledStore, input: &Path, chat_id: Option<&str>) -> Result<ImportStats> {
    let mut stats = ImportStats::default();
    for file in dump_files(input) {
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            import_jsonl(store, &file, chat_id, &mut stats)?;
        } else {
            import_json(store, &file, chat_id, &mut stats)?;
        }
        stats.files += 1;
    }
    store.flush()?;
    tracing::info!(files = stats.files, messages = stats.messages, skipped = stats.skipped, senders = stats.senders, "import complete");
    Ok(stats)
}

fn dump_files(input: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    }
    files
}

fn import_jsonl(store: &SledStore, file: &Path, chat_id: Option<&str>, stats: &mut ImportStats) -> Result<()> {
    let f = File::open(file).with_context(|| format!("open {}", file.display()))?;
    for (lineno, line) in BufReader::new(f).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let msg: InputMessage = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: invalid message record", file.display(), lineno + 1))?;
        ingest(store, msg, chat_id, stats)?;
    }
    Ok(())
}

fn import_json(store: &SledStore, file: &Path, chat_id: Option<&str>, stats: &mut ImportStats) -> Result<()> {
    let f = File::open(file).with_context(|| format!("open {}", file.display()))?;
    let json: serde_json::Value = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("{}: invalid JSON", file.display()))?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                ingest(store, serde_json::from_value(v)?, chat_id, stats)?;
            }
        }
        serde_json::Value::Object(_) => ingest(store, serde_json::from_value(json)?, chat_id, stats)?,
        _ => tracing::warn!(file = %file.display(), "ignoring JSON that is neither a record nor an array"),
    }
    Ok(())
}

fn ingest(store: &SledStore, msg: InputMessage, chat_id: Option<&str>, stats: &mut ImportStats) -> Result<()> {
    let record = match msg.into_record(chat_id) {
        Ok(r) => r,
        Err(StatError::MissingChatId { message_id }) => {
            tracing::warn!(message_id = %message_id, "skipping message without chat id");
            stats.skipped += 1;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    if let Some((user_id, name)) = &record.sender {
        store.put_metadata(user_id, name)?;
        stats.senders += 1;
    }
    store.insert_message(record.message_id.as_deref(), &record.message)?;
    stats.messages += 1;
    if stats.messages % 10_000 == 0 {
        tracing::info!(messages = stats.messages, "importing");
    }
    Ok(())
}
