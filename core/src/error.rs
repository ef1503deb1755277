use thiserror::Error;

/// Errors surfaced by the statistics jobs and the corpus store.
#[derive(Error, Debug)]
pub enum StatError {
    // Precondition failures: commands run out of order
    #[error("no word counts stored for chat {chat_id}; run `count` first")]
    MissingCounters { chat_id: String },

    #[error("no tf-idf table stored for chat {chat_id}; run `tf-idf` first")]
    MissingTfIdf { chat_id: String },

    #[error("no display name recorded for user {user_id}")]
    UnknownUser { user_id: String },

    #[error("message {message_id} has no chat id and none was supplied")]
    MissingChatId { message_id: String },

    // Storage failures
    #[error("store error: {0}")]
    Store(#[from] sled::Error),

    #[error("encoding error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StatError>;
