use crate::message::ChatMessage;
use crate::stats::{WordStat, ALL_USERS, UNATTRIBUTED};
use crate::tokenizer::Normalizer;
use tracing::{info, warn};

const DEFAULT_PROGRESS_EVERY: usize = 1000;

/// Accumulates per-user and aggregate term counts for one chat.
pub struct WordCounter<'a> {
    normalizer: &'a Normalizer,
    progress_every: usize,
}

impl<'a> WordCounter<'a> {
    pub fn new(normalizer: &'a Normalizer) -> Self {
        Self { normalizer, progress_every: DEFAULT_PROGRESS_EVERY }
    }

    /// Log progress every `n` messages; 0 disables progress lines.
    pub fn with_progress_every(mut self, n: usize) -> Self {
        self.progress_every = n;
        self
    }

    pub fn count<I>(&self, messages: I) -> WordStat
    where
        I: IntoIterator<Item = ChatMessage>,
    {
        let iter = messages.into_iter();
        let total = iter.size_hint().1;
        let mut stat = WordStat::new();
        let mut processed = 0usize;
        for msg in iter {
            let counts = self.normalizer.count(&msg.text);
            // `all` names the aggregate, a sender with that id has no bucket of its own
            let user_id = if msg.user_id == ALL_USERS {
                warn!(user_id = ALL_USERS, "sender id is reserved, counting as unattributed");
                UNATTRIBUTED
            } else {
                msg.user_id.as_str()
            };
            stat.record(user_id, &counts);
            processed += 1;
            if self.progress_every > 0 && processed % self.progress_every == 0 {
                info!(processed, total = ?total, "counting words");
            }
        }
        info!(messages = processed, users = stat.user_count(), terms = stat.all().len(), "word count complete");
        stat
    }
}
