use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub type ChatId = String;
pub type UserId = String;

/// Bucket holding the union of every user's counts.
pub const ALL_USERS: &str = "all";
/// Bucket for messages that carry no sender.
pub const UNATTRIBUTED: &str = "error";

/// Term → occurrence count. Terms with a zero count are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermCounter {
    counts: HashMap<String, u64>,
}

impl TermCounter {
    pub fn new() -> Self { Self::default() }

    pub fn add(&mut self, term: impl Into<String>, n: u64) {
        if n == 0 { return; }
        *self.counts.entry(term.into()).or_insert(0) += n;
    }

    pub fn merge(&mut self, other: &TermCounter) {
        for (term, n) in other.iter() {
            self.add(term, n);
        }
    }

    pub fn get(&self, term: &str) -> u64 { self.counts.get(term).copied().unwrap_or(0) }

    pub fn contains(&self, term: &str) -> bool { self.get(term) > 0 }

    /// Sum of all counts.
    pub fn total(&self) -> u64 { self.counts.values().sum() }

    pub fn len(&self) -> usize { self.counts.len() }

    pub fn is_empty(&self) -> bool { self.counts.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(t, n)| (t.as_str(), *n))
    }

    /// Terms by count descending, ties in lexicographic order.
    pub fn ranked(&self) -> Vec<(&str, u64)> {
        let mut v: Vec<(&str, u64)> = self.iter().collect();
        v.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        v
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for TermCounter {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut c = TermCounter::new();
        for (term, n) in iter {
            c.add(term, n);
        }
        c
    }
}

/// Per-chat counters keyed by user id, plus the [`ALL_USERS`] aggregate.
///
/// Only [`WordStat::record`] mutates the buckets, which keeps the aggregate
/// equal to the elementwise sum of the user buckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordStat {
    buckets: BTreeMap<UserId, TermCounter>,
}

impl Default for WordStat {
    fn default() -> Self {
        let mut buckets = BTreeMap::new();
        buckets.insert(ALL_USERS.to_string(), TermCounter::new());
        Self { buckets }
    }
}

impl WordStat {
    pub fn new() -> Self { Self::default() }

    /// Adds one text unit's counts to `user_id` and to the aggregate. The user
    /// bucket is created even when `counts` is empty.
    pub fn record(&mut self, user_id: &str, counts: &TermCounter) {
        self.buckets.entry(ALL_USERS.to_string()).or_default().merge(counts);
        if user_id != ALL_USERS {
            self.buckets.entry(user_id.to_string()).or_default().merge(counts);
        }
    }

    pub fn all(&self) -> &TermCounter {
        self.buckets.get(ALL_USERS).expect("aggregate bucket always present")
    }

    pub fn user(&self, user_id: &str) -> Option<&TermCounter> {
        if user_id == ALL_USERS { return None; }
        self.buckets.get(user_id)
    }

    /// User buckets, without the aggregate.
    pub fn users(&self) -> impl Iterator<Item = (&str, &TermCounter)> {
        self.buckets.iter().filter(|(k, _)| k.as_str() != ALL_USERS).map(|(k, c)| (k.as_str(), c))
    }

    /// Every bucket including the aggregate.
    pub fn buckets(&self) -> impl Iterator<Item = (&str, &TermCounter)> {
        self.buckets.iter().map(|(k, c)| (k.as_str(), c))
    }

    pub fn user_count(&self) -> usize { self.users().count() }

    pub(crate) fn from_buckets(mut buckets: BTreeMap<UserId, TermCounter>) -> Self {
        buckets.entry(ALL_USERS.to_string()).or_default();
        Self { buckets }
    }
}

/// Per-chat TF-IDF scores: user id → term → score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TfIdfTable {
    scores: BTreeMap<UserId, HashMap<String, f64>>,
}

impl TfIdfTable {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, user_id: impl Into<UserId>, scores: HashMap<String, f64>) {
        self.scores.insert(user_id.into(), scores);
    }

    pub fn user(&self, user_id: &str) -> Option<&HashMap<String, f64>> { self.scores.get(user_id) }

    pub fn score(&self, user_id: &str, term: &str) -> Option<f64> {
        self.scores.get(user_id).and_then(|s| s.get(term)).copied()
    }

    /// Users in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HashMap<String, f64>)> {
        self.scores.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize { self.scores.len() }

    pub fn is_empty(&self) -> bool { self.scores.is_empty() }
}
