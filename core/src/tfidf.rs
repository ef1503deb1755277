use crate::stats::{TfIdfTable, WordStat};
use std::collections::HashMap;
use tracing::{debug, info};

/// Number of user buckets containing each term. The aggregate bucket is not a
/// document and is ignored.
pub fn document_frequency(stat: &WordStat) -> HashMap<&str, u32> {
    let mut df: HashMap<&str, u32> = HashMap::new();
    for (_, counter) in stat.users() {
        for (term, n) in counter.iter() {
            if n > 0 {
                *df.entry(term).or_insert(0) += 1;
            }
        }
    }
    df
}

/// TF-IDF per user and term: `count / total(user) * ln(N / df)` with N the
/// number of user buckets. Users without words get no entry.
pub fn tf_idf(stat: &WordStat) -> TfIdfTable {
    let n = stat.user_count();
    let df = document_frequency(stat);
    let mut table = TfIdfTable::new();
    for (user, counter) in stat.users() {
        let total = counter.total();
        if total == 0 {
            debug!(user, "skipping user without words");
            continue;
        }
        let mut scores = HashMap::with_capacity(counter.len());
        for (term, count) in counter.iter() {
            if count == 0 { continue; }
            let df_t = df.get(term).copied().unwrap_or(1).max(1);
            let tf = count as f64 / total as f64;
            let idf = (n as f64 / df_t as f64).ln();
            scores.insert(term.to_string(), tf * idf);
        }
        table.insert(user, scores);
    }
    info!(users = n, terms = df.len(), "tf-idf computed");
    table
}
