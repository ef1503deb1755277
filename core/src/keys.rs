//! Escaping of identifiers used as sub-keys inside stored records.
//!
//! Record field names may not start with `$` and may not contain `.`. Chat
//! archives use `$`-prefixed peer ids, so every user id goes through
//! [`encode_key`] on the way into the store and [`decode_key`] on the way out.
//! `%` introduces an escape, so it is escaped as well.

use crate::stats::TermCounter;
use std::collections::{BTreeMap, HashMap};

pub fn encode_key(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for (i, ch) in id.chars().enumerate() {
        match ch {
            '%' => out.push_str("%25"),
            '.' => out.push_str("%2E"),
            '$' if i == 0 => out.push_str("%24"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn decode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut rest = key;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let unescaped = match tail.get(..3) {
            Some("%25") => Some('%'),
            Some("%2E") => Some('.'),
            Some("%24") => Some('$'),
            _ => None,
        };
        match unescaped {
            Some(ch) => {
                out.push(ch);
                rest = &tail[3..];
            }
            None => {
                out.push('%');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

pub(crate) fn encode_counters<'a, I>(buckets: I) -> BTreeMap<String, TermCounter>
where
    I: IntoIterator<Item = (&'a str, &'a TermCounter)>,
{
    buckets.into_iter().map(|(k, c)| (encode_key(k), c.clone())).collect()
}

pub(crate) fn decode_counters(stored: BTreeMap<String, TermCounter>) -> BTreeMap<String, TermCounter> {
    stored.into_iter().map(|(k, c)| (decode_key(&k), c)).collect()
}

pub(crate) fn encode_scores<'a, I>(users: I) -> BTreeMap<String, HashMap<String, f64>>
where
    I: IntoIterator<Item = (&'a str, &'a HashMap<String, f64>)>,
{
    users.into_iter().map(|(k, s)| (encode_key(k), s.clone())).collect()
}
