use crate::error::{Result, StatError};
use crate::stats::{TfIdfTable, UNATTRIBUTED};
use crate::store::CorpusStore;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write;

pub const DEFAULT_TOP_N: usize = 10;
/// Header used for the bucket of messages without a sender.
pub const UNATTRIBUTED_NAME: &str = "(unattributed)";

const BANNER: &str = "===========================";

/// Maps user ids to display names.
pub trait NameResolver {
    fn display_name(&self, user_id: &str) -> Result<Option<String>>;
}

impl<S: CorpusStore + ?Sized> NameResolver for S {
    fn display_name(&self, user_id: &str) -> Result<Option<String>> { self.get_metadata(user_id) }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedTerm {
    pub term: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserTopWords {
    pub user_id: String,
    pub name: String,
    pub terms: Vec<RankedTerm>,
}

/// First `n` terms by score descending; equal scores in lexicographic term order.
pub fn rank_terms(scores: &HashMap<String, f64>, n: usize) -> Vec<RankedTerm> {
    let mut ranked: Vec<(&String, f64)> = scores.iter().map(|(t, s)| (t, *s)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(n)
        .map(|(term, score)| RankedTerm { term: term.clone(), score })
        .collect()
}

/// Top `n` terms for every user of the table, users in id order.
///
/// Fails with [`StatError::UnknownUser`] on the first user the resolver does
/// not know.
pub fn top_words<R: NameResolver + ?Sized>(table: &TfIdfTable, resolver: &R, n: usize) -> Result<Vec<UserTopWords>> {
    let mut report = Vec::with_capacity(table.len());
    for (user_id, scores) in table.iter() {
        let name = if user_id == UNATTRIBUTED {
            UNATTRIBUTED_NAME.to_string()
        } else {
            resolver
                .display_name(user_id)?
                .ok_or_else(|| StatError::UnknownUser { user_id: user_id.to_string() })?
        };
        report.push(UserTopWords { user_id: user_id.to_string(), name, terms: rank_terms(scores, n) });
    }
    Ok(report)
}

pub fn render_human(report: &[UserTopWords]) -> String {
    let mut out = String::new();
    for user in report {
        let _ = writeln!(out, "\n{BANNER}\n{}\n{BANNER}", user.name);
        for t in &user.terms {
            let _ = writeln!(out, "{:<20}{:.5}", t.term, t.score);
        }
    }
    out
}

pub fn render_json(report: &[UserTopWords]) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
