use std::collections::HashSet;

use crate::error::{Error, Result};

/// Configuration for a more-like-this run
///
/// Thresholds follow the "0 means no bound" convention: a zero
/// `min_word_length`, `max_word_length`, `max_doc_freq`, `max_query_terms`
/// or `max_num_tokens` disables that bound entirely.
#[derive(Debug, Clone)]
pub struct MltConfig {
    /// Content fields the seed document is compared on. Must be non-empty.
    pub field_names: Vec<String>,
    /// Terms occurring fewer times than this in the seed are ignored.
    pub min_term_freq: u32,
    /// Terms appearing in fewer documents than this are ignored.
    pub min_doc_freq: u64,
    /// Terms appearing in more documents than this are ignored (0 = no bound).
    pub max_doc_freq: u64,
    /// Words shorter than this are noise (0 = no bound).
    pub min_word_length: usize,
    /// Words longer than this are noise (0 = no bound).
    pub max_word_length: usize,
    /// Upper bound on should-clauses in the assembled query (0 = no bound).
    pub max_query_terms: usize,
    /// Per-field ceiling on tokens consumed when falling back to analysis
    /// of stored or source text (0 = no ceiling).
    pub max_num_tokens: usize,
    /// Weight each clause by its score relative to the best term.
    pub boost: bool,
    /// Multiplier applied on top of the relative boost weight.
    pub boost_factor: f32,
    /// Words never considered, regardless of frequency.
    pub stop_words: Option<HashSet<String>>,
    /// Identity field used for the self-exclusion clause.
    pub id_field: String,
}

impl Default for MltConfig {
    fn default() -> Self {
        Self {
            field_names: Vec::new(),
            min_term_freq: 2,
            min_doc_freq: 5,
            max_doc_freq: 0,
            min_word_length: 0,
            max_word_length: 0,
            max_query_terms: 25,
            max_num_tokens: 5000,
            boost: false,
            boost_factor: 1.0,
            stop_words: None,
            id_field: "id".to_string(),
        }
    }
}

impl MltConfig {
    /// Convenience constructor for the common case of default thresholds
    /// over a known field list.
    pub fn with_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field_names: fields.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Whether a word is excluded from consideration by the length bounds
    /// or the stop-word set. Lengths are measured in characters.
    pub fn is_noise_word(&self, word: &str) -> bool {
        let len = word.chars().count();
        if self.min_word_length > 0 && len < self.min_word_length {
            return true;
        }
        if self.max_word_length > 0 && len > self.max_word_length {
            return true;
        }
        if let Some(stop_words) = &self.stop_words {
            if stop_words.contains(word) {
                return true;
            }
        }
        false
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.field_names.is_empty() {
            return Err(Error::EmptyFieldList);
        }
        Ok(())
    }
}
