// More-like-this: term extraction, relevance scoring and query assembly
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::AHashMap;
use ordered_float::OrderedFloat;

use crate::analysis::{SimpleTokenizer, Tokenizer};
use crate::config::MltConfig;
use crate::error::{Error, Result};
use crate::index::{DocId, FieldSource, IndexReader};
use crate::query::{BooleanQuery, SearchHit, SearchOptions, TermClause};
use crate::similarity::{ClassicSimilarity, Similarity};

/// Raw term -> occurrence count mapping extracted from one seed document.
pub type TermFrequencies = AHashMap<String, u32>;

/// A candidate query term with its relevance score and the field it is
/// most representative of (the field with the highest document frequency).
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTerm {
    pub word: String,
    pub field: String,
    pub score: f32,
}

// Max-heap ordering by score; ties are in unspecified order.
struct ByScore(ScoredTerm);

impl PartialEq for ByScore {
    fn eq(&self, other: &Self) -> bool {
        self.0.score == other.0.score
    }
}

impl Eq for ByScore {}

impl PartialOrd for ByScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ByScore {
    fn cmp(&self, other: &Self) -> Ordering {
        OrderedFloat(self.0.score).cmp(&OrderedFloat(other.0.score))
    }
}

/// Hook run once over the assembled query before execution.
pub type QueryHook = Box<dyn Fn(&mut BooleanQuery) + Send + Sync>;

/// Finds documents similar to a seed document already present in an index.
///
/// The pipeline extracts the seed's terms per configured field, scores the
/// interesting ones against corpus statistics, and assembles a disjunctive
/// query from the best candidates that always excludes the seed itself.
pub struct MoreLikeThis<'a, R: IndexReader> {
    config: MltConfig,
    reader: &'a R,
    similarity: Box<dyn Similarity>,
    tokenizer: Box<dyn Tokenizer>,
    append_to_query: Option<QueryHook>,
}

impl<'a, R: IndexReader> MoreLikeThis<'a, R> {
    /// Fails with [`Error::EmptyFieldList`] if the configuration names no
    /// fields to compare on.
    pub fn new(reader: &'a R, config: MltConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            reader,
            similarity: Box::new(ClassicSimilarity),
            tokenizer: Box::new(SimpleTokenizer),
            append_to_query: None,
        })
    }

    pub fn with_similarity(mut self, similarity: impl Similarity + 'static) -> Self {
        self.similarity = Box::new(similarity);
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: impl Tokenizer + 'static) -> Self {
        self.tokenizer = Box::new(tokenizer);
        self
    }

    /// Register a hook that may rewrite or extend the assembled query, e.g.
    /// to scope results to a subtype. Runs exactly once per invocation,
    /// after clause assembly and before execution.
    pub fn with_query_hook(
        mut self,
        hook: impl Fn(&mut BooleanQuery) + Send + Sync + 'static,
    ) -> Self {
        self.append_to_query = Some(Box::new(hook));
        self
    }

    pub fn config(&self) -> &MltConfig {
        &self.config
    }

    /// Collect term frequencies for the seed document over the configured
    /// fields.
    ///
    /// Per field, a stored term vector is preferred; otherwise the stored
    /// field content, or failing that the originating object's own value, is
    /// analyzed with at most `max_num_tokens` tokens consumed. A field with
    /// no content anywhere contributes nothing. Frequencies for a term seen
    /// in several fields sum into one entry.
    pub fn extract_terms(
        &self,
        doc: DocId,
        source: Option<&dyn FieldSource>,
    ) -> TermFrequencies {
        let mut freqs = TermFrequencies::default();
        for field in &self.config.field_names {
            if let Some(vector) = self.reader.term_vector(doc, field) {
                for (term, tf) in vector {
                    if self.config.is_noise_word(&term) {
                        continue;
                    }
                    *freqs.entry(term).or_insert(0) += tf;
                }
                continue;
            }

            let text = self
                .reader
                .stored_field(doc, field)
                .or_else(|| source.and_then(|s| s.field_value(field)));
            let Some(text) = text else { continue };

            let mut tokens = self.tokenizer.tokenize(field, &text);
            if self.config.max_num_tokens > 0 {
                tokens = Box::new(tokens.take(self.config.max_num_tokens));
            }
            for token in tokens {
                if self.config.is_noise_word(&token) {
                    continue;
                }
                *freqs.entry(token).or_insert(0) += 1;
            }
        }
        freqs
    }

    /// Score the extracted terms against corpus statistics, yielding a heap
    /// consumed highest score first.
    ///
    /// A term is dropped when its frequency in the seed is below
    /// `min_term_freq`, when its best document frequency is outside the
    /// `min_doc_freq`/`max_doc_freq` bounds, or when no configured field
    /// contains it at all (a stale-index artifact, excluded silently).
    fn score_terms(&self, freqs: &TermFrequencies) -> BinaryHeap<ByScore> {
        let num_docs = self.reader.num_docs();
        let mut heap = BinaryHeap::with_capacity(freqs.len());

        for (word, &tf) in freqs {
            if self.config.min_term_freq > 0 && tf < self.config.min_term_freq {
                continue;
            }

            // Representative field: highest document frequency wins, the
            // first field in configured order wins ties.
            let mut best_field = None;
            let mut doc_freq = 0u64;
            for field in &self.config.field_names {
                let df = self.reader.doc_freq(field, word);
                if df > doc_freq {
                    doc_freq = df;
                    best_field = Some(field.as_str());
                }
            }
            let Some(field) = best_field else { continue };

            if self.config.min_doc_freq > 0 && doc_freq < self.config.min_doc_freq {
                continue;
            }
            if self.config.max_doc_freq > 0 && doc_freq > self.config.max_doc_freq {
                continue;
            }

            let idf = self.similarity.idf(doc_freq, num_docs);
            heap.push(ByScore(ScoredTerm {
                word: word.clone(),
                field: field.to_string(),
                score: tf as f32 * idf,
            }));
        }
        heap
    }

    /// The terms the query would be built from, highest score first,
    /// bounded by `max_query_terms`. Useful for explain-style debugging
    /// without touching the index's search path.
    pub fn interesting_terms(
        &self,
        doc: DocId,
        source: Option<&dyn FieldSource>,
    ) -> Vec<ScoredTerm> {
        let freqs = self.extract_terms(doc, source);
        let mut heap = self.score_terms(&freqs);
        let limit = match self.config.max_query_terms {
            0 => heap.len(),
            n => n,
        };
        let mut terms = Vec::with_capacity(limit.min(heap.len()));
        while terms.len() < limit {
            let Some(ByScore(term)) = heap.pop() else { break };
            terms.push(term);
        }
        terms
    }

    /// Assemble the disjunctive query for a seed document.
    ///
    /// Should-clauses are added highest score first until `max_query_terms`
    /// is reached or the query itself refuses another clause; either stop is
    /// graceful and the partial query stands. With `boost` enabled the best
    /// term carries weight `boost_factor` and the rest scale by their score
    /// relative to the best. The seed is always excluded through a single
    /// must-not clause on the identity field.
    pub fn build_query(
        &self,
        doc: DocId,
        source: Option<&dyn FieldSource>,
        seed_id: &str,
    ) -> BooleanQuery {
        let freqs = self.extract_terms(doc, source);
        let mut heap = self.score_terms(&freqs);
        let mut query = BooleanQuery::new();

        let limit = match self.config.max_query_terms {
            0 => usize::MAX,
            n => n,
        };
        let mut best_score = 0.0f32;
        let mut added = 0usize;
        while added < limit {
            let Some(ByScore(term)) = heap.pop() else { break };
            let boost = if self.config.boost {
                if added == 0 {
                    best_score = term.score;
                }
                self.config.boost_factor * term.score / best_score
            } else {
                1.0
            };
            let clause = TermClause::with_boost(&term.field, &term.word, boost);
            if query.try_should(clause).is_err() {
                break;
            }
            added += 1;
        }

        query.push_must_not(TermClause::new(&self.config.id_field, seed_id));
        query
    }

    /// Find documents similar to the document with logical id `id`.
    ///
    /// `source` supplies field content for fields the index has neither
    /// vectorized nor stored. `options` are forwarded verbatim to query
    /// execution. A seed with no extractable content is not an error: the
    /// query degenerates to "everything but the seed's terms", which simply
    /// matches nothing.
    pub fn find_similar(
        &self,
        id: &str,
        source: Option<&dyn FieldSource>,
        options: &SearchOptions,
    ) -> Result<Vec<SearchHit>> {
        let doc = self
            .reader
            .resolve(id)
            .ok_or_else(|| Error::DocumentNotFound(id.to_string()))?;
        let mut query = self.build_query(doc, source, id);
        if let Some(hook) = &self.append_to_query {
            hook(&mut query);
        }
        self.reader.execute(&query, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::InMemoryIndex;

    fn config(fields: &[&str]) -> MltConfig {
        MltConfig {
            min_term_freq: 1,
            min_doc_freq: 1,
            ..MltConfig::with_fields(fields.iter().copied())
        }
    }

    #[test]
    fn representative_field_prefers_higher_doc_freq() {
        let index = InMemoryIndex::new();
        index.add_document("seed", &[("title", "shared"), ("body", "shared")]);
        index.add_document("other", &[("body", "shared")]);

        let mlt = MoreLikeThis::new(&index, config(&["title", "body"])).unwrap();
        let doc = index.resolve("seed").unwrap();
        let terms = mlt.interesting_terms(doc, None);
        // df(title, shared) = 1 < df(body, shared) = 2
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].field, "body");
    }

    #[test]
    fn representative_field_tie_breaks_on_field_order() {
        let index = InMemoryIndex::new();
        index.add_document("seed", &[("title", "shared"), ("body", "shared")]);

        let mlt = MoreLikeThis::new(&index, config(&["title", "body"])).unwrap();
        let doc = index.resolve("seed").unwrap();
        let terms = mlt.interesting_terms(doc, None);
        assert_eq!(terms[0].field, "title");

        let mlt = MoreLikeThis::new(&index, config(&["body", "title"])).unwrap();
        let terms = mlt.interesting_terms(doc, None);
        assert_eq!(terms[0].field, "body");
    }

    #[test]
    fn zero_doc_freq_terms_are_dropped() {
        let index = InMemoryIndex::new();
        index.add_document("seed", &[]);

        // "ghost" comes from the fallback source and exists in no indexed
        // field, so its document frequency is 0 everywhere.
        let source = serde_json::json!({ "body": "ghost ghost ghost" });
        let mlt = MoreLikeThis::new(&index, config(&["body"])).unwrap();
        let doc = index.resolve("seed").unwrap();
        let freqs = mlt.extract_terms(doc, Some(&source));
        assert_eq!(freqs.get("ghost"), Some(&3));
        assert!(mlt.interesting_terms(doc, Some(&source)).is_empty());
    }

    #[test]
    fn frequencies_merge_additively_across_fields() {
        let index = InMemoryIndex::new();
        index.add_document("seed", &[("title", "rust rust"), ("body", "rust ownership")]);

        let mlt = MoreLikeThis::new(&index, config(&["title", "body"])).unwrap();
        let doc = index.resolve("seed").unwrap();
        let freqs = mlt.extract_terms(doc, None);
        assert_eq!(freqs.get("rust"), Some(&3));
        assert_eq!(freqs.get("ownership"), Some(&1));
    }

    #[test]
    fn token_ceiling_caps_analyzed_fields() {
        let index = InMemoryIndex::new().with_term_vectors(false);
        index.add_document("seed", &[("body", "one one two two three three")]);

        let mut cfg = config(&["body"]);
        cfg.max_num_tokens = 2;
        let mlt = MoreLikeThis::new(&index, cfg).unwrap();
        let doc = index.resolve("seed").unwrap();
        let freqs = mlt.extract_terms(doc, None);
        assert_eq!(freqs.len(), 1);
        assert_eq!(freqs.get("one"), Some(&2));
    }

    #[test]
    fn stored_content_is_analyzed_when_vectors_are_missing() {
        let index = InMemoryIndex::new().with_term_vectors(false);
        index.add_document("seed", &[("body", "borrow checker borrow")]);

        let mlt = MoreLikeThis::new(&index, config(&["body"])).unwrap();
        let doc = index.resolve("seed").unwrap();
        let freqs = mlt.extract_terms(doc, None);
        assert_eq!(freqs.get("borrow"), Some(&2));
        assert_eq!(freqs.get("checker"), Some(&1));
    }

    #[test]
    fn noise_filter_applies_to_both_extraction_paths() {
        let stop: std::collections::HashSet<String> = ["the".to_string()].into_iter().collect();

        for store_vectors in [true, false] {
            let index = InMemoryIndex::new().with_term_vectors(store_vectors);
            index.add_document("seed", &[("body", "the quick the brown")]);

            let mut cfg = config(&["body"]);
            cfg.stop_words = Some(stop.clone());
            let mlt = MoreLikeThis::new(&index, cfg).unwrap();
            let doc = index.resolve("seed").unwrap();
            let freqs = mlt.extract_terms(doc, None);
            assert!(!freqs.contains_key("the"));
            assert_eq!(freqs.get("quick"), Some(&1));
        }
    }

    #[test]
    fn max_doc_freq_suppresses_saturating_terms() {
        let index = InMemoryIndex::new();
        index.add_document("seed", &[("body", "common rare")]);
        index.add_document("a", &[("body", "common")]);
        index.add_document("b", &[("body", "common")]);

        let mut cfg = config(&["body"]);
        cfg.max_doc_freq = 2;
        let mlt = MoreLikeThis::new(&index, cfg).unwrap();
        let doc = index.resolve("seed").unwrap();
        let terms = mlt.interesting_terms(doc, None);
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].word, "rare");
    }
}
