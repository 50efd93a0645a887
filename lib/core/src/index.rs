// Index collaborator interfaces and an in-memory reference implementation
use std::collections::HashMap;

use ahash::AHashMap;
use parking_lot::RwLock;
use serde_json::Value;

use crate::analysis::{SimpleTokenizer, Tokenizer};
use crate::error::Result;
use crate::query::{BooleanQuery, SearchHit, SearchOptions};

/// Internal index position of a document.
pub type DocId = u32;

/// Read access to an inverted index, as consumed by the more-like-this
/// pipeline.
///
/// Lookups report data sparsity silently: an unknown field or term has a
/// document frequency of 0, a document without a stored vector or field
/// returns `None`. Only execution can fail, so backends talking to a real
/// index over IO have somewhere to surface it.
pub trait IndexReader {
    /// Total number of documents in the corpus.
    fn num_docs(&self) -> u64;

    /// Number of documents containing `term` in `field`.
    fn doc_freq(&self, field: &str, term: &str) -> u64;

    /// Precomputed per-document term frequencies for one field, if the
    /// index stores them.
    fn term_vector(&self, doc: DocId, field: &str) -> Option<Vec<(String, u32)>>;

    /// Stored textual content of one field, if the index keeps it.
    fn stored_field(&self, doc: DocId, field: &str) -> Option<String>;

    /// Resolve a logical document id to its internal position.
    fn resolve(&self, id: &str) -> Option<DocId>;

    /// Run a query and return hits ordered by descending score.
    fn execute(&self, query: &BooleanQuery, options: &SearchOptions) -> Result<Vec<SearchHit>>;
}

/// Fallback source of field content for documents whose fields are neither
/// vectorized nor stored in the index: typically the originating domain
/// record itself.
pub trait FieldSource {
    fn field_value(&self, field: &str) -> Option<String>;
}

impl FieldSource for Value {
    fn field_value(&self, field: &str) -> Option<String> {
        self.get(field).and_then(|v| v.as_str()).map(str::to_string)
    }
}

impl FieldSource for HashMap<String, String> {
    fn field_value(&self, field: &str) -> Option<String> {
        self.get(field).cloned()
    }
}

#[derive(Default)]
struct Inner {
    // field -> term -> (doc -> term frequency)
    postings: AHashMap<String, AHashMap<String, AHashMap<DocId, u32>>>,
    // doc -> field -> stored text
    stored: Vec<AHashMap<String, String>>,
    // doc -> field -> term vector
    vectors: Vec<AHashMap<String, Vec<(String, u32)>>>,
    // doc -> logical id
    ids: Vec<String>,
    id_map: AHashMap<String, DocId>,
}

/// In-memory per-field inverted index.
///
/// Reference implementation of [`IndexReader`], sufficient to run the full
/// more-like-this pipeline without an external engine. The logical id is
/// indexed as a term under the identity field so must-not exclusions by id
/// resolve through the ordinary postings path.
pub struct InMemoryIndex {
    inner: RwLock<Inner>,
    tokenizer: Box<dyn Tokenizer>,
    id_field: String,
    store_term_vectors: bool,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            tokenizer: Box::new(SimpleTokenizer),
            id_field: "id".to_string(),
            store_term_vectors: true,
        }
    }

    /// Keep (or skip) per-document term vectors. With vectors disabled the
    /// pipeline falls back to re-analyzing stored content.
    pub fn with_term_vectors(mut self, store_term_vectors: bool) -> Self {
        self.store_term_vectors = store_term_vectors;
        self
    }

    pub fn with_id_field(mut self, id_field: impl Into<String>) -> Self {
        self.id_field = id_field.into();
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: impl Tokenizer + 'static) -> Self {
        self.tokenizer = Box::new(tokenizer);
        self
    }

    /// Index a document. Adding an id that already exists is a no-op and
    /// returns the original position.
    pub fn add_document(&self, id: &str, fields: &[(&str, &str)]) -> DocId {
        let mut inner = self.inner.write();
        if let Some(&doc) = inner.id_map.get(id) {
            return doc;
        }
        let doc = inner.ids.len() as DocId;
        inner.ids.push(id.to_string());
        inner.id_map.insert(id.to_string(), doc);
        inner.stored.push(AHashMap::new());
        inner.vectors.push(AHashMap::new());

        inner
            .postings
            .entry(self.id_field.clone())
            .or_default()
            .entry(id.to_string())
            .or_default()
            .insert(doc, 1);

        for (field, text) in fields {
            let mut freqs: AHashMap<String, u32> = AHashMap::new();
            for token in self.tokenizer.tokenize(field, text) {
                *freqs.entry(token).or_insert(0) += 1;
            }

            let field_postings = inner.postings.entry((*field).to_string()).or_default();
            for (term, tf) in &freqs {
                field_postings.entry(term.clone()).or_default().insert(doc, *tf);
            }

            if self.store_term_vectors {
                let vector: Vec<(String, u32)> = freqs.into_iter().collect();
                inner.vectors[doc as usize].insert((*field).to_string(), vector);
            }
            inner.stored[doc as usize].insert((*field).to_string(), (*text).to_string());
        }

        doc
    }

    /// Index a document from a JSON object, taking every string-valued
    /// field except the identity field itself.
    pub fn add_json(&self, id: &str, fields: &Value) -> DocId {
        let pairs: Vec<(&str, &str)> = fields
            .as_object()
            .map(|object| {
                object
                    .iter()
                    .filter(|(key, _)| key.as_str() != self.id_field)
                    .filter_map(|(key, value)| value.as_str().map(|text| (key.as_str(), text)))
                    .collect()
            })
            .unwrap_or_default();
        self.add_document(id, &pairs)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().ids.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().ids.is_empty()
    }
}

impl Default for InMemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexReader for InMemoryIndex {
    fn num_docs(&self) -> u64 {
        self.inner.read().ids.len() as u64
    }

    fn doc_freq(&self, field: &str, term: &str) -> u64 {
        let inner = self.inner.read();
        inner
            .postings
            .get(field)
            .and_then(|terms| terms.get(term))
            .map(|docs| docs.len() as u64)
            .unwrap_or(0)
    }

    fn term_vector(&self, doc: DocId, field: &str) -> Option<Vec<(String, u32)>> {
        let inner = self.inner.read();
        inner.vectors.get(doc as usize)?.get(field).cloned()
    }

    fn stored_field(&self, doc: DocId, field: &str) -> Option<String> {
        let inner = self.inner.read();
        inner.stored.get(doc as usize)?.get(field).cloned()
    }

    fn resolve(&self, id: &str) -> Option<DocId> {
        self.inner.read().id_map.get(id).copied()
    }

    fn execute(&self, query: &BooleanQuery, options: &SearchOptions) -> Result<Vec<SearchHit>> {
        let inner = self.inner.read();
        let num_docs = inner.ids.len() as f32;
        let mut scores: AHashMap<DocId, f32> = AHashMap::new();

        for clause in query.should_clauses() {
            let Some(docs) = inner
                .postings
                .get(&clause.field)
                .and_then(|terms| terms.get(&clause.term))
            else {
                continue;
            };
            let df = docs.len() as f32;
            let idf = (1.0 + (num_docs - df + 0.5) / (df + 0.5)).ln();
            for (&doc, &tf) in docs {
                *scores.entry(doc).or_insert(0.0) += clause.boost * idf * tf as f32;
            }
        }

        for clause in query.must_not_clauses() {
            let Some(docs) = inner
                .postings
                .get(&clause.field)
                .and_then(|terms| terms.get(&clause.term))
            else {
                continue;
            };
            for &doc in docs.keys() {
                scores.remove(&doc);
            }
        }

        if let Some(scope) = &options.scope {
            let in_scope = inner
                .postings
                .get(&scope.field)
                .and_then(|terms| terms.get(&scope.term));
            scores.retain(|doc, _| in_scope.is_some_and(|docs| docs.contains_key(doc)));
        }

        let mut hits: Vec<SearchHit> = scores
            .into_iter()
            .map(|(doc, score)| SearchHit {
                doc,
                id: inner.ids[doc as usize].clone(),
                score,
            })
            .collect();
        if let Some(min_score) = options.min_score {
            hits.retain(|hit| hit.score >= min_score);
        }
        hits.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.doc.cmp(&b.doc)));
        hits.truncate(options.limit);
        Ok(hits)
    }
}
