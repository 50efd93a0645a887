//! # mltx
//!
//! More-like-this document retrieval: given a document already present in an
//! inverted index, derive its most discriminative terms and assemble a
//! disjunctive query that finds other documents sharing them - never the
//! seed itself.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! cargo install mltx
//! mltx --corpus docs.json --id article-42 --fields title,body
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use mltx::prelude::*;
//!
//! let index = InMemoryIndex::new();
//! index.add_document("a", &[("body", "rust borrow checker ownership")]);
//! index.add_document("b", &[("body", "rust ownership and lifetimes")]);
//! index.add_document("c", &[("body", "cooking pasta recipes")]);
//!
//! let config = MltConfig {
//!     min_term_freq: 1,
//!     min_doc_freq: 1,
//!     ..MltConfig::with_fields(["body"])
//! };
//! let mlt = MoreLikeThis::new(&index, config).unwrap();
//! let hits = mlt.find_similar("a", None, &SearchOptions::default()).unwrap();
//! assert!(hits.iter().all(|hit| hit.id != "a"));
//! ```
//!
//! ## Crate Structure
//!
//! - [`mltx-core`](https://docs.rs/mltx-core) - Term extraction, scoring,
//!   query assembly and the reference in-memory index
//!
//! ## Features
//!
//! - **Interesting-term selection**: tf/df thresholds, word-length bounds
//!   and stop words decide which terms represent a document
//! - **Pluggable idf**: classic tf-idf or BM25-style smoothed weighting
//! - **Score-proportional boosting**: optional clause weights relative to
//!   the best term
//! - **Self-exclusion**: the seed document is excluded from every query
//! - **Graceful bounding**: clause and token ceilings truncate instead of
//!   failing

// Re-export core types
pub use mltx_core::{
    Bm25Similarity, BooleanQuery, ClassicSimilarity, ClauseLimitReached, DocId, Error,
    FieldSource, IndexReader, InMemoryIndex, MltConfig, MoreLikeThis, Result, ScoredTerm,
    SearchHit, SearchOptions, Similarity, SimpleTokenizer, TermClause, TermFrequencies,
    Tokenizer,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Bm25Similarity, BooleanQuery, ClassicSimilarity, DocId, Error, FieldSource, IndexReader,
        InMemoryIndex, MltConfig, MoreLikeThis, Result, ScoredTerm, SearchHit, SearchOptions,
        Similarity, SimpleTokenizer, TermClause, Tokenizer,
    };
}
