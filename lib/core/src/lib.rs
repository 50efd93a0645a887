//! # mltx Core
//!
//! Core library for mltx more-like-this retrieval.
//!
//! This crate provides the fundamental data structures and algorithms:
//!
//! - [`MoreLikeThis`] - Term extraction, scoring and query assembly pipeline
//! - [`MltConfig`] - Thresholds and bounds for one pipeline run
//! - [`BooleanQuery`] - Disjunctive query with should and must-not clauses
//! - [`IndexReader`] - Read interface to an inverted index
//! - [`InMemoryIndex`] - In-memory reference index implementation
//! - [`Similarity`] - Pluggable idf strategy
//!
//! ## Example
//!
//! ```rust
//! use mltx_core::{InMemoryIndex, MltConfig, MoreLikeThis, SearchOptions};
//!
//! // Index a small corpus
//! let index = InMemoryIndex::new();
//! index.add_document("a", &[("body", "rust borrow checker ownership")]);
//! index.add_document("b", &[("body", "rust ownership and lifetimes")]);
//! index.add_document("c", &[("body", "cooking pasta recipes")]);
//!
//! // Find documents similar to "a"
//! let config = MltConfig {
//!     min_term_freq: 1,
//!     min_doc_freq: 1,
//!     ..MltConfig::with_fields(["body"])
//! };
//! let mlt = MoreLikeThis::new(&index, config).unwrap();
//! let hits = mlt.find_similar("a", None, &SearchOptions::default()).unwrap();
//!
//! // The seed itself is never returned
//! assert!(hits.iter().all(|hit| hit.id != "a"));
//! assert_eq!(hits[0].id, "b");
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod index;
pub mod mlt;
pub mod query;
pub mod similarity;

pub use analysis::{SimpleTokenizer, TokenStream, Tokenizer};
pub use config::MltConfig;
pub use error::{Error, Result};
pub use index::{DocId, FieldSource, IndexReader, InMemoryIndex};
pub use mlt::{MoreLikeThis, QueryHook, ScoredTerm, TermFrequencies};
pub use query::{
    BooleanQuery, ClauseLimitReached, SearchHit, SearchOptions, TermClause,
    DEFAULT_MAX_CLAUSE_COUNT,
};
pub use similarity::{Bm25Similarity, ClassicSimilarity, Similarity};
