// Disjunctive boolean queries assembled by the more-like-this builder
use serde::{Deserialize, Serialize};

use crate::index::DocId;

/// Default ceiling on the total number of clauses a query accepts.
pub const DEFAULT_MAX_CLAUSE_COUNT: usize = 1024;

/// A single-term condition scoped to one field, with an optional weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermClause {
    pub field: String,
    pub term: String,
    pub boost: f32,
}

impl TermClause {
    pub fn new(field: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            term: term.into(),
            boost: 1.0,
        }
    }

    pub fn with_boost(field: impl Into<String>, term: impl Into<String>, boost: f32) -> Self {
        Self {
            field: field.into(),
            term: term.into(),
            boost,
        }
    }
}

/// Signal that a query refused another clause. Normal control flow for the
/// query builder, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClauseLimitReached;

/// A disjunctive boolean query: optional should-clauses that raise match
/// relevance, and must-not clauses that exclude documents outright.
#[derive(Debug, Clone)]
pub struct BooleanQuery {
    should: Vec<TermClause>,
    must_not: Vec<TermClause>,
    max_clause_count: usize,
}

impl BooleanQuery {
    pub fn new() -> Self {
        Self {
            should: Vec::new(),
            must_not: Vec::new(),
            max_clause_count: DEFAULT_MAX_CLAUSE_COUNT,
        }
    }

    pub fn with_max_clause_count(mut self, max_clause_count: usize) -> Self {
        self.max_clause_count = max_clause_count;
        self
    }

    /// Chaining variant of [`try_should`](Self::try_should); a clause over
    /// capacity is silently dropped.
    pub fn should(mut self, clause: TermClause) -> Self {
        let _ = self.try_should(clause);
        self
    }

    pub fn must_not(mut self, clause: TermClause) -> Self {
        self.push_must_not(clause);
        self
    }

    /// Add a should-clause, refusing once the clause ceiling is reached.
    pub fn try_should(&mut self, clause: TermClause) -> Result<(), ClauseLimitReached> {
        if self.clause_count() >= self.max_clause_count {
            return Err(ClauseLimitReached);
        }
        self.should.push(clause);
        Ok(())
    }

    /// Must-not clauses are exclusions and are never refused; a query that
    /// cannot exclude its seed document is worse than an over-long one.
    pub fn push_must_not(&mut self, clause: TermClause) {
        self.must_not.push(clause);
    }

    pub fn should_clauses(&self) -> &[TermClause] {
        &self.should
    }

    pub fn must_not_clauses(&self) -> &[TermClause] {
        &self.must_not
    }

    pub fn clause_count(&self) -> usize {
        self.should.len() + self.must_not.len()
    }

    pub fn is_empty(&self) -> bool {
        self.should.is_empty() && self.must_not.is_empty()
    }
}

impl Default for BooleanQuery {
    fn default() -> Self {
        Self::new()
    }
}

/// Caller-supplied options forwarded verbatim to query execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Maximum number of hits returned.
    pub limit: usize,
    /// Drop hits scoring below this value.
    pub min_score: Option<f32>,
    /// Only return documents matching this clause, e.g. a type or kind
    /// field restricting results to one family of records.
    pub scope: Option<TermClause>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            min_score: None,
            scope: None,
        }
    }
}

/// A matching document with its relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Internal index position.
    pub doc: DocId,
    /// Logical document id.
    pub id: String,
    /// The relevance score.
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_should_refuses_past_capacity() {
        let mut query = BooleanQuery::new().with_max_clause_count(2);
        assert!(query.try_should(TermClause::new("body", "one")).is_ok());
        assert!(query.try_should(TermClause::new("body", "two")).is_ok());
        assert_eq!(
            query.try_should(TermClause::new("body", "three")),
            Err(ClauseLimitReached)
        );
        assert_eq!(query.should_clauses().len(), 2);
    }

    #[test]
    fn must_not_ignores_capacity() {
        let mut query = BooleanQuery::new().with_max_clause_count(1);
        assert!(query.try_should(TermClause::new("body", "one")).is_ok());
        query.push_must_not(TermClause::new("id", "doc1"));
        assert_eq!(query.must_not_clauses().len(), 1);
    }

    #[test]
    fn builder_chaining() {
        let query = BooleanQuery::new()
            .should(TermClause::new("body", "rust"))
            .should(TermClause::with_boost("title", "rust", 0.5))
            .must_not(TermClause::new("id", "doc1"));
        assert_eq!(query.should_clauses().len(), 2);
        assert_eq!(query.must_not_clauses().len(), 1);
        assert_eq!(query.clause_count(), 3);
        assert!(!query.is_empty());
    }
}
