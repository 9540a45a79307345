//! Store-neutral query construction and filtering.
//!
//! A [`Query`] carries an optional filter expression plus offset/limit. Backends turn
//! the expression tree into their own representation through [`QueryVisitor`]: the
//! in-memory backend evaluates it per document, the MongoDB backend translates it into
//! a filter document.
//!
//! ```ignore
//! use userdesk_core::query::{Query, Filter};
//!
//! let query = Query::builder()
//!     .maybe_filter(Some(Filter::or([
//!         Filter::contains("name", "ada"),
//!         Filter::contains("email", "ada"),
//!     ])))
//!     .offset(10)
//!     .limit(5)
//!     .build();
//! ```
//!
//! # Filter semantics
//!
//! `Contains` is a **case-insensitive substring** match on a string field. The needle
//! is literal text, never a pattern. A missing, null or non-string field never matches.

use crate::error::DocumentStoreError;

/// A filter expression for querying documents.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Logical OR of multiple expressions (any must match).
    Or(Vec<Expr>),
    /// The string field contains `value`, ignoring case.
    Contains {
        field: String,
        value: String,
    },
}

/// A structured query for retrieving documents.
///
/// Use [`QueryBuilder`] for ergonomic construction.
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Optional filter expression to match documents. `None` matches everything.
    pub filter: Option<Expr>,
    /// Maximum number of documents to return.
    pub limit: Option<usize>,
    /// Number of documents to skip (for pagination).
    pub offset: Option<usize>,
}

impl Query {
    /// Creates a new query builder for fluent construction.
    pub fn builder() -> QueryBuilder {
        QueryBuilder::default()
    }
}

/// Helper struct for constructing filter expressions.
pub struct Filter;

impl Filter {
    /// Matches documents where the string field contains the value, ignoring case.
    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Expr {
        Expr::Contains { field: field.into(), value: value.into() }
    }

    /// Combines expressions such that any can match.
    pub fn or(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::Or(exprs.into_iter().collect())
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    /// Sets the filter expression if one is given, leaving the query unfiltered otherwise.
    pub fn maybe_filter(mut self, filter: Option<Expr>) -> Self {
        self.query.filter = filter;
        self
    }

    /// Sets the maximum number of documents to return.
    pub fn limit(mut self, limit: usize) -> Self {
        self.query.limit = Some(limit);
        self
    }

    /// Sets the number of documents to skip.
    pub fn offset(mut self, offset: usize) -> Self {
        self.query.offset = Some(offset);
        self
    }

    /// Builds and returns the final query.
    pub fn build(self) -> Query {
        self.query
    }
}

/// Traversal seam for backends that interpret filter expressions.
pub trait QueryVisitor {
    type Output;
    type Error: Into<DocumentStoreError>;

    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_contains(&mut self, field: &str, value: &str) -> Result<Self::Output, Self::Error>;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        match expr {
            Expr::Or(exprs) => self.visit_or(exprs),
            Expr::Contains { field, value } => self.visit_contains(field, value),
        }
    }
}
