//! Query expression evaluation for in-memory document filtering.

use bson::{Bson, Document};

use userdesk_core::{
    query::{QueryVisitor, Expr},
    error::{DocumentStoreError, DocumentStoreResult},
};

/// Case-insensitive substring test used by `Contains`.
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_lowercase()
        .contains(&needle.to_lowercase())
}

pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Document,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Bson) -> DocumentStoreResult<Self> {
        document
            .as_document()
            .map(|document| Self { document })
            .ok_or_else(|| DocumentStoreError::InvalidDocument("Expected document".into()))
    }

    /// Returns whether `document` satisfies `expr`; no filter matches everything.
    pub fn matches(document: &'a Bson, expr: Option<&Expr>) -> DocumentStoreResult<bool> {
        match expr {
            Some(expr) => DocumentEvaluator::new(document)?.visit_expr(expr),
            None => Ok(true),
        }
    }
}

impl<'a> QueryVisitor for DocumentEvaluator<'a> {
    type Output = bool;
    type Error = DocumentStoreError;

    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if self.visit_expr(expr)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn visit_contains(&mut self, field: &str, value: &str) -> Result<Self::Output, Self::Error> {
        Ok(match self.document.get(field) {
            Some(Bson::String(text)) => contains_ignore_case(text, value),
            _ => false,
        })
    }
}
