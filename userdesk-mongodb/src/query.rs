//! Query translation from the userdesk filter AST to MongoDB query syntax.

use bson::{Document, doc};

use userdesk_core::{
    query::{QueryVisitor, Expr},
    error::DocumentStoreError,
};

/// Translates filter expressions into MongoDB query documents.
pub(crate) struct MongoQueryTranslator;

impl MongoQueryTranslator {
    /// Translates an optional filter; `None` becomes the match-all `{}`.
    pub(crate) fn translate(filter: Option<&Expr>) -> Result<Document, DocumentStoreError> {
        match filter {
            Some(expr) => MongoQueryTranslator.visit_expr(expr),
            None => Ok(doc! {}),
        }
    }
}

impl QueryVisitor for MongoQueryTranslator {
    type Output = Document;
    type Error = DocumentStoreError;

    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            "$or": exprs
                .iter()
                .map(|expr| self.visit_expr(expr))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    fn visit_contains(&mut self, field: &str, value: &str) -> Result<Self::Output, Self::Error> {
        // The needle is escaped so the server matches it literally.
        Ok(doc! {
            field: { "$regex": regex::escape(value), "$options": "i" }
        })
    }
}
