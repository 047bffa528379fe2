use thiserror::Error;

/// Errors reported by a [`BookStore`](crate::BookStore).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("duplicate key on index {index}: {field} '{value}' already exists")]
    DuplicateKey {
        index: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("book {0} not found")]
    NotFound(String),
}
