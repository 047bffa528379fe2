//! Book store abstraction and the in-process document engine.
//!
//! Handlers talk to [`BookStore`] only. The store owns durable records, runs
//! [`BookQuery`] predicate descriptions eagerly, and enforces the unique ISBN
//! index atomically with the write it guards.

pub mod error;
pub mod memory;
pub mod query;
pub mod record;

use async_trait::async_trait;

pub use error::StoreError;
pub use memory::MemoryBookStore;
pub use query::{BookQuery, Condition, Field};
pub use record::{Book, NewBook};

/// Persistent collection of book records with a unique ISBN index.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Returns every record matching `query`, in insertion order.
    async fn find(&self, query: &BookQuery) -> Result<Vec<Book>, StoreError>;

    /// Looks a record up by its identifier.
    async fn get(&self, id: &str) -> Result<Option<Book>, StoreError>;

    /// Inserts a record and assigns its identifier.
    ///
    /// Fails with [`StoreError::DuplicateKey`] when the ISBN is already taken.
    async fn insert(&self, book: NewBook) -> Result<Book, StoreError>;

    /// Replaces the stored record that has `book.id`.
    ///
    /// Fails with [`StoreError::NotFound`] when the record is gone and with
    /// [`StoreError::DuplicateKey`] when another record holds the ISBN.
    async fn replace(&self, book: Book) -> Result<Book, StoreError>;

    /// Removes a record, returning whether one existed.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;
}
