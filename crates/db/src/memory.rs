use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{Book, BookQuery, BookStore, NewBook, StoreError};

const ISBN_INDEX: &str = "isbn_index";

#[derive(Default)]
struct Collection {
    next_seq: u64,
    // Keyed by insertion sequence so iteration yields natural order.
    records: BTreeMap<u64, Book>,
    by_id: HashMap<String, u64>,
    isbn_index: HashMap<String, String>,
}

impl Collection {
    fn isbn_owner(&self, isbn: &str) -> Option<&str> {
        self.isbn_index.get(isbn).map(String::as_str)
    }

    fn duplicate_isbn(isbn: &str) -> StoreError {
        StoreError::DuplicateKey {
            index: ISBN_INDEX,
            field: "isbn",
            value: isbn.to_string(),
        }
    }
}

/// In-process book store.
///
/// All state sits behind a single `RwLock`; index checks and the writes they
/// guard happen under the same write guard, so concurrent inserts of one ISBN
/// produce exactly one winner.
#[derive(Default)]
pub struct MemoryBookStore {
    collection: RwLock<Collection>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.collection.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn find(&self, query: &BookQuery) -> Result<Vec<Book>, StoreError> {
        let collection = self.collection.read().await;
        Ok(collection
            .records
            .values()
            .filter(|book| query.matches(book))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Book>, StoreError> {
        let collection = self.collection.read().await;
        Ok(collection
            .by_id
            .get(id)
            .and_then(|seq| collection.records.get(seq))
            .cloned())
    }

    async fn insert(&self, book: NewBook) -> Result<Book, StoreError> {
        let mut collection = self.collection.write().await;

        if collection.isbn_owner(&book.isbn).is_some() {
            return Err(Collection::duplicate_isbn(&book.isbn));
        }

        let id = Uuid::now_v7().simple().to_string();
        let book = book.into_book(id);
        let seq = collection.next_seq;
        collection.next_seq += 1;

        collection
            .isbn_index
            .insert(book.isbn.clone(), book.id.clone());
        collection.by_id.insert(book.id.clone(), seq);
        collection.records.insert(seq, book.clone());

        tracing::debug!(id = %book.id, isbn = %book.isbn, "book inserted");
        Ok(book)
    }

    async fn replace(&self, book: Book) -> Result<Book, StoreError> {
        let mut collection = self.collection.write().await;

        let seq = *collection
            .by_id
            .get(&book.id)
            .ok_or_else(|| StoreError::NotFound(book.id.clone()))?;

        if let Some(owner) = collection.isbn_owner(&book.isbn) {
            if owner != book.id {
                return Err(Collection::duplicate_isbn(&book.isbn));
            }
        }

        let previous_isbn = collection
            .records
            .get(&seq)
            .map(|existing| existing.isbn.clone());
        if let Some(previous_isbn) = previous_isbn {
            if previous_isbn != book.isbn {
                collection.isbn_index.remove(&previous_isbn);
                collection
                    .isbn_index
                    .insert(book.isbn.clone(), book.id.clone());
            }
        }
        collection.records.insert(seq, book.clone());

        tracing::debug!(id = %book.id, "book replaced");
        Ok(book)
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut collection = self.collection.write().await;

        let Some(seq) = collection.by_id.remove(id) else {
            return Ok(false);
        };
        if let Some(book) = collection.records.remove(&seq) {
            collection.isbn_index.remove(&book.isbn);
        }

        tracing::debug!(id, "book deleted");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{Condition, Field};

    fn new_book(title: &str, author: &str, isbn: &str) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: author.to_string(),
            isbn: isbn.to_string(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_opaque_id() {
        let store = MemoryBookStore::new();
        let book = store
            .insert(new_book("Dune", "Frank Herbert", "9780441013593"))
            .await
            .unwrap();

        assert_eq!(book.id.len(), 32);
        assert_eq!(store.get(&book.id).await.unwrap(), Some(book));
    }

    #[tokio::test]
    async fn find_preserves_insertion_order() {
        let store = MemoryBookStore::new();
        for (title, isbn) in [("Zeta", "3"), ("Alpha", "1"), ("Mu", "2")] {
            store.insert(new_book(title, "A", isbn)).await.unwrap();
        }

        let titles: Vec<String> = store
            .find(&BookQuery::all())
            .await
            .unwrap()
            .into_iter()
            .map(|book| book.title)
            .collect();

        assert_eq!(titles, vec!["Zeta", "Alpha", "Mu"]);
    }

    #[tokio::test]
    async fn find_runs_predicate() {
        let store = MemoryBookStore::new();
        store
            .insert(new_book("Harry Potter", "J.K. Rowling", "1"))
            .await
            .unwrap();
        store
            .insert(new_book("The Harbor", "Someone", "2"))
            .await
            .unwrap();

        let query = BookQuery::all().and(Condition::Prefix {
            field: Field::Title,
            value: "Har".to_string(),
        });
        let found = store.find(&query).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Harry Potter");
    }

    #[tokio::test]
    async fn duplicate_isbn_is_rejected() {
        let store = MemoryBookStore::new();
        store.insert(new_book("One", "A", "42")).await.unwrap();

        let err = store.insert(new_book("Two", "B", "42")).await.unwrap_err();

        assert_eq!(
            err,
            StoreError::DuplicateKey {
                index: "isbn_index",
                field: "isbn",
                value: "42".to_string(),
            }
        );
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn concurrent_inserts_of_one_isbn_have_one_winner() {
        let store = Arc::new(MemoryBookStore::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .insert(new_book(&format!("Copy {i}"), "A", "same"))
                        .await
                })
            })
            .collect();

        let mut successes = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(StoreError::DuplicateKey { .. }) => duplicates += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(duplicates, 15);
    }

    #[tokio::test]
    async fn replace_moves_isbn_index_entry() {
        let store = MemoryBookStore::new();
        let mut book = store.insert(new_book("One", "A", "1")).await.unwrap();

        book.isbn = "2".to_string();
        store.replace(book.clone()).await.unwrap();

        // The old ISBN is free again, the new one is taken.
        store.insert(new_book("Other", "B", "1")).await.unwrap();
        let err = store.insert(new_book("Third", "C", "2")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { .. }));
    }

    #[tokio::test]
    async fn replace_keeping_own_isbn_is_allowed() {
        let store = MemoryBookStore::new();
        let mut book = store.insert(new_book("One", "A", "1")).await.unwrap();

        book.author = "B".to_string();
        let replaced = store.replace(book.clone()).await.unwrap();

        assert_eq!(replaced.author, "B");
        assert_eq!(store.get(&book.id).await.unwrap().unwrap().author, "B");
    }

    #[tokio::test]
    async fn replace_onto_foreign_isbn_is_rejected() {
        let store = MemoryBookStore::new();
        store.insert(new_book("One", "A", "1")).await.unwrap();
        let mut second = store.insert(new_book("Two", "B", "2")).await.unwrap();

        second.isbn = "1".to_string();
        let err = store.replace(second.clone()).await.unwrap_err();

        assert!(matches!(err, StoreError::DuplicateKey { .. }));
        assert_eq!(store.get(&second.id).await.unwrap().unwrap().isbn, "2");
    }

    #[tokio::test]
    async fn replace_missing_record_is_not_found() {
        let store = MemoryBookStore::new();
        let ghost = Book {
            id: "missing".to_string(),
            title: "T".to_string(),
            author: "A".to_string(),
            isbn: "1".to_string(),
        };

        let err = store.replace(ghost).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound("missing".to_string()));
    }

    #[tokio::test]
    async fn delete_reports_existence_and_frees_isbn() {
        let store = MemoryBookStore::new();
        let book = store.insert(new_book("One", "A", "1")).await.unwrap();

        assert!(store.delete(&book.id).await.unwrap());
        assert!(!store.delete(&book.id).await.unwrap());
        assert!(store.is_empty().await);

        store.insert(new_book("Again", "A", "1")).await.unwrap();
    }
}
