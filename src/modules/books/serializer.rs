//! Canonical JSON shape for books: `id, title, author, isbn[, errors]`.
//!
//! Lists are serialized element by element through [`BookSerializer`] rather
//! than through any store representation, so every response has one shape.

use booklist_db::Book;
use serde::Serialize;

use super::models::BookDraft;
use super::validator::Violations;

#[derive(Debug, Serialize)]
pub struct BookSerializer<'a> {
    id: &'a str,
    title: Option<&'a str>,
    author: Option<&'a str>,
    isbn: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a Violations>,
}

impl<'a> From<&'a Book> for BookSerializer<'a> {
    fn from(book: &'a Book) -> Self {
        Self {
            id: &book.id,
            title: Some(&book.title),
            author: Some(&book.author),
            isbn: Some(&book.isbn),
            errors: None,
        }
    }
}

impl<'a> From<&'a BookDraft> for BookSerializer<'a> {
    fn from(draft: &'a BookDraft) -> Self {
        Self {
            id: draft.id.as_deref().unwrap_or_default(),
            title: draft.title.as_deref(),
            author: draft.author.as_deref(),
            isbn: draft.isbn.as_deref(),
            errors: (!draft.errors.is_empty()).then_some(&draft.errors),
        }
    }
}

pub fn serialize_all(books: &[Book]) -> Vec<BookSerializer<'_>> {
    books.iter().map(BookSerializer::from).collect()
}

pub fn to_value(draft: &BookDraft) -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(BookSerializer::from(draft))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::validator::BLANK;

    fn book() -> Book {
        Book {
            id: "0192f3a1".to_string(),
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            isbn: "9780441013593".to_string(),
        }
    }

    #[test]
    fn persisted_book_has_fixed_key_order_and_no_errors() {
        let json = serde_json::to_string(&BookSerializer::from(&book())).unwrap();
        assert_eq!(
            json,
            r#"{"id":"0192f3a1","title":"Dune","author":"Frank Herbert","isbn":"9780441013593"}"#
        );
    }

    #[test]
    fn invalid_draft_carries_trailing_errors() {
        let mut errors = Violations::default();
        errors.add("author", BLANK);
        let draft = BookDraft {
            title: Some("Dune".to_string()),
            isbn: Some("1".to_string()),
            ..BookDraft::default()
        }
        .with_errors(errors);

        let json = serde_json::to_string(&BookSerializer::from(&draft)).unwrap();
        assert_eq!(
            json,
            r#"{"id":"","title":"Dune","author":null,"isbn":"1","errors":{"author":["can't be blank"]}}"#
        );
    }

    #[test]
    fn empty_violations_are_omitted() {
        let draft = BookDraft::from(book());
        let value = to_value(&draft).unwrap();

        assert!(value.get("errors").is_none());
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["id", "title", "author", "isbn"]);
    }

    #[test]
    fn lists_serialize_each_element() {
        let mut second = book();
        second.id = "0192f3a2".to_string();
        second.isbn = "2".to_string();

        let books = vec![book(), second];
        let value = serde_json::to_value(serialize_all(&books)).unwrap();

        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[1]["id"], "0192f3a2");
    }
}
