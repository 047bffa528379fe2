use booklist_db::{Book, NewBook};
use serde::{de::Error as _, Deserialize, Deserializer};
use serde_json::Value;

use super::validator::Violations;

/// Writable fields accepted from request bodies.
///
/// Only `title`, `author` and `isbn` are read; any other key is ignored.
/// Numbers and booleans are stored in their string form. The outer `Option`
/// records whether the key was present at all, so a PATCH can tell "leave
/// unchanged" apart from an explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BookParams {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub author: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub isbn: Option<Option<String>>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Some(None)),
        Value::String(text) => Ok(Some(Some(text))),
        Value::Number(number) => Ok(Some(Some(number.to_string()))),
        Value::Bool(flag) => Ok(Some(Some(flag.to_string()))),
        Value::Array(_) | Value::Object(_) => Err(D::Error::custom("expected a scalar value")),
    }
}

impl BookParams {
    /// Parses a request body. The body must be a JSON object whose known
    /// fields are scalars or `null`.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        Self::from_value(serde_json::from_slice(body)?)
    }

    /// Reads the allow-listed fields out of an already parsed JSON object.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        if !value.is_object() {
            return Err(serde::de::Error::custom("expected a JSON object"));
        }
        Self::deserialize(value)
    }
}

/// A book as handled during one request: possibly unsaved, possibly invalid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookDraft {
    /// `None` until the store has assigned an identifier.
    pub id: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub errors: Violations,
}

impl BookDraft {
    /// Candidate for a new record built from request fields.
    pub fn from_params(params: BookParams) -> Self {
        let mut draft = Self::default();
        draft.apply(params);
        draft
    }

    /// Copies the supplied fields over the current ones; absent fields stay.
    pub fn apply(&mut self, params: BookParams) {
        if let Some(title) = params.title {
            self.title = title;
        }
        if let Some(author) = params.author {
            self.author = author;
        }
        if let Some(isbn) = params.isbn {
            self.isbn = isbn;
        }
    }

    pub fn with_errors(mut self, errors: Violations) -> Self {
        self.errors = errors;
        self
    }

    /// Insert payload, if every field is set.
    pub fn to_new_book(&self) -> Option<NewBook> {
        Some(NewBook {
            title: self.title.clone()?,
            author: self.author.clone()?,
            isbn: self.isbn.clone()?,
        })
    }

    /// Full record for a replace, if the draft is persisted and every field is set.
    pub fn to_book(&self) -> Option<Book> {
        let fields = self.to_new_book()?;
        Some(Book {
            id: self.id.clone()?,
            title: fields.title,
            author: fields.author,
            isbn: fields.isbn,
        })
    }
}

impl From<Book> for BookDraft {
    fn from(book: Book) -> Self {
        Self {
            id: Some(book.id),
            title: Some(book.title),
            author: Some(book.author),
            isbn: Some(book.isbn),
            errors: Violations::default(),
        }
    }
}
