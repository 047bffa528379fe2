/// A persisted book. Every field is present and non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub isbn: String,
}

/// Insert payload; the store assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
}

impl NewBook {
    pub(crate) fn into_book(self, id: String) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            isbn: self.isbn,
        }
    }
}
