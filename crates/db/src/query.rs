//! Predicate descriptions executed by the store.
//!
//! A [`BookQuery`] is data, not a cursor: it lists conditions that are AND-ed
//! together and evaluated against each record when the store runs it.

use crate::record::Book;

/// Queryable book fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Author,
    Isbn,
}

impl Field {
    fn value<'a>(&self, book: &'a Book) -> &'a str {
        match self {
            Field::Title => &book.title,
            Field::Author => &book.author,
            Field::Isbn => &book.isbn,
        }
    }
}

/// A single predicate over one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Case-sensitive "starts with".
    Prefix { field: Field, value: String },
    /// Exact equality.
    Equals { field: Field, value: String },
}

impl Condition {
    pub fn matches(&self, book: &Book) -> bool {
        match self {
            Condition::Prefix { field, value } => field.value(book).starts_with(value.as_str()),
            Condition::Equals { field, value } => field.value(book) == value,
        }
    }
}

/// Conjunction of conditions; the empty query matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookQuery {
    conditions: Vec<Condition>,
}

impl BookQuery {
    /// Query matching every record.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn and(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_pass_through(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, book: &Book) -> bool {
        self.conditions.iter().all(|condition| condition.matches(book))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(title: &str, author: &str, isbn: &str) -> Book {
        Book {
            id: "b1".to_string(),
            title: title.to_string(),
            author: author.to_string(),
            isbn: isbn.to_string(),
        }
    }

    #[test]
    fn empty_query_matches_everything() {
        let query = BookQuery::all();
        assert!(query.is_pass_through());
        assert!(query.matches(&book("Anything", "Anyone", "1")));
    }

    #[test]
    fn prefix_is_anchored_and_case_sensitive() {
        let condition = Condition::Prefix {
            field: Field::Title,
            value: "Har".to_string(),
        };

        assert!(condition.matches(&book("Harry Potter", "J.K. Rowling", "1")));
        assert!(!condition.matches(&book("The Harbor", "Someone", "2")));
        assert!(!condition.matches(&book("harry potter", "J.K. Rowling", "3")));
    }

    #[test]
    fn equals_requires_whole_value() {
        let condition = Condition::Equals {
            field: Field::Author,
            value: "Tolkien".to_string(),
        };

        assert!(condition.matches(&book("The Hobbit", "Tolkien", "1")));
        assert!(!condition.matches(&book("The Hobbit", "J.R.R. Tolkien", "1")));
    }

    #[test]
    fn conditions_are_conjunctive() {
        let query = BookQuery::all()
            .and(Condition::Prefix {
                field: Field::Title,
                value: "The".to_string(),
            })
            .and(Condition::Equals {
                field: Field::Isbn,
                value: "42".to_string(),
            });

        assert_eq!(query.conditions().len(), 2);
        assert!(query.matches(&book("The Hobbit", "Tolkien", "42")));
        assert!(!query.matches(&book("The Hobbit", "Tolkien", "43")));
        assert!(!query.matches(&book("A Hobbit", "Tolkien", "42")));
    }
}
