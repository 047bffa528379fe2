//! Presence rules for book records.
//!
//! ISBN uniqueness is not checked here; the store's unique index is the only
//! authority, and its rejection is reported through [`TAKEN`].

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::models::BookDraft;

pub const BLANK: &str = "can't be blank";
pub const TAKEN: &str = "has already been taken";

/// Field name → ordered violation messages, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations {
    entries: Vec<(&'static str, Vec<String>)>,
}

impl Violations {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some((_, messages)) => messages.push(message.into()),
            None => self.entries.push((field, vec![message.into()])),
        }
    }

    #[cfg(test)]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, messages)| messages.as_slice())
    }

    #[cfg(test)]
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Violations {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, messages) in &self.entries {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |value| value.trim().is_empty())
}

/// Checks that `title`, `author` and `isbn` are present and not blank.
pub fn validate(draft: &BookDraft) -> Violations {
    let mut violations = Violations::default();

    for (field, value) in [
        ("title", draft.title.as_deref()),
        ("author", draft.author.as_deref()),
        ("isbn", draft.isbn.as_deref()),
    ] {
        if is_blank(value) {
            violations.add(field, BLANK);
        }
    }

    violations
}
