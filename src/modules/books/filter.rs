use booklist_db::{BookQuery, Condition, Field};

/// Optional list filters read from the query string; other keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub title: Option<String>,
    pub isbn: Option<String>,
    pub author: Option<String>,
}

impl ListParams {
    /// Collects filters from decoded query pairs. A repeated key keeps its
    /// last value.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "title" => params.title = Some(value),
                "isbn" => params.isbn = Some(value),
                "author" => params.author = Some(value),
                _ => {}
            }
        }
        params
    }
}

/// Composes the supplied filters, in the order title, isbn, author.
///
/// A parameter that is present but empty is still applied.
pub fn build_query(params: &ListParams) -> BookQuery {
    let mut query = BookQuery::all();

    if let Some(title) = &params.title {
        query = query.and(Condition::Prefix {
            field: Field::Title,
            value: title.clone(),
        });
    }
    if let Some(isbn) = &params.isbn {
        query = query.and(Condition::Equals {
            field: Field::Isbn,
            value: isbn.clone(),
        });
    }
    if let Some(author) = &params.author {
        query = query.and(Condition::Equals {
            field: Field::Author,
            value: author.clone(),
        });
    }

    query
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn repeated_keys_keep_last_value() {
        let params = ListParams::from_pairs(pairs(&[
            ("title", "Zzz"),
            ("page", "2"),
            ("title", "Har"),
            ("author", ""),
        ]));

        assert_eq!(params.title.as_deref(), Some("Har"));
        assert_eq!(params.author.as_deref(), Some(""));
        assert_eq!(params.isbn, None);
    }

    #[test]
    fn empty_values_are_still_applied() {
        let params = ListParams::from_pairs(pairs(&[("title", ""), ("author", "")]));

        assert_eq!(
            build_query(&params).conditions(),
            &[
                Condition::Prefix {
                    field: Field::Title,
                    value: String::new()
                },
                Condition::Equals {
                    field: Field::Author,
                    value: String::new()
                },
            ]
        );
    }

    #[test]
    fn no_params_is_pass_through() {
        assert!(build_query(&ListParams::default()).is_pass_through());
    }

    #[test]
    fn filters_compose_in_fixed_order() {
        let params = ListParams {
            author: Some("Tolkien".to_string()),
            title: Some("The".to_string()),
            isbn: Some("42".to_string()),
        };

        assert_eq!(
            build_query(&params).conditions(),
            &[
                Condition::Prefix {
                    field: Field::Title,
                    value: "The".to_string()
                },
                Condition::Equals {
                    field: Field::Isbn,
                    value: "42".to_string()
                },
                Condition::Equals {
                    field: Field::Author,
                    value: "Tolkien".to_string()
                },
            ]
        );
    }

    #[test]
    fn only_supplied_filters_are_applied() {
        let params = ListParams {
            author: Some("Tolkien".to_string()),
            ..ListParams::default()
        };

        assert_eq!(
            build_query(&params).conditions(),
            &[Condition::Equals {
                field: Field::Author,
                value: "Tolkien".to_string()
            }]
        );
    }
}
