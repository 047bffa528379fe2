use std::path::Path;

use anyhow::{bail, Context};
use booklist_db::{BookStore, StoreError};

use super::models::{BookDraft, BookParams};
use super::validator;

/// Loads a JSON array of `{title, author, isbn}` objects into the store.
///
/// Entries go through the same validation as `POST`; the first invalid or
/// duplicate entry aborts the load. Returns the number of records inserted.
pub async fn load(store: &dyn BookStore, path: &Path) -> anyhow::Result<usize> {
    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    let entries: Vec<serde_json::Value> = serde_json::from_slice(&raw)
        .with_context(|| format!("seed file {} is not a JSON array", path.display()))?;

    let mut inserted = 0;
    for (index, entry) in entries.into_iter().enumerate() {
        let params = BookParams::from_value(entry)
            .with_context(|| format!("seed entry {} is malformed", index))?;
        let draft = BookDraft::from_params(params);

        let violations = validator::validate(&draft);
        let new_book = match draft.to_new_book() {
            Some(new_book) if violations.is_empty() => new_book,
            _ => bail!(
                "seed entry {} is invalid: {}",
                index,
                serde_json::to_string(&violations)?
            ),
        };

        match store.insert(new_book).await {
            Ok(book) => {
                tracing::debug!(id = %book.id, index, "seed record inserted");
                inserted += 1;
            }
            Err(err @ StoreError::DuplicateKey { .. }) => {
                return Err(err).with_context(|| format!("seed entry {} rejected", index));
            }
            Err(err) => return Err(err).context("book store request failed"),
        }
    }

    Ok(inserted)
}
