use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, OriginalUri, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use booklist_db::{BookStore, StoreError};
use booklist_http::{error::AppError, openapi::module_path};

use super::filter::{build_query, ListParams};
use super::models::{BookDraft, BookParams};
use super::serializer::{self, BookSerializer};
use super::validator::{self, Violations};

pub const NOT_FOUND_MESSAGE: &str = "Book Not Found";
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON";

/// Per-router state; the store is the only shared resource.
#[derive(Clone)]
pub struct BooksState {
    pub store: Arc<dyn BookStore>,
}

pub fn router(state: BooksState) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route(
            "/{id}",
            get(show_book).patch(update_book).delete(delete_book),
        )
        .with_state(state)
}

async fn list_books(
    State(state): State<BooksState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let query = build_query(&ListParams::from_pairs(pairs));
    let books = state.store.find(&query).await.map_err(store_failure)?;

    tracing::debug!(count = books.len(), filters = query.conditions().len(), "books listed");
    Ok(Json(serializer::serialize_all(&books)).into_response())
}

async fn show_book(
    State(state): State<BooksState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Response, AppError> {
    let id = book_id(id)?;
    let book = state
        .store
        .get(&id)
        .await
        .map_err(store_failure)?
        .ok_or_else(|| AppError::not_found(NOT_FOUND_MESSAGE))?;

    Ok(Json(BookSerializer::from(&book)).into_response())
}

async fn create_book(
    State(state): State<BooksState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let params = parse_body(&body)?;
    let draft = BookDraft::from_params(params);

    let violations = validator::validate(&draft);
    let new_book = match draft.to_new_book() {
        Some(new_book) if violations.is_empty() => new_book,
        _ => return Err(rejected(draft.with_errors(violations))),
    };

    let book = match state.store.insert(new_book).await {
        Ok(book) => book,
        Err(StoreError::DuplicateKey { .. }) => return Err(rejected(isbn_taken(draft))),
        Err(err) => return Err(store_failure(err)),
    };

    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .or_else(|| uri.authority().map(|authority| authority.to_string()))
        .unwrap_or_else(|| "localhost".to_string());
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("http");
    let location = format!(
        "{}://{}{}",
        scheme,
        host,
        module_path("books", &format!("/{}", book.id))
    );

    tracing::info!(id = %book.id, isbn = %book.isbn, "book created");
    Ok((StatusCode::CREATED, [(header::LOCATION, location)]).into_response())
}

async fn update_book(
    State(state): State<BooksState>,
    id: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Result<Response, AppError> {
    let id = book_id(id)?;
    let params = parse_body(&body)?;

    let existing = state
        .store
        .get(&id)
        .await
        .map_err(store_failure)?
        .ok_or_else(|| AppError::not_found(NOT_FOUND_MESSAGE))?;

    let mut draft = BookDraft::from(existing);
    draft.apply(params);

    let violations = validator::validate(&draft);
    let book = match draft.to_book() {
        Some(book) if violations.is_empty() => book,
        _ => return Err(rejected(draft.with_errors(violations))),
    };

    let book = match state.store.replace(book).await {
        Ok(book) => book,
        Err(StoreError::DuplicateKey { .. }) => return Err(rejected(isbn_taken(draft))),
        Err(StoreError::NotFound(_)) => return Err(AppError::not_found(NOT_FOUND_MESSAGE)),
    };

    tracing::info!(id = %book.id, "book updated");
    Ok(Json(BookSerializer::from(&book)).into_response())
}

async fn delete_book(
    State(state): State<BooksState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = book_id(id)?;
    let existed = state.store.delete(&id).await.map_err(store_failure)?;

    tracing::info!(id = %id, existed, "book delete requested");
    Ok(StatusCode::NO_CONTENT)
}

fn book_id(path: Result<Path<String>, PathRejection>) -> Result<String, AppError> {
    path.map(|Path(id)| id).map_err(AppError::from)
}

fn parse_body(body: &[u8]) -> Result<BookParams, AppError> {
    BookParams::from_json(body).map_err(|err| {
        tracing::debug!(error = %err, "rejecting request body");
        AppError::bad_request(INVALID_JSON_MESSAGE)
    })
}

fn isbn_taken(draft: BookDraft) -> BookDraft {
    let mut violations = Violations::default();
    violations.add("isbn", validator::TAKEN);
    draft.with_errors(violations)
}

fn rejected(draft: BookDraft) -> AppError {
    match serializer::to_value(&draft) {
        Ok(record) => AppError::unprocessable(record),
        Err(err) => AppError::Internal(err.into()),
    }
}

fn store_failure(err: StoreError) -> AppError {
    AppError::Internal(anyhow::Error::new(err).context("book store request failed"))
}
