pub mod filter;
pub mod handlers;
pub mod models;
pub mod seed;
pub mod serializer;
pub mod validator;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use booklist_db::BookStore;
use booklist_kernel::{InitCtx, Module};
use serde_json::json;

use handlers::BooksState;

/// Books catalog: CRUD and filtered listing over a [`BookStore`]
pub struct BooksModule {
    store: Arc<dyn BookStore>,
}

impl BooksModule {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        if let Some(path) = &ctx.settings.database.seed_path {
            let inserted = seed::load(self.store.as_ref(), path).await?;
            tracing::info!(
                module = self.name(),
                seed = %path.display(),
                inserted,
                "books seeded"
            );
        }

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        handlers::router(BooksState {
            store: self.store.clone(),
        })
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let book_ref = json!({"$ref": "#/components/schemas/Book"});
        let message_ref = json!({"$ref": "#/components/schemas/ErrorMessage"});
        let invalid_ref = json!({"$ref": "#/components/schemas/InvalidBook"});
        let id_param = json!({
            "name": "id",
            "in": "path",
            "required": true,
            "schema": {"type": "string"}
        });

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "title",
                                "in": "query",
                                "description": "Case-sensitive title prefix",
                                "schema": {"type": "string"}
                            },
                            {
                                "name": "isbn",
                                "in": "query",
                                "description": "Exact ISBN",
                                "schema": {"type": "string"}
                            },
                            {
                                "name": "author",
                                "in": "query",
                                "description": "Exact author",
                                "schema": {"type": "string"}
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Matching books in insertion order",
                                "content": {
                                    "application/json": {
                                        "schema": {"type": "array", "items": book_ref}
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/BookInput"}
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Created; Location points at the new book",
                                "headers": {
                                    "Location": {"schema": {"type": "string", "format": "uri"}}
                                }
                            },
                            "400": {
                                "description": "Malformed JSON body",
                                "content": {"application/json": {"schema": message_ref}}
                            },
                            "422": {
                                "description": "Validation failed or ISBN already taken",
                                "content": {"application/json": {"schema": invalid_ref}}
                            }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "parameters": [id_param],
                        "responses": {
                            "200": {
                                "description": "The book",
                                "content": {"application/json": {"schema": book_ref}}
                            },
                            "404": {
                                "description": "Book Not Found",
                                "content": {"application/json": {"schema": message_ref}}
                            }
                        }
                    },
                    "patch": {
                        "summary": "Update some fields of a book",
                        "tags": ["Books"],
                        "parameters": [id_param],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/BookInput"}
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "The updated book",
                                "content": {"application/json": {"schema": book_ref}}
                            },
                            "400": {
                                "description": "Malformed JSON body",
                                "content": {"application/json": {"schema": message_ref}}
                            },
                            "404": {
                                "description": "Book Not Found",
                                "content": {"application/json": {"schema": message_ref}}
                            },
                            "422": {
                                "description": "Validation failed or ISBN already taken",
                                "content": {"application/json": {"schema": invalid_ref}}
                            }
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [id_param],
                        "responses": {
                            "204": {"description": "Deleted, or never existed"}
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": {"type": "string", "description": "Store-assigned identifier"},
                            "title": {"type": "string"},
                            "author": {"type": "string"},
                            "isbn": {"type": "string", "description": "Unique across all books"}
                        },
                        "required": ["id", "title", "author", "isbn"]
                    },
                    "BookInput": {
                        "type": "object",
                        "properties": {
                            "title": {"type": ["string", "null"]},
                            "author": {"type": ["string", "null"]},
                            "isbn": {"type": ["string", "null"]}
                        }
                    },
                    "InvalidBook": {
                        "type": "object",
                        "properties": {
                            "id": {"type": "string", "description": "Empty for unsaved books"},
                            "title": {"type": ["string", "null"]},
                            "author": {"type": ["string", "null"]},
                            "isbn": {"type": ["string", "null"]},
                            "errors": {
                                "type": "object",
                                "additionalProperties": {
                                    "type": "array",
                                    "items": {"type": "string"}
                                }
                            }
                        },
                        "required": ["id", "title", "author", "isbn", "errors"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(store: Arc<dyn BookStore>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}
