pub mod models;
mod routes;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{middleware, routing::get, Router};

use biblio_db::Database;
use biblio_http::middleware::require_non_empty_body;
use biblio_kernel::{InitCtx, Migration, Module};

use store::BookStore;

/// Table schema owned by this module. Title uniqueness is enforced by a
/// prior read in the create handler, not by a UNIQUE constraint, so the
/// schema deliberately carries none.
pub(crate) const BOOKS_TABLE_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS books (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        author TEXT NOT NULL,
        release_date TEXT NOT NULL
    );
"#;

/// Books module: CRUD routes over the books table.
pub struct BooksModule {
    store: BookStore,
}

impl BooksModule {
    pub fn new(db: &Database) -> Self {
        Self {
            store: BookStore::new(db),
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        // Migrations have run by now, so the table is queryable.
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(ctx.db.pool())
            .await?;

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            books = count,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(routes::list_books).post(routes::create_book))
            .route(
                "/{title}",
                get(routes::get_book)
                    .put(routes::update_book)
                    .delete(routes::delete_book),
            )
            .layer(middleware::from_fn(require_non_empty_body))
            .with_state(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "All books, ordered by title",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": {
                                                "$ref": "#/components/schemas/Book"
                                            }
                                        }
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
                                    "schema": {
                                        "$ref": "#/components/schemas/CreateBook"
                                    }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Created book",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/Book"
                                        }
                                    }
                                }
                            },
                            "400": {
                                "description": "Empty body or invalid release date",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/Message"
                                        }
                                    }
                                }
                            },
                            "409": {
                                "description": "Title already taken",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/Message"
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{title}": {
                    "get": {
                        "summary": "Fetch a book by title",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "title",
                                "in": "path",
                                "required": true,
                                "schema": { "type": "string" }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "The matching book",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/Book"
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "No book with that title",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/Message"
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "put": {
                        "summary": "Replace a book's fields",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "title",
                                "in": "path",
                                "required": true,
                                "schema": { "type": "string" }
                            }
                        ],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/UpdateBook"
                                    }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Affected-row count (0 or 1)",
                                "content": {
                                    "application/json": {
                                        "schema": { "type": "integer" }
                                    }
                                }
                            },
                            "400": {
                                "description": "Empty body or invalid release date",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/Message"
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "No book with that title",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/Message"
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "delete": {
                        "summary": "Delete a book by title",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "title",
                                "in": "path",
                                "required": true,
                                "schema": { "type": "string" }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Deletion confirmation",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/Message"
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "No book with that title",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/Message"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": {
                                "type": "string",
                                "description": "Generated unique identifier"
                            },
                            "title": {
                                "type": "string",
                                "description": "Title of the book"
                            },
                            "author": {
                                "type": "string",
                                "description": "Author of the book"
                            },
                            "release_date": {
                                "type": "string",
                                "format": "date-time",
                                "description": "Publication date"
                            }
                        },
                        "required": ["id", "title", "author", "release_date"]
                    },
                    "CreateBook": {
                        "type": "object",
                        "properties": {
                            "title": {
                                "type": "string",
                                "description": "Title of the book"
                            },
                            "author": {
                                "type": "string",
                                "description": "Author of the book"
                            },
                            "release_date": {
                                "type": "string",
                                "description": "Publication date, e.g. 1965-06-01"
                            }
                        },
                        "required": ["title", "author", "release_date"]
                    },
                    "UpdateBook": {
                        "type": "object",
                        "properties": {
                            "newTitle": {
                                "type": "string",
                                "description": "Replacement title"
                            },
                            "author": {
                                "type": "string",
                                "description": "Author of the book"
                            },
                            "release_date": {
                                "type": "string",
                                "description": "Publication date, e.g. 1969-10-15"
                            }
                        },
                        "required": ["newTitle", "author", "release_date"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: BOOKS_TABLE_DDL,
        }]
    }
}

/// Create a new instance of the books module
pub fn create_module(db: &Database) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(db))
}
