use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{book::Book, error::ResourceErrorProvider};

pub mod app;
pub mod create_book;
pub mod delete_book;
pub mod get_book;
pub mod import_books;
pub mod list_books;
pub mod replace_book;
pub mod update_book;

/// A single book with the status code to answer with.
pub struct BookResponse {
    status: StatusCode,
    book: Book,
}

impl BookResponse {
    pub fn ok(book: Book) -> Self {
        Self {
            status: StatusCode::OK,
            book,
        }
    }

    pub fn created(book: Book) -> Self {
        Self {
            status: StatusCode::CREATED,
            book,
        }
    }
}

impl IntoResponse for BookResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.book)).into_response()
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "error_type")]
pub enum BookErrorType {
    NotFound {
        #[serde(skip)]
        id: u64,
    },
}

#[derive(Debug, Serialize)]
pub struct BookErrorContext {
    pub reason: String,
}

impl ResourceErrorProvider for BookErrorType {
    type Context = BookErrorContext;

    fn headers(&self) -> Option<HeaderMap> {
        None
    }

    fn status_code(&self) -> StatusCode {
        match self {
            BookErrorType::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            BookErrorType::NotFound { .. } => "Book not found",
        }
    }

    fn context(&self) -> Self::Context {
        match self {
            BookErrorType::NotFound { id } => BookErrorContext {
                reason: format!("Book with id {id} not found"),
            },
        }
    }
}
