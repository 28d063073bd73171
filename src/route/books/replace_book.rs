use axum::extract::State;

use crate::{
    book::NewBook,
    error::ResourceError,
    extractor::{json::ApiJson, path::ApiPath, valid_api_key::ValidApiKey, validated::Validated},
    state::ApiState,
    traits::ErrorVerbosityProvider,
};

use super::{BookErrorType, BookResponse};

/// Replaces every field of a book, keeping its id.
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = u64, Path, description = "Book id")),
    request_body = NewBook,
    security(("api_key" = [])),
    responses(
        (status = 200, description = "The replaced book", body = crate::book::Book),
        (status = 404, description = "Book not found"),
        (status = 422, description = "Book violates field constraints"),
    )
)]
pub async fn replace_book(
    ApiPath(id): ApiPath<u64>,
    State(state): State<ApiState>,
    _: ValidApiKey,
    Validated(ApiJson(new_book)): Validated<ApiJson<NewBook>>,
) -> Result<BookResponse, ResourceError<BookErrorType>> {
    match state.store().replace(id, new_book).await {
        Some(book) => Ok(BookResponse::ok(book)),
        None => Err(ResourceError::new(
            state.error_verbosity(),
            BookErrorType::NotFound { id },
        )),
    }
}
