use axum::extract::State;

use crate::{
    book::BookPatch,
    error::ResourceError,
    extractor::{json::ApiJson, path::ApiPath, valid_api_key::ValidApiKey, validated::Validated},
    state::ApiState,
    traits::ErrorVerbosityProvider,
};

use super::{BookErrorType, BookResponse};

/// Overwrites the fields present in the body.
#[utoipa::path(
    patch,
    path = "/books/{id}",
    tag = "books",
    params(("id" = u64, Path, description = "Book id")),
    request_body = BookPatch,
    security(("api_key" = [])),
    responses(
        (status = 200, description = "The updated book", body = crate::book::Book),
        (status = 404, description = "Book not found"),
        (status = 422, description = "Patch violates field constraints"),
    )
)]
pub async fn update_book(
    ApiPath(id): ApiPath<u64>,
    State(state): State<ApiState>,
    _: ValidApiKey,
    Validated(ApiJson(patch)): Validated<ApiJson<BookPatch>>,
) -> Result<BookResponse, ResourceError<BookErrorType>> {
    match state.store().update(id, patch).await {
        Some(book) => Ok(BookResponse::ok(book)),
        None => Err(ResourceError::new(
            state.error_verbosity(),
            BookErrorType::NotFound { id },
        )),
    }
}
