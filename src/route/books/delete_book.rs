use axum::{extract::State, http::StatusCode};

use crate::{
    error::ResourceError,
    extractor::{path::ApiPath, valid_api_key::ValidApiKey},
    state::ApiState,
    traits::ErrorVerbosityProvider,
};

use super::BookErrorType;

#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = u64, Path, description = "Book id")),
    security(("api_key" = [])),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found"),
    )
)]
pub async fn delete_book(
    ApiPath(id): ApiPath<u64>,
    State(state): State<ApiState>,
    _: ValidApiKey,
) -> Result<StatusCode, ResourceError<BookErrorType>> {
    match state.store().delete(id).await {
        Some(book) => {
            tracing::debug!(id, name = %book, "Deleted");

            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(ResourceError::new(
            state.error_verbosity(),
            BookErrorType::NotFound { id },
        )),
    }
}
