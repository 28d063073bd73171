use axum::extract::State;

use crate::{
    error::ResourceError,
    extractor::path::ApiPath,
    state::ApiState,
    traits::ErrorVerbosityProvider,
};

use super::{BookErrorType, BookResponse};

#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = u64, Path, description = "Book id")),
    responses(
        (status = 200, description = "The book", body = crate::book::Book),
        (status = 404, description = "Book not found"),
    )
)]
pub async fn get_book(
    ApiPath(id): ApiPath<u64>,
    State(state): State<ApiState>,
) -> Result<BookResponse, ResourceError<BookErrorType>> {
    match state.store().get(id).await {
        Some(book) => Ok(BookResponse::ok(book)),
        None => Err(ResourceError::new(
            state.error_verbosity(),
            BookErrorType::NotFound { id },
        )),
    }
}
