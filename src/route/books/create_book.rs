use axum::extract::State;

use crate::{
    book::NewBook,
    extractor::{json::ApiJson, valid_api_key::ValidApiKey, validated::Validated},
    state::ApiState,
};

use super::BookResponse;

#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = NewBook,
    security(("api_key" = [])),
    responses(
        (status = 201, description = "The created book", body = crate::book::Book),
        (status = 401, description = "API key missing"),
        (status = 403, description = "API key invalid"),
        (status = 422, description = "Book violates field constraints"),
    )
)]
pub async fn create_book(
    State(state): State<ApiState>,
    _: ValidApiKey,
    Validated(ApiJson(new_book)): Validated<ApiJson<NewBook>>,
) -> BookResponse {
    BookResponse::created(state.store().create(new_book).await)
}
