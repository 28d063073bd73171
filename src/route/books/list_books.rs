use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    extractor::{query::ApiQuery, validated::Validated},
    state::ApiState,
    store::{BookFilter, BookPage},
};

pub struct ListBooksResponse(pub BookPage);

impl IntoResponse for ListBooksResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self.0)).into_response()
    }
}

/// Lists books matching the filter, ordered by id.
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookFilter),
    responses(
        (status = 200, description = "A page of books", body = BookPage),
        (status = 400, description = "Malformed query parameters"),
        (status = 422, description = "Query parameters out of range"),
    )
)]
pub async fn list_books(
    State(state): State<ApiState>,
    Validated(ApiQuery(filter)): Validated<ApiQuery<BookFilter>>,
) -> ListBooksResponse {
    ListBooksResponse(state.store().list(&filter).await)
}
