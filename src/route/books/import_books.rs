use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    error::{ApiError, BodyError},
    extractor::{csv_body::CsvBody, valid_api_key::ValidApiKey},
    import::{import_csv, ImportReport},
    state::ApiState,
    traits::ErrorVerbosityProvider,
};

pub struct ImportBooksResponse(pub ImportReport);

impl IntoResponse for ImportBooksResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self.0)).into_response()
    }
}

/// Imports a bestseller CSV export.
///
/// Rows already present with identical fields are counted as existing, invalid rows are reported.
#[utoipa::path(
    post,
    path = "/books/import",
    tag = "books",
    request_body(content = String, content_type = "text/csv", description = "Name,Author,User Rating,Reviews,Price,Year,Genre with a header row"),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "Import summary", body = ImportReport),
        (status = 400, description = "Body is not readable CSV"),
    )
)]
pub async fn import_books(
    State(state): State<ApiState>,
    _: ValidApiKey,
    CsvBody(bytes): CsvBody,
) -> Result<ImportBooksResponse, ApiError> {
    let report = import_csv(&bytes[..], state.store())
        .await
        .map_err(|err| BodyError::new(state.error_verbosity(), err.to_string(), None))?;

    Ok(ImportBooksResponse(report))
}
