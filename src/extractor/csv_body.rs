use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};

use crate::{
    error::{ApiError, BodyError},
    traits::ErrorVerbosityProvider,
};

const ACCEPTED_CONTENT_TYPES: [&str; 2] = ["text/csv", "text/plain"];

/// Extracts the raw request body of a CSV upload.
///
/// A missing `Content-Type` is accepted, anything other than `text/csv` or `text/plain` is rejected.
pub struct CsvBody(pub Bytes);

#[async_trait]
impl<S> FromRequest<S> for CsvBody
where
    S: Send + Sync + ErrorVerbosityProvider,
{
    type Rejection = ApiError;

    #[tracing::instrument(name = "csv_body_extractor", skip_all)]
    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let verbosity = state.error_verbosity();

        if let Some(content_type) = req.headers().get(CONTENT_TYPE) {
            let content_type = content_type.to_str().unwrap_or_default();

            if !ACCEPTED_CONTENT_TYPES
                .iter()
                .any(|accepted| content_type.starts_with(accepted))
            {
                tracing::warn!(content_type, "Rejection. Unsupported content type");

                return Err(BodyError::new(
                    verbosity,
                    format!("Expected `Content-Type` to be one of {ACCEPTED_CONTENT_TYPES:?}"),
                    None,
                )
                .into());
            }
        }

        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            tracing::warn!(?rejection, "Rejection");

            BodyError::new(verbosity, rejection.body_text(), None)
        })?;

        tracing::trace!(len = bytes.len(), "Extracted");

        Ok(CsvBody(bytes))
    }
}
