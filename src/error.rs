use std::borrow::Cow;

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use derive_more::From;
use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ErrorVerbosity {
    /// Server returns an empty response with [`StatusCode::NO_CONTENT`] for all errors.
    None,
    /// Server returns only the appropriate status code.
    StatusCode,
    /// Server returns only the message with the appropriate status code.
    Message,
    /// Server returns the message, the error type with cleared error content and the appropriate status code.
    Type,
    /// Server returns the message, the error type with the error content and the appropriate status code.
    Full,
}

impl ErrorVerbosity {
    pub fn should_generate_error_reason(&self) -> bool {
        matches!(self, ErrorVerbosity::Full)
    }
}

/// Maps any error into an [`ApiError::InternalServerError`] using the state's verbosity.
///
/// ```ignore
/// tokio::fs::read("file").await.map_err(server_error!(state))?;
/// ```
#[macro_export]
macro_rules! server_error {
    ($state:expr) => {
        |err| {
            $crate::error::ApiError::from($crate::error::InternalServerError::from_generic_error(
                $crate::traits::ErrorVerbosityProvider::error_verbosity(&$state),
                err,
            ))
        }
    };
}

#[derive(Debug, Serialize)]
struct ErrorResponse<'a, E: Serialize> {
    #[serde(flatten)]
    error: &'a E,
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorMessage {
    message: &'static str,
}

/// Builds the response for an error according to the verbosity.
fn error_response<E: Serialize>(
    verbosity: ErrorVerbosity,
    status_code: StatusCode,
    headers: HeaderMap,
    message: &'static str,
    error: &E,
) -> Response {
    match verbosity {
        ErrorVerbosity::None => StatusCode::NO_CONTENT.into_response(),
        ErrorVerbosity::StatusCode => (status_code, headers).into_response(),
        ErrorVerbosity::Message => {
            (status_code, headers, Json(ErrorMessage { message })).into_response()
        }
        ErrorVerbosity::Type | ErrorVerbosity::Full => {
            (status_code, headers, Json(ErrorResponse { error, message })).into_response()
        }
    }
}

#[derive(Debug, From, Serialize)]
#[serde(tag = "error_type", content = "error")]
/// API error
pub enum ApiError {
    /// Internal server error
    ///
    /// This error is returned when an internal server error occurs.
    InternalServerError(InternalServerError),
    /// Query error
    ///
    /// This error is returned when the query parameters are not as expected.
    Query(QueryError),
    /// Body error
    ///
    /// This error is returned when the body is not as expected.
    Body(BodyError),
    /// Path error
    ///
    /// This error is returned when the path is not as expected.
    Path(PathError),
    /// Validation error
    ///
    /// This error is returned when the extracted data violates its constraints.
    Validation(ValidationError),
    /// Method not allowed
    MethodNotAllowed(MethodNotAllowedError),
    /// Not found error
    ///
    /// This error is returned when no route matches the request.
    NotFound(NotFoundError),
    /// API key error
    ApiKey(ApiKeyError),
}

impl ApiError {
    fn verbosity(&self) -> ErrorVerbosity {
        match self {
            ApiError::InternalServerError(err) => err.verbosity,
            ApiError::Query(err) => err.verbosity,
            ApiError::Body(err) => err.verbosity,
            ApiError::Path(err) => err.verbosity,
            ApiError::Validation(err) => err.verbosity,
            ApiError::MethodNotAllowed(err) => err.verbosity,
            ApiError::NotFound(err) => err.verbosity,
            ApiError::ApiKey(err) => err.verbosity,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::InternalServerError(_) => "An internal server error has occurred",
            ApiError::Query(_) => "Failed to parse query parameters",
            ApiError::Body(_) => "Failed to parse request body",
            ApiError::Path(_) => "Failed to parse path parameters",
            ApiError::Validation(_) => "Validation failed",
            ApiError::MethodNotAllowed(_) => "Method not allowed",
            ApiError::NotFound(_) => "The requested resource was not found",
            ApiError::ApiKey(_) => "API key error",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Query(_) | ApiError::Body(_) | ApiError::Path(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ApiKey(err) => err.status_code(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error_response(
            self.verbosity(),
            self.status_code(),
            HeaderMap::new(),
            self.message(),
            &self,
        )
    }
}

#[derive(Debug, Serialize)]
pub struct InternalServerError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    internal_server_error: Option<String>,
}

impl InternalServerError {
    pub fn from_generic_error<E: Into<anyhow::Error>>(verbosity: ErrorVerbosity, err: E) -> Self {
        let err: anyhow::Error = err.into();
        let err = format!("{err:#}");
        tracing::error!(%err, "Internal server error");

        let internal_server_error = verbosity.should_generate_error_reason().then_some(err);

        InternalServerError {
            verbosity,
            internal_server_error,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QueryError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    query_error_reason: Option<String>,
    query_expected_schema: Option<String>,
}

impl QueryError {
    pub fn new(
        verbosity: ErrorVerbosity,
        query_error_reason: String,
        query_expected_schema: String,
    ) -> Self {
        let (query_error_reason, query_expected_schema) =
            match verbosity.should_generate_error_reason() {
                true => (Some(query_error_reason), Some(query_expected_schema)),
                false => (None, None),
            };

        QueryError {
            verbosity,
            query_error_reason,
            query_expected_schema,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BodyError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    body_error_reason: Option<String>,
    body_expected_schema: Option<String>,
}

impl BodyError {
    pub fn new(
        verbosity: ErrorVerbosity,
        body_error_reason: String,
        body_expected_schema: Option<String>,
    ) -> Self {
        let (body_error_reason, body_expected_schema) =
            match verbosity.should_generate_error_reason() {
                true => (Some(body_error_reason), body_expected_schema),
                false => (None, None),
            };

        BodyError {
            verbosity,
            body_error_reason,
            body_expected_schema,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PathError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    path_error_reason: Option<String>,
}

impl PathError {
    pub fn new(verbosity: ErrorVerbosity, path_error_reason: String) -> Self {
        let path_error_reason = verbosity
            .should_generate_error_reason()
            .then_some(path_error_reason);

        PathError {
            verbosity,
            path_error_reason,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ValidationError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    validation_error_reason: Option<String>,
}

impl ValidationError {
    pub fn from_validation_errors(verbosity: ErrorVerbosity, errors: ValidationErrors) -> Self {
        let validation_error_reason = verbosity
            .should_generate_error_reason()
            .then(|| errors.to_string());

        ValidationError {
            verbosity,
            validation_error_reason,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MethodNotAllowedError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
}

impl MethodNotAllowedError {
    pub fn new(verbosity: ErrorVerbosity) -> Self {
        MethodNotAllowedError { verbosity }
    }
}

#[derive(Debug, Serialize)]
pub struct NotFoundError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
}

impl NotFoundError {
    pub fn new(verbosity: ErrorVerbosity) -> Self {
        NotFoundError { verbosity }
    }
}

#[derive(Debug, Serialize)]
pub enum ApiKeyErrorType {
    Missing,
    InvalidChars {
        #[serde(skip)]
        reason: String,
    },
    Invalid,
}

#[derive(Debug, Serialize)]
pub struct ApiKeyError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    api_key_error_type: ApiKeyErrorType,
    api_key_error_reason: Option<Cow<'static, str>>,
}

impl ApiKeyError {
    pub fn new(verbosity: ErrorVerbosity, api_key_error_type: ApiKeyErrorType) -> Self {
        let api_key_error_reason = verbosity
            .should_generate_error_reason()
            .then(|| Self::reason(&api_key_error_type));

        ApiKeyError {
            verbosity,
            api_key_error_type,
            api_key_error_reason,
        }
    }

    fn reason(api_key_error_type: &ApiKeyErrorType) -> Cow<'static, str> {
        match api_key_error_type {
            ApiKeyErrorType::Missing => Cow::Borrowed("API key is missing"),
            ApiKeyErrorType::InvalidChars { reason } => {
                Cow::Owned(format!("API key contains invalid characters: {reason}"))
            }
            ApiKeyErrorType::Invalid => Cow::Borrowed("API key invalid"),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self.api_key_error_type {
            ApiKeyErrorType::Missing | ApiKeyErrorType::InvalidChars { .. } => {
                StatusCode::UNAUTHORIZED
            }
            ApiKeyErrorType::Invalid => StatusCode::FORBIDDEN,
        }
    }
}

/// Describes an error that belongs to a single resource, e.g. a missing book.
pub trait ResourceErrorProvider: Serialize {
    type Context: Serialize;

    fn headers(&self) -> Option<HeaderMap>;

    fn status_code(&self) -> StatusCode;

    fn message(&self) -> &'static str;

    fn context(&self) -> Self::Context;
}

#[derive(Debug, Serialize)]
struct ResourceErrorContent<'a, T, C> {
    #[serde(flatten)]
    error: &'a T,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<C>,
}

/// Either a resource specific error or a general [`ApiError`].
#[derive(Debug)]
pub enum ResourceError<T> {
    Api(ApiError),
    Resource {
        verbosity: ErrorVerbosity,
        error: T,
    },
}

impl<T> ResourceError<T> {
    pub fn new(verbosity: ErrorVerbosity, error: T) -> Self {
        ResourceError::Resource { verbosity, error }
    }
}

impl<T> From<ApiError> for ResourceError<T> {
    fn from(error: ApiError) -> Self {
        ResourceError::Api(error)
    }
}

impl<T: ResourceErrorProvider> IntoResponse for ResourceError<T> {
    fn into_response(self) -> Response {
        match self {
            ResourceError::Api(error) => error.into_response(),
            ResourceError::Resource { verbosity, error } => {
                let context = verbosity
                    .should_generate_error_reason()
                    .then(|| error.context());

                error_response(
                    verbosity,
                    error.status_code(),
                    error.headers().unwrap_or_default(),
                    error.message(),
                    &ResourceErrorContent {
                        error: &error,
                        context,
                    },
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    async fn body_string(response: Response) -> String {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();

        String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
    }

    #[tokio::test]
    async fn none_verbosity_hides_everything() {
        let response = ApiError::from(NotFoundError::new(ErrorVerbosity::None)).into_response();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(body_string(response).await.is_empty());
    }

    #[tokio::test]
    async fn message_verbosity_returns_only_the_message() {
        let response =
            ApiError::from(PathError::new(ErrorVerbosity::Message, "bad".to_string()))
                .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_string(response).await,
            r#"{"message":"Failed to parse path parameters"}"#
        );
    }

    #[tokio::test]
    async fn type_verbosity_clears_the_reason() {
        let response = ApiError::from(ApiKeyError::new(
            ErrorVerbosity::Type,
            ApiKeyErrorType::Invalid,
        ))
        .into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = body_string(response).await;
        assert!(body.contains(r#""error_type":"ApiKey""#));
        assert!(body.contains(r#""api_key_error_reason":null"#));
    }

    #[tokio::test]
    async fn full_verbosity_includes_the_reason() {
        let response = ApiError::from(ApiKeyError::new(
            ErrorVerbosity::Full,
            ApiKeyErrorType::Missing,
        ))
        .into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_string(response).await.contains("API key is missing"));
    }
}
