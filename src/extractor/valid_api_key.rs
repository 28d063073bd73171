use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::{
    error::{ApiError, ApiKeyError, ApiKeyErrorType},
    traits::{ApiKeyProvider, ErrorVerbosityProvider},
};

/// Guards a handler: rejects unless the request carries a known API key.
#[derive(Debug, Clone, Copy)]
pub struct ValidApiKey;

#[async_trait]
impl<S> FromRequestParts<S> for ValidApiKey
where
    S: Send + Sync + ApiKeyProvider + ErrorVerbosityProvider,
{
    type Rejection = ApiError;

    #[tracing::instrument(name = "api_key_validator", skip_all)]
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let verbosity = state.error_verbosity();

        let used_api_key = parts
            .headers
            .get(state.header_name())
            .ok_or_else(|| {
                tracing::warn!("Rejection. API key is missing");

                ApiKeyError::new(verbosity, ApiKeyErrorType::Missing)
            })?
            .to_str()
            .map_err(|err| {
                tracing::warn!(%err, "Rejection. API key contains invalid characters");

                ApiKeyError::new(
                    verbosity,
                    ApiKeyErrorType::InvalidChars {
                        reason: err.to_string(),
                    },
                )
            })?;

        if !state.validate(used_api_key) {
            tracing::warn!(used_api_key, "Rejection. Invalid API key");

            return Err(ApiKeyError::new(verbosity, ApiKeyErrorType::Invalid).into());
        }

        tracing::trace!(used_api_key, "Validated");

        Ok(ValidApiKey)
    }
}
