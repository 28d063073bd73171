use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    OpenApi,
};

use crate::{
    book::{Book, BookPatch, NewBook},
    import::{ImportFailure, ImportReport},
    route::books,
    store::BookPage,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        books::list_books::list_books,
        books::get_book::get_book,
        books::create_book::create_book,
        books::replace_book::replace_book,
        books::update_book::update_book,
        books::delete_book::delete_book,
        books::import_books::import_books,
    ),
    components(schemas(Book, NewBook, BookPatch, BookPage, ImportReport, ImportFailure)),
    tags((name = "books", description = "Book catalogue"))
)]
struct ApiDoc;

/// Builds the OpenAPI document, declaring the API key under the configured header name.
pub fn api_doc(api_key_header_name: &str) -> utoipa::openapi::OpenApi {
    let mut openapi = ApiDoc::openapi();

    if let Some(components) = openapi.components.as_mut() {
        components.add_security_scheme(
            "api_key",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(api_key_header_name))),
        );
    }

    openapi
}
