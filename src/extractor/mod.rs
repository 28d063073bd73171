pub mod csv_body;
pub mod json;
pub mod path;
pub mod query;
pub mod valid_api_key;
pub mod validated;

/// Gives access to the value an extractor pulled out of the request.
pub trait Extractor {
    type Extracted;

    fn extracted(&self) -> &Self::Extracted;
}
