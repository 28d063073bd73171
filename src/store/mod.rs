use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::book::{finite, Book, BookPatch, NewBook};

pub mod memory;

pub const DEFAULT_LIMIT: usize = 100;

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// Selects and pages books.
#[derive(Debug, Clone, Deserialize, JsonSchema, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
#[validate(schema(function = "validate_filter"))]
pub struct BookFilter {
    /// Exact author.
    pub author: Option<String>,
    /// Exact genre.
    pub genre: Option<String>,
    /// Exact year.
    pub year: Option<String>,
    /// Case-insensitive substring of the name.
    pub search: Option<String>,
    /// Inclusive lower bound on the rating.
    pub min_rating: Option<f64>,
    #[serde(default)]
    pub offset: usize,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 1000, message = "Must be between 1 and 1000"))]
    pub limit: usize,
}

fn validate_filter(filter: &BookFilter) -> Result<(), ValidationError> {
    finite(filter.min_rating)
}

impl Default for BookFilter {
    fn default() -> Self {
        Self {
            author: None,
            genre: None,
            year: None,
            search: None,
            min_rating: None,
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl BookFilter {
    pub fn accepts(&self, book: &Book) -> bool {
        if self.author.as_ref().is_some_and(|author| *author != book.author) {
            return false;
        }

        if self.genre.as_ref().is_some_and(|genre| *genre != book.genre) {
            return false;
        }

        if self.year.as_ref().is_some_and(|year| *year != book.year) {
            return false;
        }

        if self.min_rating.is_some_and(|min| book.rating < min) {
            return false;
        }

        match &self.search {
            Some(search) => book
                .name
                .to_lowercase()
                .contains(&search.to_lowercase()),
            None => true,
        }
    }
}

/// A page of books.
#[derive(Debug, Serialize, Deserialize, JsonSchema, ToSchema)]
pub struct BookPage {
    /// Number of books matching the filter, before paging.
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    pub books: Vec<Book>,
}

#[async_trait]
pub trait BookStore: Send + Sync {
    /// Returns the books accepted by the filter, ordered by id.
    async fn list(&self, filter: &BookFilter) -> BookPage;

    async fn get(&self, id: u64) -> Option<Book>;

    /// Stores a new book under the next free id.
    async fn create(&self, new_book: NewBook) -> Book;

    /// Returns a stored book matching every field of `new_book`, or creates one.
    ///
    /// The flag is `true` if the book was created.
    async fn get_or_create(&self, new_book: NewBook) -> (Book, bool);

    async fn replace(&self, id: u64, new_book: NewBook) -> Option<Book>;

    async fn update(&self, id: u64, patch: BookPatch) -> Option<Book>;

    async fn delete(&self, id: u64) -> Option<Book>;

    async fn count(&self) -> usize;
}
