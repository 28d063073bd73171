use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// A catalogued book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, ToSchema)]
pub struct Book {
    /// Auto-assigned primary key.
    pub id: u64,
    pub name: String,
    pub author: String,
    pub rating: f64,
    pub reviews: i64,
    pub price: i64,
    pub year: String,
    pub genre: String,
}

impl Book {
    /// Returns `true` if every field except the id equals the given [`NewBook`].
    pub fn matches(&self, new_book: &NewBook) -> bool {
        self.name == new_book.name
            && self.author == new_book.author
            && self.rating == new_book.rating
            && self.reviews == new_book.reviews
            && self.price == new_book.price
            && self.year == new_book.year
            && self.genre == new_book.genre
    }

    /// Overwrites the fields present in the patch.
    pub fn apply(&mut self, patch: BookPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if let Some(reviews) = patch.reviews {
            self.reviews = reviews;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(genre) = patch.genre {
            self.genre = genre;
        }
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A book that has not been stored yet.
///
/// `rating`, `reviews` and `price` default to `0` when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, ToSchema, Validate)]
#[validate(schema(function = "validate_new_book"))]
pub struct NewBook {
    #[validate(length(min = 1, max = 256, message = "Must be between 1 and 256 characters long"))]
    pub name: String,
    #[validate(length(min = 1, max = 128, message = "Must be between 1 and 128 characters long"))]
    pub author: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews: i64,
    #[serde(default)]
    pub price: i64,
    #[validate(length(min = 1, max = 8, message = "Must be between 1 and 8 characters long"))]
    pub year: String,
    #[validate(length(min = 1, max = 32, message = "Must be between 1 and 32 characters long"))]
    pub genre: String,
}

impl NewBook {
    pub fn into_book(self, id: u64) -> Book {
        Book {
            id,
            name: self.name,
            author: self.author,
            rating: self.rating,
            reviews: self.reviews,
            price: self.price,
            year: self.year,
            genre: self.genre,
        }
    }
}

/// Partial update of a [`Book`]. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, ToSchema, Validate)]
#[validate(schema(function = "validate_book_patch"))]
pub struct BookPatch {
    #[validate(length(min = 1, max = 256, message = "Must be between 1 and 256 characters long"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 128, message = "Must be between 1 and 128 characters long"))]
    pub author: Option<String>,
    pub rating: Option<f64>,
    pub reviews: Option<i64>,
    pub price: Option<i64>,
    #[validate(length(min = 1, max = 8, message = "Must be between 1 and 8 characters long"))]
    pub year: Option<String>,
    #[validate(length(min = 1, max = 32, message = "Must be between 1 and 32 characters long"))]
    pub genre: Option<String>,
}

/// Rejects `NaN` and infinities. They never compare equal and serialize as `null`.
pub(crate) fn finite(value: Option<f64>) -> Result<(), ValidationError> {
    match value {
        Some(value) if !value.is_finite() => {
            let mut error = ValidationError::new("non_finite");
            error.message = Some("Must be a finite number".into());

            Err(error)
        }
        _ => Ok(()),
    }
}

fn validate_new_book(new_book: &NewBook) -> Result<(), ValidationError> {
    finite(Some(new_book.rating))
}

fn validate_book_patch(patch: &BookPatch) -> Result<(), ValidationError> {
    finite(patch.rating)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn new_book(name: &str) -> NewBook {
        NewBook {
            name: name.to_string(),
            author: "George Orwell".to_string(),
            rating: 4.7,
            reviews: 21424,
            price: 6,
            year: "2017".to_string(),
            genre: "Fiction".to_string(),
        }
    }

    #[test]
    fn display_is_the_name() {
        let book = new_book("1984 (Signet Classics)").into_book(1);

        assert_eq!(book.to_string(), "1984 (Signet Classics)");
    }

    #[test]
    fn numeric_fields_default_to_zero() {
        let book: NewBook = serde_yaml::from_str(
            "name: Dune\nauthor: Frank Herbert\nyear: '1965'\ngenre: Fiction\n",
        )
        .expect("Book is not parsable");

        assert_eq!(book.rating, 0.0);
        assert_eq!(book.reviews, 0);
        assert_eq!(book.price, 0);
    }

    #[test]
    fn matches_compares_every_field() {
        let book = new_book("Animal Farm").into_book(7);

        assert!(book.matches(&new_book("Animal Farm")));

        let mut other = new_book("Animal Farm");
        other.price = 7;
        assert!(!book.matches(&other));
    }

    #[test]
    fn apply_overwrites_only_present_fields() {
        let mut book = new_book("Animal Farm").into_book(3);

        book.apply(BookPatch {
            price: Some(12),
            genre: Some("Classic".to_string()),
            ..Default::default()
        });

        assert_eq!(book.id, 3);
        assert_eq!(book.name, "Animal Farm");
        assert_eq!(book.price, 12);
        assert_eq!(book.genre, "Classic");
    }

    #[test]
    fn validation_rejects_oversized_fields() {
        let mut book = new_book("Animal Farm");
        assert!(book.validate().is_ok());

        book.year = "123456789".to_string();
        book.name = String::new();

        let errors = book.validate().expect_err("Book should be invalid");
        let fields = errors.field_errors();

        assert!(fields.contains_key("year"));
        assert!(fields.contains_key("name"));
        assert!(!fields.contains_key("genre"));
    }

    #[test]
    fn non_finite_ratings_are_invalid() {
        for rating in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut book = new_book("Animal Farm");
            book.rating = rating;
            assert!(book.validate().is_err(), "{rating} should be rejected");

            let patch = BookPatch {
                rating: Some(rating),
                ..Default::default()
            };
            assert!(patch.validate().is_err(), "{rating} should be rejected");
        }
    }

    #[test]
    fn patch_validation_ignores_absent_fields() {
        assert!(BookPatch::default().validate().is_ok());

        let patch = BookPatch {
            genre: Some("x".repeat(33)),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }
}
