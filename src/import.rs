use std::{io, path::Path};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{book::NewBook, store::BookStore};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Failed to read file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// One row of a bestseller export: `Name, Author, User Rating, Reviews, Price, Year, Genre`.
#[derive(Debug, Deserialize)]
struct CsvRow(String, String, f64, i64, i64, String, String);

impl From<CsvRow> for NewBook {
    fn from(CsvRow(name, author, rating, reviews, price, year, genre): CsvRow) -> Self {
        NewBook {
            name,
            author,
            rating,
            reviews,
            price,
            year,
            genre,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, ToSchema)]
pub struct ImportFailure {
    /// 1-based line number in the CSV input.
    pub line: u64,
    pub reason: String,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, ToSchema)]
pub struct ImportReport {
    /// Rows read, excluding the header.
    pub processed: usize,
    pub created: usize,
    /// Rows that matched a book already in the store.
    pub existing: usize,
    pub failed: Vec<ImportFailure>,
}

fn parse(reader: impl io::Read) -> Result<Vec<(u64, Result<NewBook, String>)>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let mut rows = Vec::new();

    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                let line = err.position().map(|pos| pos.line()).unwrap_or_default();

                rows.push((line, Err(err.to_string())));
                continue;
            }
        };

        let line = record.position().map(|pos| pos.line()).unwrap_or_default();

        let new_book = record
            .deserialize::<CsvRow>(None)
            .map(NewBook::from)
            .map_err(|err| err.to_string())
            .and_then(|new_book| {
                new_book
                    .validate()
                    .map(|_| new_book)
                    .map_err(|errors| errors.to_string())
            });

        rows.push((line, new_book));
    }

    Ok(rows)
}

/// Imports every row of the CSV, skipping the header.
///
/// Each valid row is stored unless a book with exactly the same fields already exists.
/// Invalid rows are reported in [`ImportReport::failed`] and do not abort the import.
#[tracing::instrument(skip_all)]
pub async fn import_csv(
    reader: impl io::Read,
    store: &dyn BookStore,
) -> Result<ImportReport, ImportError> {
    let rows = parse(reader)?;

    let mut report = ImportReport {
        processed: rows.len(),
        ..Default::default()
    };

    for (line, new_book) in rows {
        match new_book {
            Ok(new_book) => match store.get_or_create(new_book).await {
                (_, true) => report.created += 1,
                (_, false) => report.existing += 1,
            },
            Err(reason) => {
                tracing::warn!(line, %reason, "Skipping row");

                report.failed.push(ImportFailure { line, reason });
            }
        }
    }

    tracing::info!(
        processed = report.processed,
        created = report.created,
        existing = report.existing,
        failed = report.failed.len(),
        "Imported"
    );

    Ok(report)
}

pub async fn import_csv_file(
    path: impl AsRef<Path>,
    store: &dyn BookStore,
) -> Result<ImportReport, ImportError> {
    let path = path.as_ref();

    tracing::info!(path = %path.display(), "Importing");

    let bytes = tokio::fs::read(path).await.map_err(|source| ImportError::Read {
        path: path.display().to_string(),
        source,
    })?;

    import_csv(bytes.as_slice(), store).await
}

#[cfg(test)]
mod tests {
    use crate::store::memory::InMemoryBookStore;

    use super::*;

    const CSV: &str = "\
Name,Author,User Rating,Reviews,Price,Year,Genre
10-Day Green Smoothie Cleanse,JJ Smith,4.7,17350,8,2016,Non Fiction
11/22/63: A Novel,Stephen King,4.6,2052,22,2011,Fiction
10-Day Green Smoothie Cleanse,JJ Smith,4.7,17350,8,2016,Non Fiction
Broken,Nobody,not-a-number,1,1,2011,Fiction
Too Long,Somebody,4.0,1,1,201120112011,Fiction
";

    #[tokio::test]
    async fn imports_rows_and_skips_duplicates() {
        let store = InMemoryBookStore::new();

        let report = import_csv(CSV.as_bytes(), &store)
            .await
            .expect("Import failed");

        assert_eq!(report.processed, 5);
        assert_eq!(report.created, 2);
        assert_eq!(report.existing, 1);
        assert_eq!(
            report.failed.iter().map(|f| f.line).collect::<Vec<_>>(),
            vec![5, 6]
        );
        assert_eq!(store.count().await, 2);

        let book = store.get(2).await.expect("Book should exist");
        assert_eq!(book.name, "11/22/63: A Novel");
        assert_eq!(book.rating, 4.6);
        assert_eq!(book.year, "2011");
    }

    #[tokio::test]
    async fn importing_twice_creates_nothing_new() {
        let store = InMemoryBookStore::new();

        import_csv(CSV.as_bytes(), &store).await.expect("Import failed");
        let report = import_csv(CSV.as_bytes(), &store).await.expect("Import failed");

        assert_eq!(report.created, 0);
        assert_eq!(report.existing, 3);
        assert_eq!(store.count().await, 2);
    }

    #[tokio::test]
    async fn quoted_fields_keep_their_commas() {
        let store = InMemoryBookStore::new();
        let csv = "Name,Author,User Rating,Reviews,Price,Year,Genre\n\
                   \"Oh, the Places You'll Go!\",Dr. Seuss,4.9,21834,8,2012,Fiction\n";

        let report = import_csv(csv.as_bytes(), &store).await.expect("Import failed");

        assert_eq!(report.created, 1);
        let book = store.get(1).await.expect("Book should exist");
        assert_eq!(book.name, "Oh, the Places You'll Go!");
    }

    #[tokio::test]
    async fn non_finite_ratings_are_reported() {
        let store = InMemoryBookStore::new();
        let csv = "Name,Author,User Rating,Reviews,Price,Year,Genre\n\
                   Nothing,Nobody,NaN,1,1,2011,Fiction\n\
                   Everything,Everybody,inf,1,1,2011,Fiction\n";

        for _ in 0..2 {
            let report = import_csv(csv.as_bytes(), &store).await.expect("Import failed");

            assert_eq!(report.created, 0);
            assert_eq!(
                report.failed.iter().map(|f| f.line).collect::<Vec<_>>(),
                vec![2, 3]
            );
        }

        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn cells_are_kept_verbatim() {
        let store = InMemoryBookStore::new();
        let csv = "Name,Author,User Rating,Reviews,Price,Year,Genre\n\
                   Dune , Frank Herbert,4.4,1,1,1965,Fiction\n";

        let report = import_csv(csv.as_bytes(), &store).await.expect("Import failed");

        assert_eq!(report.created, 1);
        let book = store.get(1).await.expect("Book should exist");
        assert_eq!(book.name, "Dune ");
        assert_eq!(book.author, " Frank Herbert");
    }

    #[tokio::test]
    async fn short_rows_are_reported() {
        let store = InMemoryBookStore::new();
        let csv = "Name,Author,User Rating,Reviews,Price,Year,Genre\nOnly,Two\n";

        let report = import_csv(csv.as_bytes(), &store).await.expect("Import failed");

        assert_eq!(report.processed, 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].line, 2);
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let store = InMemoryBookStore::new();

        let err = import_csv_file("does/not/exist.csv", &store)
            .await
            .expect_err("Import should fail");

        assert!(matches!(err, ImportError::Read { .. }));
    }

    #[tokio::test]
    async fn sample_file_imports_cleanly() {
        let store = InMemoryBookStore::new();

        let report = import_csv_file("data/bestsellers.sample.csv", &store)
            .await
            .expect("Import failed");

        assert!(report.failed.is_empty());
        assert_eq!(report.created, store.count().await);
        assert!(report.created > 0);
    }
}
