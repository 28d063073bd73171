use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::book::{Book, BookPatch, NewBook};

use super::{BookFilter, BookPage, BookStore};

/// Keeps every book in memory, ordered by id.
#[derive(Debug, Default)]
pub struct InMemoryBookStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    last_id: u64,
    books: BTreeMap<u64, Book>,
}

impl Inner {
    fn insert(&mut self, new_book: NewBook) -> Book {
        self.last_id += 1;

        let book = new_book.into_book(self.last_id);
        self.books.insert(book.id, book.clone());

        book
    }
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    #[tracing::instrument(skip(self))]
    async fn list(&self, filter: &BookFilter) -> BookPage {
        let inner = self.inner.read().await;

        let matching = inner
            .books
            .values()
            .filter(|book| filter.accepts(book))
            .collect::<Vec<_>>();

        let total = matching.len();
        let books = matching
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .cloned()
            .collect::<Vec<_>>();

        tracing::trace!(total, returned = books.len(), "Listed");

        BookPage {
            total,
            offset: filter.offset,
            limit: filter.limit,
            books,
        }
    }

    async fn get(&self, id: u64) -> Option<Book> {
        self.inner.read().await.books.get(&id).cloned()
    }

    #[tracing::instrument(skip_all)]
    async fn create(&self, new_book: NewBook) -> Book {
        let book = self.inner.write().await.insert(new_book);

        tracing::debug!(id = book.id, name = %book, "Created");

        book
    }

    #[tracing::instrument(skip_all)]
    async fn get_or_create(&self, new_book: NewBook) -> (Book, bool) {
        let mut inner = self.inner.write().await;

        if let Some(book) = inner.books.values().find(|book| book.matches(&new_book)) {
            tracing::trace!(id = book.id, "Found");

            return (book.clone(), false);
        }

        let book = inner.insert(new_book);

        tracing::debug!(id = book.id, name = %book, "Created");

        (book, true)
    }

    #[tracing::instrument(skip(self, new_book))]
    async fn replace(&self, id: u64, new_book: NewBook) -> Option<Book> {
        let mut inner = self.inner.write().await;
        let book = inner.books.get_mut(&id)?;

        *book = new_book.into_book(id);

        Some(book.clone())
    }

    #[tracing::instrument(skip(self, patch))]
    async fn update(&self, id: u64, patch: BookPatch) -> Option<Book> {
        let mut inner = self.inner.write().await;
        let book = inner.books.get_mut(&id)?;

        book.apply(patch);

        Some(book.clone())
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: u64) -> Option<Book> {
        self.inner.write().await.books.remove(&id)
    }

    async fn count(&self) -> usize {
        self.inner.read().await.books.len()
    }
}
