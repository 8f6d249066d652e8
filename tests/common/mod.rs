//! Shared test harness for integration tests.

#![allow(dead_code)]

use std::sync::Mutex;

use bookshelf::application::service::CatalogService;
use bookshelf::domain::model::book::{BookInput, PublicationYear};
use bookshelf::domain::model::catalog::Catalog;
use bookshelf::domain::model::id::BookId;
use bookshelf::domain::repository::CatalogStore;

// =============================================================================
// InMemoryStore — テスト用ストア
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum InMemoryError {
    #[error("in-memory store is empty")]
    Missing,
    #[error("in-memory store rejected the write")]
    ReadOnly,
    #[error("in-memory store corrupted: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// ファイルI/O不要のインメモリストア。JSON文字列で保持して往復させる。
pub struct InMemoryStore {
    json: Mutex<Option<String>>,
    read_only: bool,
}

impl InMemoryStore {
    pub fn empty() -> Self {
        Self::with_catalog(&Catalog::new())
    }

    pub fn with_catalog(catalog: &Catalog) -> Self {
        Self {
            json: Mutex::new(Some(serde_json::to_string(catalog).unwrap())),
            read_only: false,
        }
    }

    /// 何も保存されていないストア。loadは失敗する。
    pub fn missing() -> Self {
        Self {
            json: Mutex::new(None),
            read_only: false,
        }
    }

    /// 読めるが書けないストア。
    pub fn read_only(catalog: &Catalog) -> Self {
        Self {
            read_only: true,
            ..Self::with_catalog(catalog)
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.json.lock().unwrap().clone()
    }
}

impl CatalogStore for InMemoryStore {
    type Error = InMemoryError;

    fn load(&self) -> Result<Catalog, Self::Error> {
        let guard = self.json.lock().unwrap();
        let json = guard.as_ref().ok_or(InMemoryError::Missing)?;
        Ok(serde_json::from_str(json)?)
    }

    fn save(&self, catalog: &Catalog) -> Result<(), Self::Error> {
        if self.read_only {
            return Err(InMemoryError::ReadOnly);
        }
        let json = serde_json::to_string(catalog)?;
        *self.json.lock().unwrap() = Some(json);
        Ok(())
    }
}

// =============================================================================
// TestShelf — テスト用Catalog作成ヘルパー
// =============================================================================

/// テスト用の標準Catalog。タイトルでidを引ける。
pub struct TestShelf {
    pub catalog: Catalog,
}

impl TestShelf {
    /// ```text
    /// Dune            Frank Herbert   Sci-Fi   1965  ISBN 978-0441013593
    /// Emma            Jane Austen     Romance  1815  ISBN 978-0141439587
    /// Hyperion        Dan Simmons     Sci-Fi   1989  (generated ISBN)
    /// Persuasion      Jane Austen     Romance  (Unknown)
    /// ```
    pub fn standard() -> Self {
        let mut catalog = Catalog::new();
        let rows: [(&str, &str, &str, Option<i64>, Option<&str>); 4] = [
            ("Dune", "Frank Herbert", "Sci-Fi", Some(1965), Some("978-0441013593")),
            ("Emma", "Jane Austen", "Romance", Some(1815), Some("978-0141439587")),
            ("Hyperion", "Dan Simmons", "Sci-Fi", Some(1989), None),
            ("Persuasion", "Jane Austen", "Romance", None, None),
        ];
        for (title, author, genre, year, isbn) in rows {
            catalog
                .create(BookInput {
                    genre: Some(genre.into()),
                    publication_year: year.map(PublicationYear::Year),
                    isbn: isbn.map(String::from),
                    ..BookInput::new(title, author)
                })
                .unwrap();
        }
        Self { catalog }
    }

    pub fn id(&self, title: &str) -> BookId {
        self.catalog
            .books()
            .iter()
            .find(|b| b.title() == Some(title))
            .map(|b| b.id().clone())
            .unwrap_or_else(|| panic!("no book titled {title}"))
    }

    pub fn service(&self) -> CatalogService<InMemoryStore> {
        CatalogService::new(InMemoryStore::with_catalog(&self.catalog))
    }
}

// =============================================================================
// Assertion helpers
// =============================================================================

/// 結果がErrで、メッセージに指定文字列を含むことをassert。
pub fn assert_error_contains<T: std::fmt::Debug>(
    result: Result<T, impl std::fmt::Display>,
    expected: &str,
) {
    match result {
        Err(e) => {
            let msg = e.to_string();
            assert!(
                msg.contains(expected),
                "Expected error containing '{expected}', got: '{msg}'"
            );
        }
        Ok(v) => panic!("Expected error containing '{expected}', got Ok({v:?})"),
    }
}
