use crate::domain::model::book::{Book, BookInput, NewBook};
use crate::domain::model::catalog::Catalog;
use crate::domain::model::id::BookId;
use crate::domain::model::query::{BookFilter, Pagination};
use crate::domain::repository::CatalogStore;

use super::error::AppError;

/// Catalogに対するユースケース。
/// 毎回 load → 操作 → save。呼び出しをまたいだキャッシュは持たない。
pub struct CatalogService<R: CatalogStore> {
    store: R,
}

impl<R: CatalogStore> CatalogService<R> {
    pub fn new(store: R) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &R {
        &self.store
    }

    /// 絞り込み・ページングした一覧。
    pub fn list(&self, filter: &BookFilter, page: Pagination) -> Result<Vec<Book>, AppError> {
        let catalog = self.load_catalog()?;
        let books: Vec<Book> = catalog.list(filter, page).into_iter().cloned().collect();
        tracing::debug!(count = books.len(), ?filter, "listed books");
        Ok(books)
    }

    /// Bookを作成して永続化する。作成したBookと更新後の全件を返す。
    pub fn create(&self, input: BookInput) -> Result<(Book, Catalog), AppError> {
        // 入力検証はストアを読む前に済ませる
        let new = NewBook::from_input(input)?;

        let mut catalog = self.load_catalog()?;
        let book = catalog.insert(new)?.clone();
        self.persist(&catalog)?;

        tracing::info!(id = %book.id(), isbn = ?book.isbn(), "created book");
        Ok((book, catalog))
    }

    pub fn get(&self, id: &BookId) -> Result<Book, AppError> {
        let catalog = self.load_catalog()?;
        Ok(catalog.get(id)?.clone())
    }

    /// id以外を丸ごと置き換える。
    pub fn update(&self, id: &BookId, input: BookInput) -> Result<Book, AppError> {
        let mut catalog = self.load_catalog()?;
        let book = catalog.update(id, input)?.clone();
        self.persist(&catalog)?;

        tracing::info!(id = %id, "updated book");
        Ok(book)
    }

    pub fn delete(&self, id: &BookId) -> Result<(), AppError> {
        let mut catalog = self.load_catalog()?;
        let removed = catalog.remove(id)?;
        self.persist(&catalog)?;

        tracing::info!(id = %removed.id(), remaining = catalog.len(), "deleted book");
        Ok(())
    }

    // --- private ---

    fn load_catalog(&self) -> Result<Catalog, AppError> {
        self.store
            .load()
            .map_err(|e| AppError::StorageRead(Box::new(e)))
    }

    fn persist(&self, catalog: &Catalog) -> Result<(), AppError> {
        self.store
            .save(catalog)
            .map_err(|e| AppError::StorageWrite(Box::new(e)))
    }
}
