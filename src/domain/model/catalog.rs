use serde::{Deserialize, Serialize};

use super::book::{Book, BookInput, NewBook};
use super::id::{generate_isbn, BookId};
use super::query::{BookFilter, Pagination};
use crate::domain::error::DomainError;

/// Bookの全件。集約ルート。永続化形式はBookのJSON配列そのもの。
///
/// 挿入は末尾追加。並び順はページングにしか影響しない。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    books: Vec<Book>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// 絞り込み後の列から1ページ分を返す。
    pub fn list(&self, filter: &BookFilter, page: Pagination) -> Vec<&Book> {
        let matched: Vec<&Book> = self.books.iter().filter(|b| filter.matches(b)).collect();
        let window = page.window(matched.len());
        matched[window].to_vec()
    }

    pub fn get(&self, id: &BookId) -> Result<&Book, DomainError> {
        self.books
            .iter()
            .find(|b| b.id() == id)
            .ok_or_else(|| DomainError::BookNotFound(id.to_string()))
    }

    /// 新規Bookを末尾に追加する。ISBN重複を検証してからid・ISBNを採番する。
    pub fn insert(&mut self, new: NewBook) -> Result<&Book, DomainError> {
        if let Some(isbn) = new.isbn() {
            if self.isbn_taken(Some(isbn), None) {
                return Err(DomainError::DuplicateIsbn(Some(isbn.to_string())));
            }
        }

        let id = self.fresh_id();
        let isbn = match new.isbn() {
            Some(isbn) => isbn.to_string(),
            None => self.fresh_isbn(),
        };
        self.books.push(Book::from_new(id, new, isbn));

        let idx = self.books.len() - 1;
        Ok(&self.books[idx])
    }

    /// 入力を検証して追加する。
    pub fn create(&mut self, input: BookInput) -> Result<&Book, DomainError> {
        let new = NewBook::from_input(input)?;
        self.insert(new)
    }

    /// id以外を丸ごと置き換える。既定値の適用も必須項目の検証もしない。
    pub fn update(&mut self, id: &BookId, input: BookInput) -> Result<&Book, DomainError> {
        let idx = self.index_of(id)?;

        if self.isbn_taken(input.isbn.as_deref(), Some(id)) {
            return Err(DomainError::DuplicateIsbn(input.isbn));
        }

        let book = &mut self.books[idx];
        book.replace_with(input);
        Ok(book)
    }

    /// 一致する1件を削除し、削除したBookを返す。
    pub fn remove(&mut self, id: &BookId) -> Result<Book, DomainError> {
        let idx = self.index_of(id)?;
        Ok(self.books.remove(idx))
    }

    // --- Private helpers ---

    fn index_of(&self, id: &BookId) -> Result<usize, DomainError> {
        self.books
            .iter()
            .position(|b| b.id() == id)
            .ok_or_else(|| DomainError::BookNotFound(id.to_string()))
    }

    /// `except` 以外のBookが同じISBNを持つか。欠落ISBN同士も一致とみなす。
    fn isbn_taken(&self, isbn: Option<&str>, except: Option<&BookId>) -> bool {
        self.books
            .iter()
            .filter(|b| Some(b.id()) != except)
            .any(|b| b.isbn() == isbn)
    }

    fn fresh_id(&self) -> BookId {
        loop {
            let id = BookId::new();
            if self.index_of(&id).is_err() {
                return id;
            }
        }
    }

    fn fresh_isbn(&self) -> String {
        loop {
            let isbn = generate_isbn();
            if !self.isbn_taken(Some(&isbn), None) {
                return isbn;
            }
        }
    }
}
