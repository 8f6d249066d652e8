/// Display文字列はそのままHTTPの `{"error": ...}` に載る。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("Title and author are required.")]
    MissingRequired,

    #[error("Book with this ISBN already exists.")]
    DuplicateIsbn(Option<String>),

    #[error("Book not found.")]
    BookNotFound(String),
}
