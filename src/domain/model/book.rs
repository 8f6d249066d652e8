use serde::{Deserialize, Serialize};

use super::id::BookId;
use crate::domain::error::DomainError;

pub const UNKNOWN: &str = "Unknown";
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/150";
pub const NO_DESCRIPTION: &str = "No description available";

/// 出版年。数値、または `"Unknown"` などの文字列ラベル。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PublicationYear {
    Year(i64),
    Label(String),
}

impl PublicationYear {
    pub fn unknown() -> Self {
        Self::Label(UNKNOWN.to_string())
    }

    pub fn as_year(&self) -> Option<i64> {
        match self {
            Self::Year(y) => Some(*y),
            Self::Label(_) => None,
        }
    }

    /// `0` と空文字列は未指定扱い。
    fn is_blank(&self) -> bool {
        match self {
            Self::Year(y) => *y == 0,
            Self::Label(s) => s.is_empty(),
        }
    }
}

/// 作成・更新リクエストのボディ。全フィールド省略可。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookInput {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub publication_year: Option<PublicationYear>,
    pub image_url: Option<String>,
    #[serde(rename = "ISBN")]
    pub isbn: Option<String>,
    pub description: Option<String>,
}

impl BookInput {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            author: Some(author.into()),
            ..Self::default()
        }
    }
}

/// 既定値を適用済みの新規Book。idとISBNの採番はCatalogが行う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    title: String,
    author: String,
    genre: String,
    publication_year: PublicationYear,
    image_url: String,
    isbn: Option<String>,
    description: String,
}

impl NewBook {
    /// 必須項目を検証し、欠けた任意項目に既定値を入れる。
    pub fn from_input(input: BookInput) -> Result<Self, DomainError> {
        let title = non_blank(input.title).ok_or(DomainError::MissingRequired)?;
        let author = non_blank(input.author).ok_or(DomainError::MissingRequired)?;

        Ok(Self {
            title,
            author,
            genre: non_blank(input.genre).unwrap_or_else(|| UNKNOWN.to_string()),
            publication_year: input
                .publication_year
                .filter(|y| !y.is_blank())
                .unwrap_or_else(PublicationYear::unknown),
            image_url: non_blank(input.image_url)
                .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string()),
            isbn: non_blank(input.isbn),
            description: non_blank(input.description)
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        })
    }

    /// 利用者が指定したISBN。`None` なら挿入時に採番される。
    pub fn isbn(&self) -> Option<&str> {
        self.isbn.as_deref()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// 永続化されるBook。
///
/// 更新は丸ごと置き換えなので、id以外のフィールドは欠落しうる。
/// 欠落フィールドはJSONに出力しない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    id: BookId,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    publication_year: Option<PublicationYear>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    #[serde(rename = "ISBN", skip_serializing_if = "Option::is_none")]
    isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl Book {
    pub(crate) fn from_new(id: BookId, new: NewBook, isbn: String) -> Self {
        Self {
            id,
            title: Some(new.title),
            author: Some(new.author),
            genre: Some(new.genre),
            publication_year: Some(new.publication_year),
            image_url: Some(new.image_url),
            isbn: Some(isbn),
            description: Some(new.description),
        }
    }

    pub fn id(&self) -> &BookId {
        &self.id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn genre(&self) -> Option<&str> {
        self.genre.as_deref()
    }

    pub fn publication_year(&self) -> Option<&PublicationYear> {
        self.publication_year.as_ref()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn isbn(&self) -> Option<&str> {
        self.isbn.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    // --- 内部操作（Catalog経由でのみ呼ばれる） ---

    /// id以外を入力値で丸ごと置き換える。省略されたフィールドは消える。
    pub(crate) fn replace_with(&mut self, input: BookInput) {
        self.title = input.title;
        self.author = input.author;
        self.genre = input.genre;
        self.publication_year = input.publication_year;
        self.image_url = input.image_url;
        self.isbn = input.isbn;
        self.description = input.description;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let new = NewBook::from_input(BookInput::new("Dune", "Frank Herbert")).unwrap();
        let book = Book::from_new(BookId::new(), new, "isbn-1".into());

        assert_eq!(book.title(), Some("Dune"));
        assert_eq!(book.genre(), Some(UNKNOWN));
        assert_eq!(book.publication_year(), Some(&PublicationYear::unknown()));
        assert_eq!(book.image_url(), Some(PLACEHOLDER_IMAGE_URL));
        assert_eq!(book.isbn(), Some("isbn-1"));
        assert_eq!(book.description(), Some(NO_DESCRIPTION));
    }

    #[test]
    fn blank_values_count_as_missing() {
        let input = BookInput {
            genre: Some(String::new()),
            publication_year: Some(PublicationYear::Year(0)),
            isbn: Some(String::new()),
            ..BookInput::new("Dune", "Frank Herbert")
        };
        let new = NewBook::from_input(input).unwrap();
        assert_eq!(new.genre, UNKNOWN);
        assert_eq!(new.publication_year, PublicationYear::unknown());
        assert_eq!(new.isbn(), None);
    }

    #[test]
    fn reject_missing_author() {
        let input = BookInput {
            title: Some("Orphan".into()),
            ..BookInput::default()
        };
        assert_eq!(
            NewBook::from_input(input),
            Err(DomainError::MissingRequired)
        );
    }

    #[test]
    fn reject_empty_title() {
        let input = BookInput::new("", "Someone");
        assert_eq!(
            NewBook::from_input(input),
            Err(DomainError::MissingRequired)
        );
    }

    #[test]
    fn publication_year_accepts_number_or_label() {
        let n: PublicationYear = serde_json::from_str("1965").unwrap();
        assert_eq!(n, PublicationYear::Year(1965));

        let s: PublicationYear = serde_json::from_str("\"1965\"").unwrap();
        assert_eq!(s, PublicationYear::Label("1965".into()));
        assert_eq!(s.as_year(), None);
    }

    #[test]
    fn replace_with_drops_omitted_fields() {
        let new = NewBook::from_input(BookInput::new("Dune", "Frank Herbert")).unwrap();
        let mut book = Book::from_new(BookId::new(), new, "isbn-1".into());
        let id = book.id().clone();

        book.replace_with(BookInput::new("Dune Messiah", "Frank Herbert"));

        assert_eq!(book.id(), &id);
        assert_eq!(book.title(), Some("Dune Messiah"));
        assert_eq!(book.genre(), None);
        assert_eq!(book.isbn(), None);

        let json = serde_json::to_value(&book).unwrap();
        assert!(json.get("genre").is_none());
        assert!(json.get("ISBN").is_none());
    }

    #[test]
    fn serialized_field_names() {
        let new = NewBook::from_input(BookInput::new("Dune", "Frank Herbert")).unwrap();
        let book = Book::from_new(BookId::new(), new, "isbn-1".into());
        let json = serde_json::to_value(&book).unwrap();

        for key in [
            "id",
            "title",
            "author",
            "genre",
            "publicationYear",
            "imageUrl",
            "ISBN",
            "description",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
    }
}
