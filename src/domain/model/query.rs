use std::ops::Range;

use super::book::Book;

/// 一覧の絞り込み条件。指定された条件はすべてAND。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookFilter {
    pub genre: Option<String>,
    pub author: Option<String>,
    /// 数値へ変換済みの出版年。NaNはどのBookにも一致しない。
    pub publication_year: Option<f64>,
}

impl BookFilter {
    /// クエリ文字列から組み立てる。空文字列の条件は無視する。
    pub fn from_params(
        genre: Option<&str>,
        author: Option<&str>,
        publication_year: Option<&str>,
    ) -> Self {
        Self {
            genre: genre.filter(|s| !s.is_empty()).map(String::from),
            author: author.filter(|s| !s.is_empty()).map(String::from),
            publication_year: publication_year
                .filter(|s| !s.is_empty())
                .map(coerce_number),
        }
    }

    pub fn matches(&self, book: &Book) -> bool {
        if let Some(genre) = &self.genre {
            if book.genre() != Some(genre.as_str()) {
                return false;
            }
        }
        if let Some(author) = &self.author {
            if book.author() != Some(author.as_str()) {
                return false;
            }
        }
        if let Some(year) = self.publication_year {
            let stored = book.publication_year().and_then(|y| y.as_year());
            if stored.map(|y| y as f64) != Some(year) {
                return false;
            }
        }
        true
    }
}

/// ページ指定。値の検証はせず、算術結果をそのままスライス範囲にする。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pagination {
    page: f64,
    limit: f64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1.0,
            limit: 10.0,
        }
    }
}

impl Pagination {
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: page as f64,
            limit: limit as f64,
        }
    }

    /// クエリ文字列から組み立てる。省略時は既定値、数値でなければNaN。
    pub fn from_params(page: Option<&str>, limit: Option<&str>) -> Self {
        let default = Self::default();
        Self {
            page: page.map(coerce_number).unwrap_or(default.page),
            limit: limit.map(coerce_number).unwrap_or(default.limit),
        }
    }

    /// 長さ `len` の列に対する `[start, end)`。
    ///
    /// 負の位置は末尾から数え、NaNは0、範囲外は端に寄せる。
    pub fn window(&self, len: usize) -> Range<usize> {
        let start = relative_index((self.page - 1.0) * self.limit, len);
        let end = relative_index(self.page * self.limit, len);
        if end <= start {
            start..start
        } else {
            start..end
        }
    }
}

/// 文字列を数値として解釈する。空白のみは0、解釈できなければNaN。
///
/// 受け付けるのは10進表記、`Infinity`、`0x` / `0o` / `0b` 付きの整数。
pub(crate) fn coerce_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(value) = radix_literal(trimmed) {
        return value;
    }
    // f64::from_str は "inf" や "nan" も通すので先に弾く
    let decimal = trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !decimal {
        return f64::NAN;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}

/// 符号なしの `0x` / `0o` / `0b` 表記。接頭辞が無ければNone。
fn radix_literal(s: &str) -> Option<f64> {
    let radix = match s.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    let digits = &s[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let value = digits
        .chars()
        .try_fold(0.0, |acc, c| {
            c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
        })
        .unwrap_or(f64::NAN);
    Some(value)
}

fn relative_index(position: f64, len: usize) -> usize {
    let len = len as f64;
    let position = if position.is_nan() {
        0.0
    } else {
        position.trunc()
    };
    let index = if position < 0.0 {
        (len + position).max(0.0)
    } else {
        position.min(len)
    };
    index as usize
}
