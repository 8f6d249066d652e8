use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_BOOKS_PATH: &str = "books.json";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub books_path: PathBuf,
    pub host: IpAddr,
    pub port: u16,
    /// 起動時にストアが無ければ空配列で作成する
    pub init_store: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            books_path: PathBuf::from(DEFAULT_BOOKS_PATH),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            init_store: true,
        }
    }
}

impl Config {
    /// 環境変数から読む。`dotenvy::dotenv()` は呼び出し側で済ませておく。
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意の変数ソースから読む。不正な値は警告して既定値に戻す。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();

        let books_path = lookup("BOOKS_PATH")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or(default.books_path);

        let host = parse_or("HOST", lookup("HOST"), default.host);
        let port = parse_or("PORT", lookup("PORT"), default.port);

        let init_store = match lookup("BOOKS_INIT").as_deref().map(str::trim) {
            None | Some("") => default.init_store,
            Some(v) => !matches!(v.to_ascii_lowercase().as_str(), "false" | "0" | "no" | "off"),
        };

        Self {
            books_path,
            host,
            port,
            init_store,
        }
    }

    /// 先頭の位置引数があればストアのパスとして使う。
    pub fn with_args(mut self, mut args: impl Iterator<Item = String>) -> Self {
        if let Some(path) = args.next().filter(|a| !a.starts_with('-')) {
            self.books_path = PathBuf::from(path);
        }
        self
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(v) => v.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %v, "invalid config value, using default");
            default
        }),
    }
}
