use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::domain::model::catalog::Catalog;
use crate::domain::repository::CatalogStore;

#[derive(Debug, thiserror::Error)]
pub enum JsonStoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// JSONファイルによるCatalogStore実装。
/// 1ファイル = Bookの配列全体。
#[derive(Debug, Clone)]
pub struct JsonCatalogStore {
    path: PathBuf,
}

impl JsonCatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// ファイルが無ければ空配列で作成する。作成したらtrue。
    pub fn initialize(&self) -> Result<bool, JsonStoreError> {
        if self.path.exists() {
            return Ok(false);
        }
        self.save(&Catalog::new())?;
        Ok(true)
    }

    fn io_error(&self, source: std::io::Error) -> JsonStoreError {
        JsonStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn json_error(&self, source: serde_json::Error) -> JsonStoreError {
        JsonStoreError::Json {
            path: self.path.clone(),
            source,
        }
    }
}

impl CatalogStore for JsonCatalogStore {
    type Error = JsonStoreError;

    fn load(&self) -> Result<Catalog, Self::Error> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        serde_json::from_str(&content).map_err(|e| self.json_error(e))
    }

    /// 同じディレクトリの一時ファイルに書いてからrenameする。
    /// 読み手に書きかけは見えず、同時に保存しても一時ファイルは衝突しない。
    fn save(&self, catalog: &Catalog) -> Result<(), Self::Error> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;

        let content = serde_json::to_string_pretty(catalog).map_err(|e| self.json_error(e))?;
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;
        Ok(())
    }
}
