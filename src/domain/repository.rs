use super::model::catalog::Catalog;

/// 永続化の抽象。Infra層が実装する。
/// 常に全件を読み書きする。ロックは持たない（後勝ち）。
pub trait CatalogStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn load(&self) -> Result<Catalog, Self::Error>;
    fn save(&self, catalog: &Catalog) -> Result<(), Self::Error>;
}
