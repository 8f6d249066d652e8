use anyhow::Context;

use crate::application::service::CatalogService;
use crate::config::Config;
use crate::infra::json_store::JsonCatalogStore;

use super::http;

/// HTTP Serverを起動する。終了するまで戻らない。
pub async fn run(config: Config) -> anyhow::Result<()> {
    let store = JsonCatalogStore::new(&config.books_path);

    if config.init_store && store.initialize()? {
        tracing::info!(path = %store.path().display(), "created empty book store");
    }

    let app = http::router(CatalogService::new(store));

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    tracing::info!(
        %addr,
        books = %config.books_path.display(),
        "listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
