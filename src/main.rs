use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookshelf::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookshelf=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env().with_args(std::env::args().skip(1));

    bookshelf::interface::server::run(config).await
}
