use sawari::config::{Config, StoreKind};
use sawari::db::{MemoryStore, PgStore};
use sawari::engine::Engine;
use sawari::error::Error;
use sawari::server::serve;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let engine = match config.store {
        StoreKind::Postgres => {
            let store = PgStore::new(&config.database_url, config.max_connections).await?;
            Engine::new(store)?
        }
        StoreKind::Memory => {
            tracing::warn!("using the in-memory ride store, nothing will be persisted");
            Engine::new(MemoryStore::new())?
        }
    };

    serve(engine, config.bind_addr).await
}
