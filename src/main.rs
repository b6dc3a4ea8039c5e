use std::sync::Arc;

use cocktail_catalog::{
    config::Config,
    logging,
    memory::MemoryStore,
    postgres::{run_migrations, PgStore},
    server::{self, Store},
};

async fn open_store(config: &Config) -> Result<Store, cocktail_catalog::error::Error> {
    let Some(database) = &config.database else {
        log::info!("DATABASE_URL not set, serving from an in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    };

    let store = PgStore::connect(database).await?;
    run_migrations(store.pool()).await?;
    Ok(Arc::new(store))
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    logging::init(&config.log_level);

    let addr = match config.socket_addr() {
        Ok(addr) => addr,
        Err(e) => {
            log::error!("Invalid HOST/PORT ({}:{}): {e}", config.host, config.port);
            std::process::exit(1);
        }
    };

    let store = match open_store(&config).await {
        Ok(store) => store,
        Err(e) => {
            log::error!("Failed to open the catalog store: {e}");
            std::process::exit(1);
        }
    };

    log::info!("Listening on http://{addr}");
    warp::serve(server::routes(store)).run(addr).await;
}
