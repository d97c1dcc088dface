use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;

use pushkind_pricefeed::db::{establish_connection_pool, run_migrations};
use pushkind_pricefeed::models::config::ServerConfig;
use pushkind_pricefeed::repository::DieselRepository;
use pushkind_pricefeed::routes::configure;
use pushkind_pricefeed::services::fetch::FeedFetcher;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let server_config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_migrations(&pool) {
        log::error!("Failed to run database migrations: {e}");
        std::process::exit(1);
    }

    let repo = web::Data::new(DieselRepository::new(pool));
    let fetcher = web::Data::new(FeedFetcher::new(server_config.fetch_timeout()));
    let bind_address = server_config.bind_address();

    log::info!(
        "Starting price feed server on {}:{} (fetch timeout {:?})",
        bind_address.0,
        bind_address.1,
        fetcher.timeout()
    );

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(repo.clone())
            .app_data(fetcher.clone())
            .configure(configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
