mod config;
mod db;
mod errors;
mod middleware;
mod models;
mod routes;
mod services;
mod utils;

use actix_web::{App, HttpServer, web};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::AppConfig::from_env().expect("Invalid configuration");

    println!("🔌 Connecting to database...");
    let db = db::establish_connection(&config.database_url)
        .await
        .expect("Failed to connect to database");
    println!("✅ Database connected!");

    println!("🚀 Starting server on http://{}:{}", config.host, config.port);

    let bind_addr = (config.host.clone(), config.port);
    let config_data = web::Data::new(config);
    let db_data = web::Data::new(db);

    HttpServer::new(move || {
        App::new()
            .app_data(db_data.clone())
            .app_data(config_data.clone())
            .configure(routes::configure_routes)
    })
    .bind(bind_addr)?
    .run()
    .await
}
