use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

use taskmate::auth::{AuthMiddleware, AuthService, MemoryRevocationStore, TokenKeys};
use taskmate::config::Config;
use taskmate::directory::PgAccountDirectory;
use taskmate::routes::{self, health};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    // Config::from_env aborts on a missing DATABASE_URL or JWT_SECRET; the
    // server never starts with an unsigned-token configuration.
    let config = Config::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    let auth = Arc::new(AuthService::new(
        Arc::new(PgAccountDirectory::new(pool.clone())),
        Arc::new(MemoryRevocationStore::new()),
        TokenKeys::from_config(&config),
    ));

    log::info!("Starting taskmate server at {}", config.server_url());

    let bind_addr = (config.server_host.clone(), config.server_port);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::from(auth.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware::new(auth.clone()))
                    .configure(routes::config),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
