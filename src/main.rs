use std::time::Duration;

use actix_web::{App, HttpServer, middleware, web};

use ivfcare::api::ApiClient;
use ivfcare::auth::rate_limit::{self, LoginThrottle};
use ivfcare::config::AppConfig;
use ivfcare::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // A missing .env is fine; the process environment is used as-is.
    let _ = dotenvy::dotenv();
    env_logger::init();

    let config = AppConfig::from_env();
    let api = ApiClient::new(&config.api_base_url, config.http_timeout)
        .map_err(|e| std::io::Error::other(format!("Cannot build backend client: {e}")))?;
    let secret_key = config.session_key();
    let throttle = LoginThrottle::default();
    rate_limit::spawn_pruner(throttle.clone(), Duration::from_secs(300));
    let throttle = web::Data::new(throttle);

    log::info!("Backend API at {}", api.base_url());
    log::info!("Starting server at http://{}", config.bind_addr);

    let bind_addr = config.bind_addr.clone();
    let config = web::Data::new(config);
    let api = web::Data::new(api);

    HttpServer::new(move || {
        App::new()
            .wrap(routes::session_middleware(&config, secret_key.clone()))
            .wrap(middleware::Logger::default())
            .app_data(api.clone())
            .app_data(config.clone())
            .app_data(throttle.clone())
            // Static files
            .service(actix_files::Files::new("/static", "./static"))
            .configure(routes::configure)
            // Default 404 handler (must be registered last)
            .default_service(web::to(routes::not_found))
    })
    .bind(bind_addr)?
    .run()
    .await
}
