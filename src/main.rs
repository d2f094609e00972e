use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use chrono::Utc;
use dotenv::dotenv;
use homeserve_backend::auth::middleware::JwtSecret;
use homeserve_backend::config::Config;
use homeserve_backend::create_pool;
use homeserve_backend::db;
use homeserve_backend::handlers;
use homeserve_backend::notify::Notifier;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = Config::from_env();

    let pool = create_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");
    let db_data = web::Data::new(pool.clone());

    let jwt_secret = web::Data::new(JwtSecret(config.jwt_secret.clone()));
    let notifier = web::Data::new(Notifier::from_config(&config));
    let config_data = web::Data::new(config.clone());

    // Periodic subscription expiry sweep.
    {
        let sweep_db = pool.clone();
        let interval = config.sweep_interval_secs;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(interval));
            loop {
                ticker.tick().await;
                match db::subscriptions::sweep_expired(&sweep_db, Utc::now()).await {
                    Ok(0) => {}
                    Ok(n) => tracing::info!(expired = n, "subscription sweep expired records"),
                    Err(e) => tracing::warn!(error = %e, "subscription sweep failed"),
                }
            }
        });
    }

    let bind_addr = config.bind_addr.clone();
    tracing::info!("Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(db_data.clone())
            .app_data(jwt_secret.clone())
            .app_data(notifier.clone())
            .app_data(config_data.clone())
            .service(web::scope("/api").configure(handlers::init_routes))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
