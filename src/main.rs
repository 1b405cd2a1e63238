use std::time::Duration;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use timebee_web::client::BackendGateway;
use timebee_web::config::Config;
use timebee_web::docs::ApiDoc;
use timebee_web::routes;
use timebee_web::services::CatalogCache;

#[get("/")]
async fn index() -> impl Responder {
    "Timebee web"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(backend = %config.backend_url, "Server starting...");

    let client = reqwest::Client::builder()
        .build()
        .context("failed to build HTTP client")?;
    let gateway = BackendGateway::new(client, &config.backend_url);
    let catalogs = CatalogCache::new(Duration::from_secs(config.catalog_ttl_secs));

    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(config.clone()))
            .app_data(Data::new(gateway.clone()))
            .app_data(Data::new(catalogs.clone()))
            .service(index)
            .configure(|cfg| routes::configure(cfg, &config))
    })
    .bind(&server_addr)
    .with_context(|| format!("failed to bind {server_addr}"))?
    .run()
    .await
    .context("server terminated with an error")
}
