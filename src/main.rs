use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;

mod api;
mod auth;
mod config;
mod docs;
mod error;
mod model;
mod models;
mod routes;
mod service;
mod store;

use config::Config;
use store::DataStore;

use crate::auth::revocation::RevokedTokens;
use crate::docs::ApiDoc;
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Cafe POS is running"
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
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let store = DataStore::open(&config.data_dir).context("failed to open data directory")?;

    let migrated = api::menu::migrate_menu_ids(&store).context("menu id migration failed")?;
    if migrated > 0 {
        info!(migrated, "Menu migrated");
    }
    if api::user::ensure_admin(&store, &config.default_admin_password)
        .context("failed to seed admin account")?
    {
        warn!("No admin account found, created `admin` with the default password");
    }

    // one instance shared by all workers so the store lock is process-wide
    let store = Data::new(store);
    let revoked = Data::new(RevokedTokens::new(config.refresh_token_ttl));
    let server_addr = config.server_addr.clone();

    info!(addr = %server_addr, "Listening");

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(store.clone())
            .app_data(revoked.clone())
            .app_data(Data::new(config.clone()))
            .service(index)
            .configure(|cfg| routes::configure(cfg, config.clone()))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
