use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use dotenvy::dotenv;

use asistencia::config::Config;
use asistencia::db::init_db;
use asistencia::docs::ApiDoc;
use asistencia::routes;
use asistencia::utils::page_cache::PageCache;
use asistencia::view::page;

use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
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

    info!("Server starting...");

    let pool = init_db(&config.database_url).await;
    let page_cache = PageCache::new(config.page_cache_ttl);

    let pool_for_warmup = pool.clone();
    let cache_for_warmup = page_cache.clone();
    let server_addr = config.server_addr.clone();

    actix_web::rt::spawn(async move {
        // Fails until the seed endpoint has created the schema.
        if let Err(e) = page::warmup_page_cache(&pool_for_warmup, &cache_for_warmup).await {
            eprintln!("Failed to warmup page cache: {:?}", e);
        }
    });

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(page_cache.clone()))
            .configure(routes::configure)
    })
    .bind(server_addr)?
    .run()
    .await
}
