use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpResponse, HttpServer, cookie::Key, middleware, web};

use ideahub::api_structs::ApiErrorResponse;
use ideahub::config::Config;
use ideahub::moderation::PgStore;
use ideahub::state::AppState;
use ideahub::{db, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = Config::from_env().map_err(std::io::Error::other)?;

    let pool = db::init_pool(&config.database_url, config.db_max_connections)
        .await
        .map_err(std::io::Error::other)?;
    db::run_migrations(&pool).await.map_err(std::io::Error::other)?;

    let store = Arc::new(PgStore::new(pool.clone()));
    let state = web::Data::new(AppState::new(store.clone(), store, config.max_queue_size));

    let secret_key = match &config.session_key {
        Some(key) => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(key.as_bytes())
        }
        None => Key::generate(),
    };
    let cookie_secure = config.cookie_secure;

    log::info!("Starting server at http://{}", config.bind_addr);

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
            .cookie_secure(cookie_secure)
            .cookie_http_only(true)
            .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(state.clone())
            .configure(handlers::configure)
            .default_service(web::to(|| async {
                HttpResponse::NotFound().json(ApiErrorResponse::new("Not found"))
            }))
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
