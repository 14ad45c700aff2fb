pub mod dashboard;
pub mod event_handlers;
pub mod idea_handlers;
pub mod moderation_handlers;

use actix_web::{
    web, Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::Method,
    middleware::{from_fn, Next},
};

use crate::api_structs::ApiErrorResponse;
use crate::auth::middleware::require_auth;

/// CSRF protection for mutation endpoints.
///
/// Rejects POST/PUT/DELETE requests without Content-Type: application/json.
/// Browsers cannot send cross-origin JSON with cookies via a simple form POST,
/// so the header check stands in for tokens. GET requests are exempt.
pub async fn require_json_content_type(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let method = req.method().clone();

    if method == Method::POST || method == Method::PUT || method == Method::DELETE {
        let content_type = req
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !content_type.starts_with("application/json") {
            let response = HttpResponse::BadRequest().json(ApiErrorResponse::new(
                "Content-Type must be application/json for mutation requests",
            ));
            return Ok(req.into_response(response).map_into_right_body());
        }
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

/// Configure the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .wrap(from_fn(require_json_content_type))
            .route("/ideas/featured", web::get().to(idea_handlers::featured))
            .route("/ideas/{id}", web::get().to(idea_handlers::detail))
            .route("/events", web::get().to(event_handlers::published))
            .route("/stats", web::get().to(dashboard::public_stats))
            .service(
                web::scope("/me")
                    .wrap(from_fn(require_auth))
                    .route("/ideas", web::get().to(idea_handlers::my_ideas))
                    .route("/ideas", web::post().to(idea_handlers::create))
                    .route("/ideas/{id}", web::put().to(idea_handlers::update))
                    .route(
                        "/ideas/{id}/files/{file_id}",
                        web::delete().to(idea_handlers::delete_file),
                    ),
            )
            .service(
                web::scope("/admin")
                    .wrap(from_fn(require_auth))
                    .route("/stats", web::get().to(dashboard::admin_stats))
                    .route("/moderation", web::get().to(moderation_handlers::queue))
                    .route("/moderation/{id}/approve", web::post().to(moderation_handlers::approve))
                    .route("/moderation/{id}/reject", web::post().to(moderation_handlers::reject))
                    .route("/moderation/{id}/feature", web::post().to(moderation_handlers::feature))
                    .route(
                        "/moderation/{id}/unfeature",
                        web::post().to(moderation_handlers::unfeature),
                    )
                    .route("/events", web::get().to(event_handlers::list))
                    .route("/events", web::post().to(event_handlers::create))
                    .route("/events/{id}", web::get().to(event_handlers::read))
                    .route("/events/{id}", web::put().to(event_handlers::update)),
            ),
    );
}
