pub mod auth;
pub mod health;
pub mod notifications;
pub mod relay;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            // Scheduler trigger
            .service(
                web::scope("/relay")
                    .service(relay::run_relay)
            )
            // Full notification lookup for the app
            .service(
                web::scope("/notifications")
                    .service(notifications::get_notification)
            )
            .route("/health", web::get().to(health::health_check))
    );
}
