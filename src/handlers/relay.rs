use actix_web::{HttpResponse, Result, post};
use actix_web::web::Data;

use crate::handlers::auth::Authorized;
use crate::models::common::ApiResponse;
use crate::services::relay::AppRelay;

/// Entry point for the external scheduler. Takes no payload.
#[post("/run")]
pub async fn run_relay(_auth: Authorized, relay: Data<AppRelay>) -> Result<HttpResponse> {
    match relay.run().await {
        Ok(outcome) => {
            let message = outcome.message().to_string();
            Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(outcome.into_report(), message)))
        }
        Err(e) => Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(e.to_string()))),
    }
}
