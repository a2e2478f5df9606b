use actix_web::{HttpResponse, Result};
use actix_web::web::Data;
use serde_json::json;

use crate::models::common::ApiResponse;
use crate::services::database::DatabaseService;

pub async fn health_check(db: Data<DatabaseService>) -> Result<HttpResponse> {
    match db.health_check().await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success(json!({ "store": "ok" })))),
        Err(e) => {
            log::error!("Notification store health check failed: {:#}", e);
            Ok(HttpResponse::ServiceUnavailable().json(ApiResponse::<()>::error(format!(
                "Notification store unavailable: {}",
                e
            ))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App};

    use crate::config::DatabaseConfig;

    #[actix_web::test]
    async fn test_health_check_with_memory_store() {
        let db = DatabaseService::new(&DatabaseConfig::default()).await.unwrap();
        let app = test::init_service(
            App::new()
                .app_data(Data::new(db))
                .route("/health", web::get().to(health_check)),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }
}
