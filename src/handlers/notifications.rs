use actix_web::{HttpResponse, Result, get};
use actix_web::web::{Data, Path};

use crate::handlers::auth::Authorized;
use crate::models::common::ApiResponse;
use crate::services::database::{DatabaseService, NotificationStore};

#[get("/{notification_id}")]
pub async fn get_notification(
    _auth: Authorized,
    db: Data<DatabaseService>,
    path: Path<String>,
) -> Result<HttpResponse> {
    let notification_id = path.into_inner();

    match db.get_full(&notification_id).await {
        Ok(Some(notification)) => Ok(HttpResponse::Ok().json(ApiResponse::success(notification))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error(format!(
            "Notification {} not found",
            notification_id
        )))),
        Err(e) => {
            log::error!("Failed to load notification {}: {:#}", notification_id, e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to load notification".to_string(),
            )))
        }
    }
}
