use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::http::header::AUTHORIZATION;
use actix_web::web::Data;
use actix_web::{Error, FromRequest, HttpRequest, HttpResponse};
use std::future::{ready, Ready};

use crate::models::common::ApiResponse;

/// Shared secret callers must present as `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct ApiToken(pub String);

/// Extractor that only succeeds for requests carrying the configured API token.
#[derive(Debug)]
pub struct Authorized;

impl FromRequest for Authorized {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authorize(req))
    }
}

fn authorize(req: &HttpRequest) -> Result<Authorized, Error> {
    let expected = match req.app_data::<Data<ApiToken>>() {
        Some(token) if !token.0.is_empty() => token,
        _ => {
            log::error!("No API token configured, rejecting {}", req.path());
            return Err(reject(HttpResponse::InternalServerError(), "API token not configured"));
        }
    };

    let presented = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match presented {
        Some(token) if token == expected.0 => Ok(Authorized),
        Some(_) => {
            log::warn!("Rejected {}: invalid API token", req.path());
            Err(reject(HttpResponse::Unauthorized(), "Invalid API token"))
        }
        None => {
            log::warn!("Rejected {}: missing bearer token", req.path());
            Err(reject(HttpResponse::Unauthorized(), "Missing Authorization header"))
        }
    }
}

fn reject(mut builder: actix_web::HttpResponseBuilder, message: &'static str) -> Error {
    let response = builder.json(ApiResponse::<()>::error(message.to_string()));
    InternalError::from_response(message, response).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{get, test, App};
    use serde_json::Value;

    #[get("/guarded")]
    async fn guarded(_auth: Authorized) -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn test_bearer_token_is_required() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(ApiToken("s3cret".to_string())))
                .service(guarded),
        )
        .await;

        let req = test::TestRequest::get().uri("/guarded").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);

        let req = test::TestRequest::get()
            .uri("/guarded")
            .insert_header((AUTHORIZATION, "Bearer wrong"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/guarded")
            .insert_header((AUTHORIZATION, "s3cret"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/guarded")
            .insert_header((AUTHORIZATION, "Bearer s3cret"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_empty_configured_token_rejects_everything() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(ApiToken(String::new())))
                .service(guarded),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/guarded")
            .insert_header((AUTHORIZATION, "Bearer "))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(!resp.status().is_success());
    }
}
