mod config;
mod error;
mod models;
mod handlers;
mod services;
mod utils;

use actix_web::{web, App, HttpServer, http::header, middleware::Logger};
use actix_cors::Cors;
use dotenv::dotenv;
use std::sync::Arc;

use handlers::auth::ApiToken;
use services::{
    database::DatabaseService,
    expo::ExpoPushService,
    mailbox::ImapMailbox,
    push::PushDispatcher,
    relay::MailRelay,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {}", e);
            log::error!("Required variables: {}", config::REQUIRED_VARS);
            std::process::exit(1);
        }
    };

    // One store handle for the whole process, shared by the relay and handlers
    let database_service = match DatabaseService::new(&config.database).await {
        Ok(service) => Arc::new(service),
        Err(e) => {
            log::error!("Failed to initialize notification store: {:#}", e);
            std::process::exit(1);
        }
    };

    let push_service = ExpoPushService::new(config.push.clone())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    let dispatcher = PushDispatcher::new(
        database_service.clone(),
        push_service,
        config.push.sound.clone(),
    );
    let relay = web::Data::new(MailRelay::new(
        ImapMailbox::new(config.imap.clone()),
        database_service.clone(),
        dispatcher,
        config.imap.sender_filter.clone(),
    ));
    let database = web::Data::from(database_service);
    let api_token = web::Data::new(ApiToken(config.app.api_token.clone()));
    let allowed_origin = config.app.cors_allowed_origin.clone();

    let bind_address = format!("0.0.0.0:{}", config.app.port);
    log::info!("Starting mail relay on {}", bind_address);
    log::info!("Relaying unread mail from {} on {}", config.imap.sender_filter, config.imap.host);

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE]);
        if let Some(origin) = &allowed_origin {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(api_token.clone())
            .app_data(database.clone())
            .app_data(relay.clone())
            .configure(handlers::configure)
    })
    .bind(&bind_address)?
    .run()
    .await
}
