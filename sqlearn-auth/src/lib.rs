use actix_web::web;

pub mod handlers;
pub mod models;

pub use models::HashingConfig;

pub fn configure_service(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::login).service(handlers::signup);
}
