use actix_web::{web, HttpRequest};
use sqlearn_common::ApiError;

mod handlers;
pub mod models;

pub fn configure_service(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        ApiError::validation(format!("invalid request body: {}", err)).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req: &HttpRequest| {
        ApiError::validation(format!("invalid query string: {}", err)).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req: &HttpRequest| {
        ApiError::validation(format!("invalid path: {}", err)).into()
    }));
    sqlearn_auth::configure_service(cfg);
    cfg.service(handlers::instructor::list_courses)
        .service(handlers::instructor::create_course)
        .service(handlers::instructor::list_modules)
        .service(handlers::instructor::create_module)
        .service(handlers::instructor::update_module)
        .service(handlers::instructor::list_quizzes)
        .service(handlers::instructor::save_quiz)
        .service(handlers::instructor::list_students)
        .service(handlers::instructor::course_progress)
        .service(handlers::profile::update_profile)
        .service(handlers::student::all_courses)
        .service(handlers::student::enroll)
        .service(handlers::student::enrolled_courses)
        .service(handlers::student::course_modules)
        .service(handlers::student::module_quizzes)
        .service(handlers::student::submit_attempt)
        .service(handlers::chat::ask);
}
