use actix_web::{put, web, HttpResponse};
use sqlearn_common::{ApiError, Role};
use sqlearn_db::connection::DbPool;
use sqlearn_db::models::user::User;

use super::user_with_role;
use crate::models::user::ProfilePatch;
use crate::models::Success;

#[put("/instructor/profile")]
pub(crate) async fn update_profile(
    pool: web::Data<DbPool>,
    input: web::Json<ProfilePatch>,
) -> Result<HttpResponse, ApiError> {
    let (iid, changes) = input.into_inner().into_changes()?;

    web::block(move || -> Result<User, ApiError> {
        let mut conn = pool.get()?;
        let not_found = || ApiError::NotFound(format!("no instructor with id {}", iid));
        user_with_role(iid, Role::Instructor, &mut conn)?.ok_or_else(not_found)?;
        User::update_profile(iid, &changes, &mut conn)?.ok_or_else(not_found)
    })
    .await??;

    log::info!("instructor {} updated their profile", iid);
    Ok(HttpResponse::Ok().json(Success::ok()))
}
