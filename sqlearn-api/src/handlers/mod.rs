use diesel::sqlite::SqliteConnection;
use sqlearn_common::{ApiError, Role};
use sqlearn_db::models::course::Course;
use sqlearn_db::models::module::Module;
use sqlearn_db::models::user::User;

pub mod chat;
pub mod instructor;
pub mod profile;
pub mod student;

/// The user, if it exists and holds `role`.
fn user_with_role(
    uid: i32,
    role: Role,
    conn: &mut SqliteConnection,
) -> Result<Option<User>, ApiError> {
    Ok(User::find(uid, conn)?.filter(|u| u.has_role(role)))
}

fn student(sid: i32, conn: &mut SqliteConnection) -> Result<User, ApiError> {
    user_with_role(sid, Role::Student, conn)?
        .ok_or_else(|| ApiError::InvalidReference(format!("no student with id {}", sid)))
}

/// Resolves a course named in the request body.
fn course_ref(cid: i32, conn: &mut SqliteConnection) -> Result<Course, ApiError> {
    Course::find(cid, conn)?
        .ok_or_else(|| ApiError::InvalidReference(format!("no course with id {}", cid)))
}

fn module_ref(mid: i32, conn: &mut SqliteConnection) -> Result<Module, ApiError> {
    Module::find(mid, conn)?
        .ok_or_else(|| ApiError::InvalidReference(format!("no module with id {}", mid)))
}

fn ensure_owner(course: &Course, iid: i32) -> Result<(), ApiError> {
    if course.is_owned_by(iid) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!(
            "course {} belongs to another instructor",
            course.id
        )))
    }
}
