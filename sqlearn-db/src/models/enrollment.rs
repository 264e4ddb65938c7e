use super::course::Course;
use super::user::User;
use crate::schema::enrollments;
use crate::schema::enrollments::dsl::*;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde::{Deserialize, Serialize};

pub const STATUS_ACTIVE: &str = "Active";

#[derive(
    Queryable, Selectable, Identifiable, Associations, Debug, Serialize, Deserialize, Clone,
)]
#[diesel(belongs_to(User, foreign_key = student_id))]
#[diesel(belongs_to(Course))]
#[diesel(table_name = enrollments)]
pub struct Enrollment {
    pub id: i32,
    pub student_id: i32,
    pub course_id: i32,
    pub enrolled_at: NaiveDateTime,
    pub status: String,
}

impl Enrollment {
    pub fn find_pair(
        sid: i32,
        cid: i32,
        conn: &mut SqliteConnection,
    ) -> QueryResult<Option<Self>> {
        enrollments
            .filter(student_id.eq(sid))
            .filter(course_id.eq(cid))
            .first(conn)
            .optional()
    }

    /// Courses a student is enrolled in, with the enrollment date and status.
    pub fn courses_for_student(
        sid: i32,
        conn: &mut SqliteConnection,
    ) -> QueryResult<Vec<(Course, NaiveDateTime, String)>> {
        use crate::schema::courses;

        enrollments
            .inner_join(courses::table)
            .filter(student_id.eq(sid))
            .order(enrolled_at.asc())
            .select((Course::as_select(), enrolled_at, status))
            .load(conn)
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = enrollments)]
pub struct NewEnrollment {
    pub student_id: i32,
    pub course_id: i32,
    pub enrolled_at: NaiveDateTime,
    pub status: String,
}

impl NewEnrollment {
    pub fn create(&self, conn: &mut SqliteConnection) -> QueryResult<Enrollment> {
        diesel::insert_into(enrollments::table)
            .values(self)
            .get_result(conn)
    }
}
