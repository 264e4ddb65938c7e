use super::user::User;
use crate::schema::courses;
use crate::schema::courses::dsl::*;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde::{Deserialize, Serialize};

#[derive(
    Queryable, Selectable, Identifiable, Associations, Debug, Serialize, Deserialize, Clone,
)]
#[diesel(belongs_to(User, foreign_key = instructor_id))]
#[diesel(table_name = courses)]
pub struct Course {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub instructor_id: i32,
    pub created_at: NaiveDateTime,
}

impl Course {
    pub fn find(cid: i32, conn: &mut SqliteConnection) -> QueryResult<Option<Self>> {
        courses.find(cid).first(conn).optional()
    }

    pub fn list_all(conn: &mut SqliteConnection) -> QueryResult<Vec<Self>> {
        courses.order(id.asc()).load(conn)
    }

    pub fn find_by_instructor(iid: i32, conn: &mut SqliteConnection) -> QueryResult<Vec<Self>> {
        courses
            .filter(instructor_id.eq(iid))
            .order(id.asc())
            .load(conn)
    }

    pub fn is_owned_by(&self, iid: i32) -> bool {
        self.instructor_id == iid
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = courses)]
pub struct NewCourse {
    pub name: String,
    pub description: Option<String>,
    pub instructor_id: i32,
    pub created_at: NaiveDateTime,
}

impl NewCourse {
    pub fn create(&self, conn: &mut SqliteConnection) -> QueryResult<Course> {
        diesel::insert_into(courses::table)
            .values(self)
            .get_result(conn)
    }
}
