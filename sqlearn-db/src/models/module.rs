use super::course::Course;
use crate::schema::modules;
use crate::schema::modules::dsl::*;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde::{Deserialize, Serialize};

#[derive(
    Queryable, Selectable, Identifiable, Associations, Debug, Serialize, Deserialize, Clone,
)]
#[diesel(belongs_to(Course))]
#[diesel(table_name = modules)]
pub struct Module {
    pub id: i32,
    pub title: String,
    pub content_link: Option<String>,
    pub course_id: i32,
}

impl Module {
    pub fn find(mid: i32, conn: &mut SqliteConnection) -> QueryResult<Option<Self>> {
        modules.find(mid).first(conn).optional()
    }

    pub fn find_by_course(cid: i32, conn: &mut SqliteConnection) -> QueryResult<Vec<Self>> {
        modules.filter(course_id.eq(cid)).order(id.asc()).load(conn)
    }

    pub fn course(&self, conn: &mut SqliteConnection) -> QueryResult<Course> {
        use crate::schema::courses;
        courses::table.find(self.course_id).first(conn)
    }

    pub fn update(
        mid: i32,
        changes: &ModuleChanges,
        conn: &mut SqliteConnection,
    ) -> QueryResult<Option<Self>> {
        diesel::update(modules.find(mid))
            .set(changes)
            .get_result(conn)
            .optional()
    }
}

/// Sparse module patch; `content_link: Some(None)` clears the link.
#[derive(AsChangeset, Debug, Default, Clone)]
#[diesel(table_name = modules)]
pub struct ModuleChanges {
    pub title: Option<String>,
    pub content_link: Option<Option<String>>,
    pub course_id: Option<i32>,
}

impl ModuleChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content_link.is_none() && self.course_id.is_none()
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = modules)]
pub struct NewModule {
    pub title: String,
    pub content_link: Option<String>,
    pub course_id: i32,
}

impl NewModule {
    pub fn create(&self, conn: &mut SqliteConnection) -> QueryResult<Module> {
        diesel::insert_into(modules::table)
            .values(self)
            .get_result(conn)
    }
}
