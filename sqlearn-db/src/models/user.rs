use crate::schema::users;
use crate::schema::users::dsl::*;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use sqlearn_common::Role;

/// Not serializable; `hash_pwd` stays in the access layer.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = users)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub hash_pwd: String,
    pub user_role: String,
    pub institution: Option<String>,
    pub certification: Option<String>,
    pub yoe: Option<i32>,
    pub joined_at: NaiveDateTime,
    pub last_login_at: Option<NaiveDateTime>,
}

impl User {
    pub fn find(uid: i32, conn: &mut SqliteConnection) -> QueryResult<Option<Self>> {
        users.find(uid).first(conn).optional()
    }

    pub fn find_by_email(mail: &str, conn: &mut SqliteConnection) -> QueryResult<Option<Self>> {
        users.filter(email.eq(mail)).first(conn).optional()
    }

    pub fn list_by_role(role: Role, conn: &mut SqliteConnection) -> QueryResult<Vec<Self>> {
        users
            .filter(user_role.eq(role.to_string()))
            .order(id.asc())
            .load(conn)
    }

    /// Students holding an enrollment in the given course.
    pub fn list_enrolled_in(cid: i32, conn: &mut SqliteConnection) -> QueryResult<Vec<Self>> {
        use crate::schema::enrollments;

        enrollments::table
            .inner_join(users::table)
            .filter(enrollments::course_id.eq(cid))
            .filter(user_role.eq(Role::Student.to_string()))
            .order(id.asc())
            .select(User::as_select())
            .load(conn)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.user_role == role.to_string()
    }

    pub fn touch_last_login(&self, time: NaiveDateTime, conn: &mut SqliteConnection) -> QueryResult<()> {
        diesel::update(self).set(last_login_at.eq(time)).execute(conn)?;
        Ok(())
    }

    /// Applies only the fields present in `changes`; returns `None` if the user is gone.
    pub fn update_profile(
        uid: i32,
        changes: &ProfileChanges,
        conn: &mut SqliteConnection,
    ) -> QueryResult<Option<Self>> {
        diesel::update(users.find(uid))
            .set(changes)
            .get_result(conn)
            .optional()
    }
}

/// Sparse profile patch. Outer `None` leaves the column untouched,
/// `Some(None)` clears it.
#[derive(AsChangeset, Debug, Default, Clone)]
#[diesel(table_name = users)]
pub struct ProfileChanges {
    pub institution: Option<Option<String>>,
    pub certification: Option<Option<String>>,
    pub yoe: Option<Option<i32>>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.institution.is_none() && self.certification.is_none() && self.yoe.is_none()
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub hash_pwd: String,
    pub user_role: String,
    pub joined_at: NaiveDateTime,
}

impl NewUser {
    pub fn create(&self, conn: &mut SqliteConnection) -> QueryResult<User> {
        diesel::insert_into(users::table)
            .values(self)
            .get_result(conn)
    }
}
