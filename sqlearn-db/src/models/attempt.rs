use super::question::Question;
use super::user::User;
use crate::schema::attempts;
use crate::schema::attempts::dsl::*;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde::{Deserialize, Serialize};

#[derive(
    Queryable, Selectable, Identifiable, Associations, Debug, Serialize, Deserialize, Clone,
)]
#[diesel(belongs_to(User))]
#[diesel(belongs_to(Question))]
#[diesel(table_name = attempts)]
pub struct Attempt {
    pub id: i32,
    pub user_id: i32,
    pub question_id: i32,
    pub given_answer: String,
    pub correct: bool,
    pub attempted_at: NaiveDateTime,
}

impl Attempt {
    pub fn count_for_quiz(zid: i32, conn: &mut SqliteConnection) -> QueryResult<i64> {
        use crate::schema::questions;

        attempts
            .inner_join(questions::table)
            .filter(questions::quiz_id.eq(zid))
            .count()
            .get_result(conn)
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = attempts)]
pub struct NewAttempt {
    pub user_id: i32,
    pub question_id: i32,
    pub given_answer: String,
    pub correct: bool,
    pub attempted_at: NaiveDateTime,
}

impl NewAttempt {
    /// Grades `answer` against the stored question at write time.
    pub fn graded(
        uid: i32,
        question: &Question,
        answer: String,
        time: NaiveDateTime,
    ) -> Self {
        NewAttempt {
            user_id: uid,
            question_id: question.id,
            correct: question.is_correct(&answer),
            given_answer: answer,
            attempted_at: time,
        }
    }

    pub fn create(&self, conn: &mut SqliteConnection) -> QueryResult<Attempt> {
        diesel::insert_into(attempts::table)
            .values(self)
            .get_result(conn)
    }
}
