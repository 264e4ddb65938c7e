use crate::schema::{attempts, modules, questions, quizzes, users};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde::Serialize;

/// One graded answer flattened with its student, question and quiz.
#[derive(Queryable, Debug, Serialize, Clone, PartialEq)]
pub struct Progress {
    pub student_id: i32,
    pub student_username: String,
    pub question_id: i32,
    pub question_text: String,
    pub correct_answer: String,
    pub given_answer: String,
    pub correct: bool,
    pub quiz_name: String,
    pub attempted_at: NaiveDateTime,
}

impl Progress {
    pub fn for_course(cid: i32, conn: &mut SqliteConnection) -> QueryResult<Vec<Self>> {
        attempts::table
            .inner_join(users::table)
            .inner_join(questions::table.inner_join(quizzes::table.inner_join(modules::table)))
            .filter(modules::course_id.eq(cid))
            .order(attempts::id.asc())
            .select((
                users::id,
                users::email,
                questions::id,
                questions::text,
                questions::correct_answer,
                attempts::given_answer,
                attempts::correct,
                quizzes::title,
                attempts::attempted_at,
            ))
            .load(conn)
    }
}
