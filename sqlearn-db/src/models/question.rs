use super::quiz::Quiz;
use crate::schema::questions;
use crate::schema::questions::dsl::*;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde::{Deserialize, Serialize};

#[derive(
    Queryable, Selectable, Identifiable, Associations, Debug, Serialize, Deserialize, Clone,
)]
#[diesel(belongs_to(Quiz))]
#[diesel(table_name = questions)]
pub struct Question {
    pub id: i32,
    pub text: String,
    pub correct_answer: String,
    pub quiz_id: i32,
}

impl Question {
    pub fn find(qid: i32, conn: &mut SqliteConnection) -> QueryResult<Option<Self>> {
        questions.find(qid).first(conn).optional()
    }

    /// Exact string equality; no trimming or case folding.
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }

    pub fn delete_for_quiz(zid: i32, conn: &mut SqliteConnection) -> QueryResult<usize> {
        diesel::delete(questions.filter(quiz_id.eq(zid))).execute(conn)
    }
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = questions)]
pub struct NewQuestion {
    pub text: String,
    pub correct_answer: String,
    pub quiz_id: i32,
}

impl NewQuestion {
    pub fn create_many(items: &[NewQuestion], conn: &mut SqliteConnection) -> QueryResult<usize> {
        if items.is_empty() {
            return Ok(0);
        }
        diesel::insert_into(questions::table)
            .values(items)
            .execute(conn)
    }
}
