use super::module::Module;
use super::question::Question;
use crate::schema::quizzes;
use crate::schema::quizzes::dsl::*;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde::{Deserialize, Serialize};

pub const MIN_DIFFICULTY: i32 = 1;
pub const MAX_DIFFICULTY: i32 = 5;

#[derive(
    Queryable, Selectable, Identifiable, Associations, Debug, Serialize, Deserialize, Clone,
)]
#[diesel(belongs_to(Module))]
#[diesel(table_name = quizzes)]
pub struct Quiz {
    pub id: i32,
    pub title: String,
    pub difficulty: i32,
    pub module_id: i32,
}

impl Quiz {
    pub fn find(zid: i32, conn: &mut SqliteConnection) -> QueryResult<Option<Self>> {
        quizzes.find(zid).first(conn).optional()
    }

    pub fn list_all(conn: &mut SqliteConnection) -> QueryResult<Vec<Self>> {
        quizzes.order(id.asc()).load(conn)
    }

    pub fn find_by_module(mid: i32, conn: &mut SqliteConnection) -> QueryResult<Vec<Self>> {
        quizzes.filter(module_id.eq(mid)).order(id.asc()).load(conn)
    }

    pub fn questions(&self, conn: &mut SqliteConnection) -> QueryResult<Vec<Question>> {
        Question::belonging_to(self)
            .order(crate::schema::questions::id.asc())
            .load(conn)
    }

    /// Loads the questions of every quiz in one query and pairs them up.
    pub fn with_questions(
        list: Vec<Quiz>,
        conn: &mut SqliteConnection,
    ) -> QueryResult<Vec<(Quiz, Vec<Question>)>> {
        let all = Question::belonging_to(&list)
            .order(crate::schema::questions::id.asc())
            .load::<Question>(conn)?;
        let grouped = all.grouped_by(&list);
        Ok(list.into_iter().zip(grouped).collect())
    }

    pub fn update(
        zid: i32,
        changes: &QuizChanges,
        conn: &mut SqliteConnection,
    ) -> QueryResult<Self> {
        diesel::update(quizzes.find(zid))
            .set(changes)
            .get_result(conn)
    }
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = quizzes)]
pub struct QuizChanges {
    pub title: String,
    pub difficulty: i32,
    pub module_id: i32,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = quizzes)]
pub struct NewQuiz {
    pub title: String,
    pub difficulty: i32,
    pub module_id: i32,
}

impl NewQuiz {
    pub fn create(&self, conn: &mut SqliteConnection) -> QueryResult<Quiz> {
        diesel::insert_into(quizzes::table)
            .values(self)
            .get_result(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::NewQuestion;
    use crate::test_support;
    use sqlearn_common::Role;

    fn questions_for(zid: i32, n: usize) -> Vec<NewQuestion> {
        (0..n)
            .map(|i| NewQuestion {
                text: format!("Q{}", i),
                correct_answer: format!("A{}", i),
                quiz_id: zid,
            })
            .collect()
    }

    #[test]
    fn quizzes_come_back_with_their_questions() {
        let mut conn = test_support::conn();
        let ada = test_support::user(&mut conn, "ada@example.com", Role::Instructor);
        let course = test_support::course(&mut conn, &ada);
        let module = test_support::module(&mut conn, &course);

        let first = NewQuiz {
            title: "Warmup".into(),
            difficulty: 1,
            module_id: module.id,
        }
        .create(&mut conn)
        .unwrap();
        let second = NewQuiz {
            title: "Joins".into(),
            difficulty: 3,
            module_id: module.id,
        }
        .create(&mut conn)
        .unwrap();
        NewQuestion::create_many(&questions_for(first.id, 2), &mut conn).unwrap();
        NewQuestion::create_many(&questions_for(second.id, 1), &mut conn).unwrap();

        let listed = Quiz::find_by_module(module.id, &mut conn).unwrap();
        let nested = Quiz::with_questions(listed, &mut conn).unwrap();
        assert_eq!(nested.len(), 2);
        assert_eq!(nested[0].1.len(), 2);
        assert_eq!(nested[1].1.len(), 1);
        assert_eq!(nested[0].1[1].correct_answer, "A1");
    }

    #[test]
    fn replace_drops_previous_questions() {
        let mut conn = test_support::conn();
        let ada = test_support::user(&mut conn, "ada@example.com", Role::Instructor);
        let course = test_support::course(&mut conn, &ada);
        let module = test_support::module(&mut conn, &course);
        let quiz = NewQuiz {
            title: "Warmup".into(),
            difficulty: 2,
            module_id: module.id,
        }
        .create(&mut conn)
        .unwrap();
        NewQuestion::create_many(&questions_for(quiz.id, 3), &mut conn).unwrap();

        assert_eq!(Question::delete_for_quiz(quiz.id, &mut conn).unwrap(), 3);
        NewQuestion::create_many(&questions_for(quiz.id, 1), &mut conn).unwrap();
        let updated = Quiz::update(
            quiz.id,
            &QuizChanges {
                title: "Warmup v2".into(),
                difficulty: 4,
                module_id: module.id,
            },
            &mut conn,
        )
        .unwrap();
        assert_eq!(updated.title, "Warmup v2");
        assert_eq!(updated.questions(&mut conn).unwrap().len(), 1);
    }

    #[test]
    fn difficulty_outside_range_is_rejected_by_schema() {
        let mut conn = test_support::conn();
        let ada = test_support::user(&mut conn, "ada@example.com", Role::Instructor);
        let course = test_support::course(&mut conn, &ada);
        let module = test_support::module(&mut conn, &course);
        let bad = NewQuiz {
            title: "Too hard".into(),
            difficulty: MAX_DIFFICULTY + 1,
            module_id: module.id,
        }
        .create(&mut conn);
        assert!(bad.is_err());
    }
}
