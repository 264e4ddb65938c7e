use actix_web::{post, route, web, HttpResponse};
use chrono::Utc;
use diesel::Connection;
use sqlearn_common::ApiError;
use sqlearn_db::connection::DbPool;
use sqlearn_db::models::attempt::NewAttempt;
use sqlearn_db::models::course::Course as CourseData;
use sqlearn_db::models::enrollment::{Enrollment, NewEnrollment, STATUS_ACTIVE};
use sqlearn_db::models::module::Module as ModuleData;
use sqlearn_db::models::question::Question;
use sqlearn_db::models::quiz::Quiz as QuizData;

use super::{course_ref, module_ref, student};
use crate::models::course::{Course, CourseRef, EnrolledCourse};
use crate::models::enrollment::{AttemptInput, EnrollInput, Enrolled, StudentRef};
use crate::models::module::Module;
use crate::models::quiz::{ModuleSelector, Quiz, StudentQuizQuery};
use crate::models::Success;

#[route("/student/courses", method = "GET", method = "POST")]
pub(crate) async fn all_courses(pool: web::Data<DbPool>) -> Result<HttpResponse, ApiError> {
    let courses = web::block(move || -> Result<Vec<CourseData>, ApiError> {
        let mut conn = pool.get()?;
        Ok(CourseData::list_all(&mut conn)?)
    })
    .await??;

    Ok(HttpResponse::Ok().json(courses.iter().map(Course::from).collect::<Vec<_>>()))
}

#[post("/student/enroll")]
pub(crate) async fn enroll(
    pool: web::Data<DbPool>,
    input: web::Json<EnrollInput>,
) -> Result<HttpResponse, ApiError> {
    let EnrollInput {
        student_id,
        course_id,
    } = input.into_inner();

    let enrollment = web::block(move || -> Result<Enrollment, ApiError> {
        let mut conn = pool.get()?;
        student(student_id, &mut conn)?;
        if Enrollment::find_pair(student_id, course_id, &mut conn)?.is_some() {
            return Err(ApiError::Conflict("already enrolled".into()));
        }
        course_ref(course_id, &mut conn)?;
        let new_enrollment = NewEnrollment {
            student_id,
            course_id,
            enrolled_at: Utc::now().naive_utc(),
            status: STATUS_ACTIVE.to_string(),
        };
        new_enrollment.create(&mut conn).map_err(|e| match ApiError::from(e) {
            ApiError::Conflict(_) => ApiError::Conflict("already enrolled".into()),
            other => other,
        })
    })
    .await??;

    log::info!("student {} enrolled in course {}", student_id, course_id);
    Ok(HttpResponse::Ok().json(Enrolled {
        success: true,
        enrollment_id: enrollment.id,
        status: enrollment.status,
    }))
}

#[post("/student/enrolled")]
pub(crate) async fn enrolled_courses(
    pool: web::Data<DbPool>,
    input: web::Json<StudentRef>,
) -> Result<HttpResponse, ApiError> {
    let sid = input.student_id;
    let rows = web::block(move || -> Result<_, ApiError> {
        let mut conn = pool.get()?;
        student(sid, &mut conn)?;
        Ok(Enrollment::courses_for_student(sid, &mut conn)?)
    })
    .await??;

    let courses: Vec<EnrolledCourse> = rows
        .into_iter()
        .map(|(course, enrolled_at, status)| EnrolledCourse {
            course: Course::from(&course),
            enrollment_date: enrolled_at,
            status,
        })
        .collect();
    Ok(HttpResponse::Ok().json(courses))
}

#[post("/student/modules")]
pub(crate) async fn course_modules(
    pool: web::Data<DbPool>,
    input: web::Json<CourseRef>,
) -> Result<HttpResponse, ApiError> {
    let cid = input.course_id;
    let modules = web::block(move || -> Result<Vec<ModuleData>, ApiError> {
        let mut conn = pool.get()?;
        course_ref(cid, &mut conn)?;
        Ok(ModuleData::find_by_course(cid, &mut conn)?)
    })
    .await??;

    Ok(HttpResponse::Ok().json(modules.iter().map(Module::from).collect::<Vec<_>>()))
}

#[post("/student/quizzes")]
pub(crate) async fn module_quizzes(
    pool: web::Data<DbPool>,
    input: web::Json<StudentQuizQuery>,
) -> Result<HttpResponse, ApiError> {
    let selector = input.module_id;
    let quizzes = web::block(move || -> Result<_, ApiError> {
        let mut conn = pool.get()?;
        let list = match selector {
            ModuleSelector::All => QuizData::list_all(&mut conn)?,
            ModuleSelector::One(mid) => {
                module_ref(mid, &mut conn)?;
                QuizData::find_by_module(mid, &mut conn)?
            }
        };
        Ok(QuizData::with_questions(list, &mut conn)?)
    })
    .await??;

    Ok(HttpResponse::Ok().json(
        quizzes
            .iter()
            .map(|(quiz, questions)| Quiz::new(quiz, questions, false))
            .collect::<Vec<_>>(),
    ))
}

/// Grades and records every answer; missing or unknown questions are skipped.
#[post("/student/attempt")]
pub(crate) async fn submit_attempt(
    pool: web::Data<DbPool>,
    input: web::Json<AttemptInput>,
) -> Result<HttpResponse, ApiError> {
    let AttemptInput {
        student_id,
        answers,
    } = input.into_inner();
    if answers.is_empty() {
        return Err(ApiError::validation("answers are required"));
    }

    let (recorded, correct) = web::block(move || -> Result<(usize, usize), ApiError> {
        let mut conn = pool.get()?;
        student(student_id, &mut conn)?;
        let now = Utc::now().naive_utc();
        conn.transaction::<_, ApiError, _>(|conn| {
            let mut recorded = 0;
            let mut correct = 0;
            for answer in answers {
                let qid = match answer.question_id {
                    Some(qid) => qid,
                    None => {
                        log::warn!("student {} sent an answer without a question id", student_id);
                        continue;
                    }
                };
                let question = match Question::find(qid, conn)? {
                    Some(q) => q,
                    None => {
                        log::warn!("student {} answered unknown question {}", student_id, qid);
                        continue;
                    }
                };
                let attempt = NewAttempt::graded(student_id, &question, answer.answer, now)
                    .create(conn)?;
                recorded += 1;
                if attempt.correct {
                    correct += 1;
                }
            }
            Ok((recorded, correct))
        })
    })
    .await??;

    log::info!(
        "student {} submitted {} answers, {} correct",
        student_id,
        recorded,
        correct
    );
    Ok(HttpResponse::Ok().json(Success::ok()))
}
