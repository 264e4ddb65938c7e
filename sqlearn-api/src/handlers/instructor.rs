use actix_web::{get, post, put, web, HttpResponse};
use chrono::Utc;
use diesel::Connection;
use sqlearn_common::{ApiError, Role};
use sqlearn_db::connection::DbPool;
use sqlearn_db::models::attempt::Attempt;
use sqlearn_db::models::course::{Course as CourseData, NewCourse};
use sqlearn_db::models::module::{Module as ModuleData, NewModule};
use sqlearn_db::models::progress::Progress;
use sqlearn_db::models::question::{NewQuestion, Question};
use sqlearn_db::models::quiz::{NewQuiz, Quiz as QuizData, QuizChanges};
use sqlearn_db::models::user::User;

use super::{course_ref, ensure_owner, module_ref, user_with_role};
use crate::models::course::{Course, CourseCreated, CourseInput, CourseRef, InstructorQuery, RosterQuery};
use crate::models::module::{Module, ModuleCreated, ModuleInput, ModulePatch};
use crate::models::quiz::{ModuleQuery, Quiz, QuizInput, QuizSaved};
use crate::models::user::{ProgressRow, Student};
use crate::models::Success;

#[get("/instructor/courses")]
pub(crate) async fn list_courses(
    pool: web::Data<DbPool>,
    query: web::Query<InstructorQuery>,
) -> Result<HttpResponse, ApiError> {
    let iid = query.instructor_id;
    let courses = web::block(move || -> Result<Vec<CourseData>, ApiError> {
        let mut conn = pool.get()?;
        Ok(CourseData::find_by_instructor(iid, &mut conn)?)
    })
    .await??;

    Ok(HttpResponse::Ok().json(courses.iter().map(Course::from).collect::<Vec<_>>()))
}

#[post("/instructor/courses")]
pub(crate) async fn create_course(
    pool: web::Data<DbPool>,
    input: web::Json<CourseInput>,
) -> Result<HttpResponse, ApiError> {
    let (name, description, iid) = input.into_inner().validate()?;

    let course = web::block(move || -> Result<CourseData, ApiError> {
        let mut conn = pool.get()?;
        if user_with_role(iid, Role::Instructor, &mut conn)?.is_none() {
            return Err(ApiError::InvalidReference(format!(
                "no instructor with id {}",
                iid
            )));
        }
        let new_course = NewCourse {
            name,
            description,
            instructor_id: iid,
            created_at: Utc::now().naive_utc(),
        };
        Ok(new_course.create(&mut conn)?)
    })
    .await??;

    log::info!("instructor {} created course {}", iid, course.id);
    Ok(HttpResponse::Ok().json(CourseCreated {
        success: true,
        course_id: course.id,
    }))
}

#[post("/instructor/modules")]
pub(crate) async fn list_modules(
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

#[post("/instructor/courses/{course_id}/modules")]
pub(crate) async fn create_module(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    input: web::Json<ModuleInput>,
) -> Result<HttpResponse, ApiError> {
    let cid = path.into_inner();
    let ModuleInput {
        title,
        content_link,
        instructor_id,
    } = input.into_inner();
    let title = sqlearn_common::utils::non_blank(&title)
        .ok_or_else(|| ApiError::validation("module title is required"))?
        .to_string();

    let module = web::block(move || -> Result<ModuleData, ApiError> {
        let mut conn = pool.get()?;
        let course = CourseData::find(cid, &mut conn)?
            .ok_or_else(|| ApiError::NotFound(format!("no course with id {}", cid)))?;
        if let Some(iid) = instructor_id {
            ensure_owner(&course, iid)?;
        }
        let new_module = NewModule {
            title,
            content_link,
            course_id: course.id,
        };
        Ok(new_module.create(&mut conn)?)
    })
    .await??;

    log::info!("created module {} in course {}", module.id, module.course_id);
    Ok(HttpResponse::Ok().json(ModuleCreated {
        success: true,
        module: Module::from(&module),
    }))
}

#[put("/instructor/modules/{module_id}")]
pub(crate) async fn update_module(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    input: web::Json<ModulePatch>,
) -> Result<HttpResponse, ApiError> {
    let mid = path.into_inner();
    let (iid, changes) = input.into_inner().into_changes()?;

    web::block(move || -> Result<(), ApiError> {
        let mut conn = pool.get()?;
        let module = ModuleData::find(mid, &mut conn)?
            .ok_or_else(|| ApiError::NotFound(format!("no module with id {}", mid)))?;
        ensure_owner(&module.course(&mut conn)?, iid)?;
        if let Some(target) = changes.course_id {
            ensure_owner(&course_ref(target, &mut conn)?, iid)?;
        }
        ModuleData::update(mid, &changes, &mut conn)?
            .ok_or_else(|| ApiError::NotFound(format!("no module with id {}", mid)))?;
        Ok(())
    })
    .await??;

    log::info!("instructor {} updated module {}", iid, mid);
    Ok(HttpResponse::Ok().json(Success::ok()))
}

#[get("/instructor/quizzes")]
pub(crate) async fn list_quizzes(
    pool: web::Data<DbPool>,
    query: web::Query<ModuleQuery>,
) -> Result<HttpResponse, ApiError> {
    let mid = query.module_id;
    let quizzes = web::block(move || -> Result<_, ApiError> {
        let mut conn = pool.get()?;
        module_ref(mid, &mut conn)?;
        let list = QuizData::find_by_module(mid, &mut conn)?;
        Ok(QuizData::with_questions(list, &mut conn)?)
    })
    .await??;

    Ok(HttpResponse::Ok().json(
        quizzes
            .iter()
            .map(|(quiz, questions)| Quiz::new(quiz, questions, true))
            .collect::<Vec<_>>(),
    ))
}

/// Creates a quiz, or replaces one when `quizId` is given.
#[post("/instructor/quizzes")]
pub(crate) async fn save_quiz(
    pool: web::Data<DbPool>,
    input: web::Json<QuizInput>,
) -> Result<HttpResponse, ApiError> {
    let quiz = input.into_inner().validate()?;
    let iid = quiz.instructor_id;

    let (zid, replaced) = web::block(move || -> Result<(i32, bool), ApiError> {
        let mut conn = pool.get()?;
        let module = module_ref(quiz.module_id, &mut conn)?;
        ensure_owner(&module.course(&mut conn)?, iid)?;

        if let Some(zid) = quiz.quiz_id {
            let existing = QuizData::find(zid, &mut conn)?
                .ok_or_else(|| ApiError::NotFound(format!("no quiz with id {}", zid)))?;
            let current = ModuleData::find(existing.module_id, &mut conn)?
                .ok_or_else(|| ApiError::internal(format!("quiz {} lost its module", zid)))?;
            ensure_owner(&current.course(&mut conn)?, iid)?;
        }

        conn.transaction::<_, ApiError, _>(|conn| {
            let zid = match quiz.quiz_id {
                Some(zid) => {
                    if Attempt::count_for_quiz(zid, conn)? > 0 {
                        return Err(ApiError::Conflict(format!(
                            "quiz {} already has attempts and cannot be replaced",
                            zid
                        )));
                    }
                    let changes = QuizChanges {
                        title: quiz.title.clone(),
                        difficulty: quiz.difficulty,
                        module_id: module.id,
                    };
                    QuizData::update(zid, &changes, conn)?;
                    Question::delete_for_quiz(zid, conn)?;
                    zid
                }
                None => {
                    let new_quiz = NewQuiz {
                        title: quiz.title.clone(),
                        difficulty: quiz.difficulty,
                        module_id: module.id,
                    };
                    new_quiz.create(conn)?.id
                }
            };
            let questions: Vec<NewQuestion> = quiz
                .questions
                .iter()
                .map(|(text, answer)| NewQuestion {
                    text: text.clone(),
                    correct_answer: answer.clone(),
                    quiz_id: zid,
                })
                .collect();
            NewQuestion::create_many(&questions, conn)?;
            Ok((zid, quiz.quiz_id.is_some()))
        })
    })
    .await??;

    if replaced {
        log::info!("instructor {} replaced quiz {}", iid, zid);
    } else {
        log::info!("instructor {} created quiz {}", iid, zid);
    }
    Ok(HttpResponse::Ok().json(QuizSaved {
        success: true,
        quiz_id: zid,
    }))
}

#[get("/instructor/students")]
pub(crate) async fn list_students(
    pool: web::Data<DbPool>,
    query: web::Query<RosterQuery>,
) -> Result<HttpResponse, ApiError> {
    let course_id = query.course_id;
    let students = web::block(move || -> Result<Vec<User>, ApiError> {
        let mut conn = pool.get()?;
        match course_id {
            Some(cid) => {
                course_ref(cid, &mut conn)?;
                Ok(User::list_enrolled_in(cid, &mut conn)?)
            }
            None => Ok(User::list_by_role(Role::Student, &mut conn)?),
        }
    })
    .await??;

    Ok(HttpResponse::Ok().json(students.iter().map(Student::from).collect::<Vec<_>>()))
}

#[post("/instructor/progress")]
pub(crate) async fn course_progress(
    pool: web::Data<DbPool>,
    input: web::Json<CourseRef>,
) -> Result<HttpResponse, ApiError> {
    let cid = input.course_id;
    let rows = web::block(move || -> Result<Vec<Progress>, ApiError> {
        let mut conn = pool.get()?;
        course_ref(cid, &mut conn)?;
        Ok(Progress::for_course(cid, &mut conn)?)
    })
    .await??;

    Ok(HttpResponse::Ok().json(rows.into_iter().map(ProgressRow::from).collect::<Vec<_>>()))
}
