/// Tables the model may query, with their columns.
pub const TABLES: &[(&str, &[&str])] = &[
    (
        "users",
        &[
            "id", "name", "email", "user_role", "institution", "certification", "yoe",
            "joined_at", "last_login_at",
        ],
    ),
    ("courses", &["id", "name", "description", "instructor_id", "created_at"]),
    ("modules", &["id", "title", "content_link", "course_id"]),
    ("quizzes", &["id", "title", "difficulty", "module_id"]),
    ("questions", &["id", "text", "correct_answer", "quiz_id"]),
    ("enrollments", &["id", "student_id", "course_id", "enrolled_at", "status"]),
    (
        "attempts",
        &["id", "user_id", "question_id", "given_answer", "correct", "attempted_at"],
    ),
];

pub fn system_prompt() -> String {
    let mut prompt = String::from(
        "You translate questions about a SQL learning platform into a single SQLite statement.\n\
         Reply with the SQL only: no explanation, no Markdown, exactly one statement.\n\
         user_role is 'instructor' or 'student'. quizzes.difficulty ranges from 1 to 5. \
         attempts.correct is 1 for a correct answer and 0 otherwise.\n\
         The database has these tables:\n",
    );
    for (table, columns) in TABLES {
        prompt.push_str(&format!("- {}({})\n", table, columns.join(", ")));
    }
    prompt
}

pub fn user_message(question: &str) -> String {
    format!("Convert the following question to an SQL query:\n\"{}\"", question.trim())
}
