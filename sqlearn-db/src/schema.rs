table! {
    attempts (id) {
        id -> Integer,
        user_id -> Integer,
        question_id -> Integer,
        given_answer -> Text,
        correct -> Bool,
        attempted_at -> Timestamp,
    }
}

table! {
    courses (id) {
        id -> Integer,
        name -> Text,
        description -> Nullable<Text>,
        instructor_id -> Integer,
        created_at -> Timestamp,
    }
}

table! {
    enrollments (id) {
        id -> Integer,
        student_id -> Integer,
        course_id -> Integer,
        enrolled_at -> Timestamp,
        status -> Text,
    }
}

table! {
    modules (id) {
        id -> Integer,
        title -> Text,
        content_link -> Nullable<Text>,
        course_id -> Integer,
    }
}

table! {
    questions (id) {
        id -> Integer,
        text -> Text,
        correct_answer -> Text,
        quiz_id -> Integer,
    }
}

table! {
    quizzes (id) {
        id -> Integer,
        title -> Text,
        difficulty -> Integer,
        module_id -> Integer,
    }
}

table! {
    users (id) {
        id -> Integer,
        name -> Text,
        email -> Text,
        hash_pwd -> Text,
        user_role -> Text,
        institution -> Nullable<Text>,
        certification -> Nullable<Text>,
        yoe -> Nullable<Integer>,
        joined_at -> Timestamp,
        last_login_at -> Nullable<Timestamp>,
    }
}

joinable!(attempts -> questions (question_id));
joinable!(attempts -> users (user_id));
joinable!(courses -> users (instructor_id));
joinable!(enrollments -> courses (course_id));
joinable!(enrollments -> users (student_id));
joinable!(modules -> courses (course_id));
joinable!(questions -> quizzes (quiz_id));
joinable!(quizzes -> modules (module_id));

allow_tables_to_appear_in_same_query!(
    attempts,
    courses,
    enrollments,
    modules,
    questions,
    quizzes,
    users,
);
