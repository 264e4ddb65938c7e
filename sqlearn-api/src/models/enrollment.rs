use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EnrollInput {
    pub student_id: i32,
    pub course_id: i32,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Enrolled {
    pub success: bool,
    pub enrollment_id: i32,
    pub status: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StudentRef {
    pub student_id: i32,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AnswerInput {
    #[serde(default)]
    pub question_id: Option<i32>,
    pub answer: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AttemptInput {
    pub student_id: i32,
    pub answers: Vec<AnswerInput>,
}
