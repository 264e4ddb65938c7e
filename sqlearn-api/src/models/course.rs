use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlearn_common::utils::non_blank;
use sqlearn_common::ApiError;
use sqlearn_db::models::course::Course as CourseData;

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub instructor_id: i32,
}

impl From<&CourseData> for Course {
    fn from(course: &CourseData) -> Self {
        Course {
            id: course.id,
            name: course.name.clone(),
            description: course.description.clone(),
            instructor_id: course.instructor_id,
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledCourse {
    #[serde(flatten)]
    pub course: Course,
    pub enrollment_date: NaiveDateTime,
    pub status: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CourseInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub instructor_id: i32,
}

impl CourseInput {
    /// Returns the trimmed name and the description, dropping a blank one.
    pub fn validate(self) -> Result<(String, Option<String>, i32), ApiError> {
        let name = non_blank(&self.name)
            .ok_or_else(|| ApiError::validation("course name is required"))?
            .to_string();
        let description = self
            .description
            .as_deref()
            .and_then(non_blank)
            .map(String::from);
        Ok((name, description, self.instructor_id))
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CourseCreated {
    pub success: bool,
    pub course_id: i32,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct InstructorQuery {
    pub instructor_id: i32,
}

/// Body of the endpoints that only name a course.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CourseRef {
    pub course_id: i32,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RosterQuery {
    #[serde(default)]
    pub course_id: Option<i32>,
}
