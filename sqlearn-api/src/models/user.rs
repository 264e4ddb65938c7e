use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlearn_common::utils::deserialize_some;
use sqlearn_common::ApiError;
use sqlearn_db::models::progress::Progress as ProgressData;
use sqlearn_db::models::user::{ProfileChanges, User as UserData};

/// Roster entry. The password hash never leaves the access layer.
#[derive(Serialize, Debug)]
pub struct Student {
    pub uid: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub institution: Option<String>,
    pub certification: Option<String>,
    pub yoe: Option<i32>,
}

impl From<&UserData> for Student {
    fn from(user: &UserData) -> Self {
        Student {
            uid: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.user_role.clone(),
            institution: user.institution.clone(),
            certification: user.certification.clone(),
            yoe: user.yoe,
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    pub instructor_id: i32,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub institution: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub certification: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub yoe: Option<Option<i32>>,
}

impl ProfilePatch {
    pub fn into_changes(self) -> Result<(i32, ProfileChanges), ApiError> {
        if let Some(Some(years)) = self.yoe {
            if years < 0 {
                return Err(ApiError::validation("yoe cannot be negative"));
            }
        }
        let changes = ProfileChanges {
            institution: self.institution,
            certification: self.certification,
            yoe: self.yoe,
        };
        if changes.is_empty() {
            return Err(ApiError::validation("no fields to update"));
        }
        Ok((self.instructor_id, changes))
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRow {
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

impl From<ProgressData> for ProgressRow {
    fn from(p: ProgressData) -> Self {
        ProgressRow {
            student_id: p.student_id,
            student_username: p.student_username,
            question_id: p.question_id,
            question_text: p.question_text,
            correct_answer: p.correct_answer,
            given_answer: p.given_answer,
            correct: p.correct,
            quiz_name: p.quiz_name,
            attempted_at: p.attempted_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch(json: &str) -> Result<(i32, ProfileChanges), ApiError> {
        serde_json::from_str::<ProfilePatch>(json).unwrap().into_changes()
    }

    #[test]
    fn only_present_fields_are_changed() {
        let (iid, changes) = patch(r#"{"instructorId": 5, "institution": "MIT"}"#).unwrap();
        assert_eq!(iid, 5);
        assert_eq!(changes.institution, Some(Some("MIT".to_string())));
        assert_eq!(changes.certification, None);
        assert_eq!(changes.yoe, None);

        let (_, cleared) = patch(r#"{"instructorId": 5, "yoe": null}"#).unwrap();
        assert_eq!(cleared.yoe, Some(None));
    }

    #[test]
    fn empty_or_negative_patches_fail() {
        assert!(patch(r#"{"instructorId": 5}"#).is_err());
        assert!(patch(r#"{"instructorId": 5, "unknown": 1}"#).is_err());
        assert!(patch(r#"{"instructorId": 5, "yoe": -2}"#).is_err());
    }
}
