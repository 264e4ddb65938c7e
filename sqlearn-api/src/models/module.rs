use serde::{Deserialize, Serialize};
use sqlearn_common::utils::{deserialize_some, non_blank};
use sqlearn_common::ApiError;
use sqlearn_db::models::module::{Module as ModuleData, ModuleChanges};

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: i32,
    pub title: String,
    pub content_link: Option<String>,
    pub course_id: i32,
}

impl From<&ModuleData> for Module {
    fn from(module: &ModuleData) -> Self {
        Module {
            id: module.id,
            title: module.title.clone(),
            content_link: module.content_link.clone(),
            course_id: module.course_id,
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ModuleInput {
    pub title: String,
    #[serde(default)]
    pub content_link: Option<String>,
    #[serde(default)]
    pub instructor_id: Option<i32>,
}

#[derive(Serialize, Debug)]
pub struct ModuleCreated {
    pub success: bool,
    pub module: Module,
}

/// Sparse module update. Only `contentLink` may be set to null.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ModulePatch {
    pub instructor_id: i32,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub content_link: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub course_id: Option<Option<i32>>,
}

impl ModulePatch {
    pub fn into_changes(self) -> Result<(i32, ModuleChanges), ApiError> {
        let title = match self.title {
            None => None,
            Some(None) => return Err(ApiError::validation("title cannot be null")),
            Some(Some(t)) => Some(
                non_blank(&t)
                    .ok_or_else(|| ApiError::validation("title cannot be empty"))?
                    .to_string(),
            ),
        };
        let course_id = match self.course_id {
            None => None,
            Some(None) => return Err(ApiError::validation("courseId cannot be null")),
            Some(Some(cid)) => Some(cid),
        };
        let changes = ModuleChanges {
            title,
            content_link: self.content_link,
            course_id,
        };
        if changes.is_empty() {
            return Err(ApiError::validation("no fields to update"));
        }
        Ok((self.instructor_id, changes))
    }
}
