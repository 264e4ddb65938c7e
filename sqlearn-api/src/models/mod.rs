use serde::Serialize;

pub mod chat;
pub mod course;
pub mod enrollment;
pub mod module;
pub mod quiz;
pub mod user;

#[derive(Serialize, Debug)]
pub struct Success {
    pub success: bool,
}

impl Success {
    pub fn ok() -> Self {
        Success { success: true }
    }
}
