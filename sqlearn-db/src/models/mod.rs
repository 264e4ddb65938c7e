pub mod attempt;
pub mod course;
pub mod enrollment;
pub mod module;
pub mod progress;
pub mod question;
pub mod quiz;
pub mod user;
