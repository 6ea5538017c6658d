use bson::DateTime;
use serde::{Deserialize, Serialize};

use super::PollingOption;

/// Archived poll, written once when a poll is ended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LessonPolling {
    #[serde(rename = "_id")]
    pub poll_id: String,
    pub lesson_id: String,
    pub question: String,
    pub options: Vec<PollingOption>,
    pub students_answers: Vec<StudentAnswer>,
    pub created_at: DateTime,
    pub stopped_at: Option<DateTime>,
    pub ended_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudentAnswer {
    pub user_id: String,
    pub answers: Vec<String>,
    pub submitted_at: DateTime,
}

impl LessonPolling {
    pub const COLLECTION: &'static str = "lesson_pollings";

    pub fn new_id() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}
