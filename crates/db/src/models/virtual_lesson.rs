use serde::{Deserialize, Serialize};

/// A lesson as seen by the live room: who teaches it, who attends it and
/// which media group its shareable material comes from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VirtualLesson {
    #[serde(rename = "_id")]
    pub lesson_id: String,
    #[serde(default)]
    pub teacher_ids: Vec<String>,
    #[serde(default)]
    pub learner_ids: Vec<String>,
    pub lesson_group_id: Option<String>,
}

impl VirtualLesson {
    pub const COLLECTION: &'static str = "lessons";

    pub fn new(lesson_id: impl Into<String>) -> Self {
        Self {
            lesson_id: lesson_id.into(),
            teacher_ids: Vec::new(),
            learner_ids: Vec::new(),
            lesson_group_id: None,
        }
    }

    pub fn is_teacher(&self, user_id: &str) -> bool {
        self.teacher_ids.iter().any(|id| id == user_id)
    }

    pub fn is_learner(&self, user_id: &str) -> bool {
        self.learner_ids.iter().any(|id| id == user_id)
    }
}

/// The media group a lesson's material is uploaded into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonGroup {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub media_ids: Vec<String>,
}

impl LessonGroup {
    pub const COLLECTION: &'static str = "lesson_groups";
}
