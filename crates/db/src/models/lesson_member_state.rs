use bson::DateTime;
use serde::{Deserialize, Serialize};

/// Per-user flag inside a lesson, one row per `(lesson_id, user_id, state_type)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LessonMemberState {
    pub lesson_id: String,
    pub user_id: String,
    pub state_type: MemberStateType,
    #[serde(default)]
    pub bool_value: bool,
    #[serde(default)]
    pub string_array_value: Vec<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl LessonMemberState {
    pub const COLLECTION: &'static str = "lesson_member_states";

    pub fn new(
        lesson_id: impl Into<String>,
        user_id: impl Into<String>,
        state_type: MemberStateType,
        value: StateValue,
    ) -> Self {
        let now = DateTime::now();
        Self {
            lesson_id: lesson_id.into(),
            user_id: user_id.into(),
            state_type,
            bool_value: value.bool_value,
            string_array_value: value.string_array_value,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn value(&self) -> StateValue {
        StateValue {
            bool_value: self.bool_value,
            string_array_value: self.string_array_value.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MemberStateType {
    HandsUp,
    Annotation,
    Chat,
    PollingAnswer,
}

impl MemberStateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStateType::HandsUp => "hands_up",
            MemberStateType::Annotation => "annotation",
            MemberStateType::Chat => "chat",
            MemberStateType::PollingAnswer => "polling_answer",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StateValue {
    pub bool_value: bool,
    pub string_array_value: Vec<String>,
}

impl StateValue {
    pub fn flag(value: bool) -> Self {
        Self {
            bool_value: value,
            string_array_value: Vec::new(),
        }
    }

    pub fn answers(answers: Vec<String>) -> Self {
        Self {
            bool_value: false,
            string_array_value: answers,
        }
    }
}

/// Narrows a member-state read; `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct MemberStatesFilter {
    pub lesson_id: Option<String>,
    pub user_id: Option<String>,
    pub state_type: Option<MemberStateType>,
}

impl MemberStatesFilter {
    pub fn matches(&self, state: &LessonMemberState) -> bool {
        self.lesson_id.as_deref().is_none_or(|id| id == state.lesson_id)
            && self.user_id.as_deref().is_none_or(|id| id == state.user_id)
            && self.state_type.is_none_or(|t| t == state.state_type)
    }
}
