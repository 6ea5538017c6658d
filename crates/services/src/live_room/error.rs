use thiserror::Error;

use crate::dao::base::DaoError;

#[derive(Debug, Error)]
pub enum LiveRoomError {
    /// Commander is not allowed to issue the command.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Room state does not allow the command right now.
    #[error("{0}")]
    StateViolation(String),

    /// Command payload rejected before any write.
    #[error("{0}")]
    Validation(String),

    #[error("lesson {0} not found")]
    LessonNotFound(String),

    #[error("{op} ({}): {source}", scope(.lesson_id, .user_id))]
    Store {
        op: &'static str,
        lesson_id: String,
        /// Member the failed write was about, when it concerned one.
        user_id: Option<String>,
        #[source]
        source: DaoError,
    },

    #[error("{op}: {source}")]
    Provider {
        op: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// Summary of every per-participant failure of a fan-out.
    #[error("{failed} of {total} conversations failed: {details}")]
    Aggregate {
        failed: usize,
        total: usize,
        details: String,
    },
}

pub type LiveRoomResult<T> = Result<T, LiveRoomError>;

fn scope(lesson_id: &str, user_id: &Option<String>) -> String {
    match user_id {
        Some(user_id) => format!("lesson {lesson_id}, user {user_id}"),
        None => format!("lesson {lesson_id}"),
    }
}

impl LiveRoomError {
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    pub fn state(msg: impl Into<String>) -> Self {
        Self::StateViolation(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }

    pub fn is_state_violation(&self) -> bool {
        matches!(self, Self::StateViolation(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Attaches the failing store operation, the lesson and optionally the
/// member to a [`DaoError`].
pub(crate) trait StoreContext<T> {
    fn store_context(self, op: &'static str, lesson_id: &str) -> LiveRoomResult<T>;

    fn store_context_user(self, op: &'static str, lesson_id: &str, user_id: &str) -> LiveRoomResult<T>;
}

impl<T> StoreContext<T> for Result<T, DaoError> {
    fn store_context(self, op: &'static str, lesson_id: &str) -> LiveRoomResult<T> {
        self.map_err(|source| LiveRoomError::Store {
            op,
            lesson_id: lesson_id.to_string(),
            user_id: None,
            source,
        })
    }

    fn store_context_user(self, op: &'static str, lesson_id: &str, user_id: &str) -> LiveRoomResult<T> {
        self.map_err(|source| LiveRoomError::Store {
            op,
            lesson_id: lesson_id.to_string(),
            user_id: Some(user_id.to_string()),
            source,
        })
    }
}
