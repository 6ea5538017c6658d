//! Lookups the live room needs from modules it does not own.

use async_trait::async_trait;
use liveroom_db::models::VirtualLesson;

use crate::dao::base::DaoResult;

#[async_trait]
pub trait LessonReader: Send + Sync {
    /// Returns [`crate::dao::base::DaoError::NotFound`] for an unknown lesson.
    async fn get_virtual_lesson(&self, lesson_id: &str) -> DaoResult<VirtualLesson>;
}

#[async_trait]
pub trait UserRoleLookup: Send + Sync {
    async fn is_student(&self, user_id: &str) -> DaoResult<bool>;
}

#[async_trait]
pub trait MediaLookup: Send + Sync {
    /// Media ids uploaded into a lesson group. Unknown groups have none.
    async fn media_ids(&self, lesson_group_id: &str) -> DaoResult<Vec<String>>;
}
