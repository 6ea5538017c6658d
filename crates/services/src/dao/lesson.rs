use async_trait::async_trait;
use bson::doc;
use liveroom_db::models::{LessonGroup, User, UserGroup, VirtualLesson};
use mongodb::Database;

use super::base::{BaseDao, DaoError, DaoResult};
use crate::live_room::{LessonReader, MediaLookup, UserRoleLookup};

pub struct LessonDao {
    pub lessons: BaseDao<VirtualLesson>,
    pub groups: BaseDao<LessonGroup>,
}

impl LessonDao {
    pub fn new(db: &Database) -> Self {
        Self {
            lessons: BaseDao::new(db, VirtualLesson::COLLECTION),
            groups: BaseDao::new(db, LessonGroup::COLLECTION),
        }
    }
}

#[async_trait]
impl LessonReader for LessonDao {
    async fn get_virtual_lesson(&self, lesson_id: &str) -> DaoResult<VirtualLesson> {
        self.lessons
            .find_one(doc! { "_id": lesson_id })
            .await?
            .ok_or(DaoError::NotFound)
    }
}

#[async_trait]
impl MediaLookup for LessonDao {
    async fn media_ids(&self, lesson_group_id: &str) -> DaoResult<Vec<String>> {
        Ok(self
            .groups
            .find_one(doc! { "_id": lesson_group_id })
            .await?
            .map(|g| g.media_ids)
            .unwrap_or_default())
    }
}

pub struct UserDao {
    pub base: BaseDao<User>,
}

impl UserDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, User::COLLECTION),
        }
    }
}

#[async_trait]
impl UserRoleLookup for UserDao {
    async fn is_student(&self, user_id: &str) -> DaoResult<bool> {
        let student = bson::to_bson(&UserGroup::Student)?;
        let count = self
            .base
            .count(doc! { "_id": user_id, "user_group": student })
            .await?;
        Ok(count > 0)
    }
}
