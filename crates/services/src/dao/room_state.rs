use async_trait::async_trait;
use bson::{Bson, DateTime, Document, doc};
use liveroom_db::models::{
    CompositeRecordingState, CurrentMaterial, CurrentPolling, LessonMemberState, LessonPolling,
    LessonRoomState, MemberStateType, MemberStatesFilter, StateValue, WhiteboardZoomState,
};
use mongodb::{Client, ClientSession, Collection, Database};
use tracing::debug;

use super::base::{DaoError, DaoResult, map_write_error};
use crate::store::{RoomStateStore, StoreTx};

/// Room-state store backed by MongoDB multi-document transactions.
///
/// Requires a replica set or sharded cluster; standalone servers reject
/// `startTransaction`.
#[derive(Clone)]
pub struct MongoRoomStateStore {
    client: Client,
    room_states: Collection<LessonRoomState>,
    member_states: Collection<LessonMemberState>,
    pollings: Collection<LessonPolling>,
}

impl MongoRoomStateStore {
    pub fn new(db: &Database) -> Self {
        Self {
            client: db.client().clone(),
            room_states: db.collection(LessonRoomState::COLLECTION),
            member_states: db.collection(LessonMemberState::COLLECTION),
            pollings: db.collection(LessonPolling::COLLECTION),
        }
    }
}

#[async_trait]
impl RoomStateStore for MongoRoomStateStore {
    async fn begin(&self) -> DaoResult<Box<dyn StoreTx>> {
        let mut session = self.client.start_session().await?;
        session.start_transaction().await?;
        Ok(Box::new(MongoStoreTx {
            session,
            room_states: self.room_states.clone(),
            member_states: self.member_states.clone(),
            pollings: self.pollings.clone(),
        }))
    }
}

pub struct MongoStoreTx {
    session: ClientSession,
    room_states: Collection<LessonRoomState>,
    member_states: Collection<LessonMemberState>,
    pollings: Collection<LessonPolling>,
}

impl MongoStoreTx {
    async fn upsert_room_field(&mut self, lesson_id: &str, field: &str, value: Bson) -> DaoResult<()> {
        let now = DateTime::now();
        let mut set = doc! { "updated_at": now };
        set.insert(field, value);

        self.room_states
            .update_one(
                doc! { "lesson_id": lesson_id },
                doc! {
                    "$set": set,
                    "$setOnInsert": { "created_at": now },
                },
            )
            .upsert(true)
            .session(&mut self.session)
            .await
            .map_err(map_write_error)?;

        debug!(lesson_id, field, "Upserted room state field");
        Ok(())
    }

    async fn upsert_member(
        &mut self,
        lesson_id: &str,
        user_id: &str,
        state_type: MemberStateType,
        value: &StateValue,
    ) -> DaoResult<()> {
        let now = DateTime::now();
        self.member_states
            .update_one(
                doc! {
                    "lesson_id": lesson_id,
                    "user_id": user_id,
                    "state_type": state_type.as_str(),
                },
                doc! {
                    "$set": member_value_doc(value, now),
                    "$setOnInsert": { "created_at": now },
                },
            )
            .upsert(true)
            .session(&mut self.session)
            .await
            .map_err(map_write_error)?;
        Ok(())
    }
}

fn member_value_doc(value: &StateValue, now: DateTime) -> Document {
    doc! {
        "bool_value": value.bool_value,
        "string_array_value": value.string_array_value.clone(),
        "updated_at": now,
    }
}

fn filter_doc(filter: &MemberStatesFilter) -> Document {
    let mut doc = Document::new();
    if let Some(lesson_id) = &filter.lesson_id {
        doc.insert("lesson_id", lesson_id.as_str());
    }
    if let Some(user_id) = &filter.user_id {
        doc.insert("user_id", user_id.as_str());
    }
    if let Some(state_type) = filter.state_type {
        doc.insert("state_type", state_type.as_str());
    }
    doc
}

#[async_trait]
impl StoreTx for MongoStoreTx {
    async fn get_room_state(&mut self, lesson_id: &str) -> DaoResult<Option<LessonRoomState>> {
        Ok(self
            .room_states
            .find_one(doc! { "lesson_id": lesson_id })
            .session(&mut self.session)
            .await?)
    }

    async fn upsert_current_polling(
        &mut self,
        lesson_id: &str,
        polling: Option<&CurrentPolling>,
    ) -> DaoResult<()> {
        let value = bson::to_bson(&polling)?;
        self.upsert_room_field(lesson_id, "current_polling", value).await
    }

    async fn upsert_current_material(
        &mut self,
        lesson_id: &str,
        material: Option<&CurrentMaterial>,
    ) -> DaoResult<()> {
        let value = bson::to_bson(&material)?;
        self.upsert_room_field(lesson_id, "current_material", value).await
    }

    async fn upsert_whiteboard_zoom_state(
        &mut self,
        lesson_id: &str,
        zoom: &WhiteboardZoomState,
    ) -> DaoResult<()> {
        let value = bson::to_bson(zoom)?;
        self.upsert_room_field(lesson_id, "whiteboard_zoom_state", value).await
    }

    async fn set_spotlight(&mut self, lesson_id: &str, user_id: Option<&str>) -> DaoResult<()> {
        let value = user_id.map_or(Bson::Null, |id| Bson::String(id.to_string()));
        self.upsert_room_field(lesson_id, "spotlighted_user", value).await
    }

    async fn upsert_recording_state(
        &mut self,
        lesson_id: &str,
        recording: Option<&CompositeRecordingState>,
    ) -> DaoResult<()> {
        let value = bson::to_bson(&recording)?;
        self.upsert_room_field(lesson_id, "recording", value).await
    }

    async fn upsert_session_time(&mut self, lesson_id: &str, at: DateTime) -> DaoResult<()> {
        self.upsert_room_field(lesson_id, "session_time", Bson::DateTime(at)).await
    }

    async fn get_member_states(
        &mut self,
        filter: &MemberStatesFilter,
    ) -> DaoResult<Vec<LessonMemberState>> {
        let mut cursor = self
            .member_states
            .find(filter_doc(filter))
            .sort(doc! { "user_id": 1 })
            .session(&mut self.session)
            .await?;

        let mut results = Vec::new();
        while let Some(state) = cursor.next(&mut self.session).await {
            results.push(state?);
        }
        Ok(results)
    }

    async fn upsert_member_state(&mut self, state: &LessonMemberState) -> DaoResult<()> {
        self.upsert_member(&state.lesson_id, &state.user_id, state.state_type, &state.value())
            .await
    }

    async fn upsert_all_member_states_by_type(
        &mut self,
        lesson_id: &str,
        state_type: MemberStateType,
        value: &StateValue,
    ) -> DaoResult<()> {
        let result = self
            .member_states
            .update_many(
                doc! { "lesson_id": lesson_id, "state_type": state_type.as_str() },
                doc! { "$set": member_value_doc(value, DateTime::now()) },
            )
            .session(&mut self.session)
            .await?;

        debug!(
            lesson_id,
            state_type = state_type.as_str(),
            rows = result.matched_count,
            "Reset member states"
        );
        Ok(())
    }

    async fn upsert_multi_member_states(
        &mut self,
        lesson_id: &str,
        state_type: MemberStateType,
        user_ids: &[String],
        value: &StateValue,
    ) -> DaoResult<()> {
        for user_id in user_ids {
            self.upsert_member(lesson_id, user_id, state_type, value).await?;
        }
        Ok(())
    }

    async fn create_polling(&mut self, polling: &LessonPolling) -> DaoResult<()> {
        self.pollings
            .insert_one(polling)
            .session(&mut self.session)
            .await
            .map_err(map_write_error)?;
        Ok(())
    }

    async fn commit(mut self: Box<Self>) -> DaoResult<()> {
        self.session
            .commit_transaction()
            .await
            .map_err(|e| DaoError::Transaction(e.to_string()))
    }

    async fn rollback(mut self: Box<Self>) -> DaoResult<()> {
        self.session
            .abort_transaction()
            .await
            .map_err(|e| DaoError::Transaction(e.to_string()))
    }
}
