//! Transactional access to a lesson's room state and member states.
//!
//! Every command handler receives an open [`StoreTx`]. Whoever called
//! [`RoomStateStore::begin`] owns the transaction boundary and decides
//! whether to commit or roll back; handlers never do.

mod memory;

use async_trait::async_trait;
use bson::DateTime;
use liveroom_db::models::{
    CompositeRecordingState, CurrentMaterial, CurrentPolling, LessonMemberState,
    LessonPolling, LessonRoomState, MemberStateType, MemberStatesFilter, StateValue,
    WhiteboardZoomState,
};

use crate::dao::base::DaoResult;

pub use memory::{MemoryConversationStore, MemoryRoomStateStore};

#[async_trait]
pub trait RoomStateStore: Send + Sync {
    async fn begin(&self) -> DaoResult<Box<dyn StoreTx>>;
}

/// An open transaction against the room-state store.
///
/// Room-state writes are upserts keyed by lesson; a missing room state is
/// created on first write. Member-state writes are upserts keyed by
/// `(lesson_id, user_id, state_type)`.
#[async_trait]
pub trait StoreTx: Send {
    async fn get_room_state(&mut self, lesson_id: &str) -> DaoResult<Option<LessonRoomState>>;

    async fn upsert_current_polling(
        &mut self,
        lesson_id: &str,
        polling: Option<&CurrentPolling>,
    ) -> DaoResult<()>;

    async fn upsert_current_material(
        &mut self,
        lesson_id: &str,
        material: Option<&CurrentMaterial>,
    ) -> DaoResult<()>;

    async fn upsert_whiteboard_zoom_state(
        &mut self,
        lesson_id: &str,
        zoom: &WhiteboardZoomState,
    ) -> DaoResult<()>;

    async fn set_spotlight(&mut self, lesson_id: &str, user_id: Option<&str>) -> DaoResult<()>;

    async fn upsert_recording_state(
        &mut self,
        lesson_id: &str,
        recording: Option<&CompositeRecordingState>,
    ) -> DaoResult<()>;

    async fn upsert_session_time(&mut self, lesson_id: &str, at: DateTime) -> DaoResult<()>;

    async fn get_member_states(
        &mut self,
        filter: &MemberStatesFilter,
    ) -> DaoResult<Vec<LessonMemberState>>;

    async fn upsert_member_state(&mut self, state: &LessonMemberState) -> DaoResult<()>;

    /// Overwrites every existing row of `state_type` in the lesson.
    async fn upsert_all_member_states_by_type(
        &mut self,
        lesson_id: &str,
        state_type: MemberStateType,
        value: &StateValue,
    ) -> DaoResult<()>;

    /// Upserts the rows of the listed users only.
    async fn upsert_multi_member_states(
        &mut self,
        lesson_id: &str,
        state_type: MemberStateType,
        user_ids: &[String],
        value: &StateValue,
    ) -> DaoResult<()>;

    async fn create_polling(&mut self, polling: &LessonPolling) -> DaoResult<()>;

    async fn commit(self: Box<Self>) -> DaoResult<()>;

    async fn rollback(self: Box<Self>) -> DaoResult<()>;
}

/// Named store operations, used to inject failures into the in-memory store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    GetRoomState,
    UpsertCurrentPolling,
    UpsertCurrentMaterial,
    UpsertWhiteboardZoomState,
    SetSpotlight,
    UpsertRecordingState,
    UpsertSessionTime,
    GetMemberStates,
    UpsertMemberState,
    UpsertAllMemberStates,
    UpsertMultiMemberStates,
    CreatePolling,
    Commit,
}
