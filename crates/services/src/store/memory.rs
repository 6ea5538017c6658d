use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use bson::{DateTime, oid::ObjectId};
use dashmap::DashMap;
use liveroom_db::models::{
    CompositeRecordingState, ConversationType, CurrentMaterial, CurrentPolling,
    LessonMemberState, LessonPolling, LessonRoomState, LiveLessonConversation,
    MemberStateType, MemberStatesFilter, StateValue, WhiteboardZoomState,
};
use parking_lot::Mutex;
use tracing::debug;

use super::{RoomStateStore, StoreOp, StoreTx};
use crate::conversation::ConversationStore;
use crate::dao::base::{DaoError, DaoResult};

type MemberKey = (String, String, MemberStateType);

/// Room-state fields a transaction can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum RoomField {
    CurrentPolling,
    CurrentMaterial,
    WhiteboardZoomState,
    Spotlight,
    Recording,
    SessionTime,
}

impl RoomField {
    fn copy(self, from: &LessonRoomState, to: &mut LessonRoomState) {
        match self {
            RoomField::CurrentPolling => to.current_polling = from.current_polling.clone(),
            RoomField::CurrentMaterial => to.current_material = from.current_material.clone(),
            RoomField::WhiteboardZoomState => to.whiteboard_zoom_state = from.whiteboard_zoom_state.clone(),
            RoomField::Spotlight => to.spotlighted_user = from.spotlighted_user.clone(),
            RoomField::Recording => to.recording = from.recording.clone(),
            RoomField::SessionTime => to.session_time = from.session_time,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Tables {
    room_states: HashMap<String, LessonRoomState>,
    member_states: HashMap<MemberKey, LessonMemberState>,
    pollings: Vec<LessonPolling>,
}

#[derive(Default)]
struct Shared {
    tables: Mutex<Tables>,
    failures: Mutex<HashSet<StoreOp>>,
}

impl Shared {
    fn check(&self, op: StoreOp) -> DaoResult<()> {
        if self.failures.lock().contains(&op) {
            return Err(DaoError::Transaction(format!("injected failure on {op:?}")));
        }
        Ok(())
    }
}

/// In-process room-state store.
///
/// A transaction works on a private copy of the tables taken at `begin`;
/// `commit` merges only the room-state fields and member rows it wrote, so
/// concurrent transactions clobber each other only on the same field, where
/// the last writer wins.
#[derive(Clone, Default)]
pub struct MemoryRoomStateStore {
    shared: Arc<Shared>,
}

impl MemoryRoomStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later call of `op` fail until [`Self::clear_failures`].
    pub fn fail_on(&self, op: StoreOp) {
        self.shared.failures.lock().insert(op);
    }

    pub fn clear_failures(&self) {
        self.shared.failures.lock().clear();
    }

    pub fn room_state(&self, lesson_id: &str) -> Option<LessonRoomState> {
        self.shared.tables.lock().room_states.get(lesson_id).cloned()
    }

    pub fn member_state(
        &self,
        lesson_id: &str,
        user_id: &str,
        state_type: MemberStateType,
    ) -> Option<LessonMemberState> {
        let key = (lesson_id.to_string(), user_id.to_string(), state_type);
        self.shared.tables.lock().member_states.get(&key).cloned()
    }

    pub fn member_states(&self, filter: &MemberStatesFilter) -> Vec<LessonMemberState> {
        let mut states: Vec<_> = self
            .shared
            .tables
            .lock()
            .member_states
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        states.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        states
    }

    pub fn pollings(&self, lesson_id: &str) -> Vec<LessonPolling> {
        self.shared
            .tables
            .lock()
            .pollings
            .iter()
            .filter(|p| p.lesson_id == lesson_id)
            .cloned()
            .collect()
    }

    pub fn seed_room_state(&self, state: LessonRoomState) {
        self.shared
            .tables
            .lock()
            .room_states
            .insert(state.lesson_id.clone(), state);
    }

    pub fn seed_member_state(&self, state: LessonMemberState) {
        let key = (state.lesson_id.clone(), state.user_id.clone(), state.state_type);
        self.shared.tables.lock().member_states.insert(key, state);
    }
}

#[async_trait]
impl RoomStateStore for MemoryRoomStateStore {
    async fn begin(&self) -> DaoResult<Box<dyn StoreTx>> {
        let working = self.shared.tables.lock().clone();
        Ok(Box::new(MemoryTx {
            shared: Arc::clone(&self.shared),
            working,
            touched_rooms: HashMap::new(),
            touched_members: HashSet::new(),
            new_pollings: Vec::new(),
        }))
    }
}

struct MemoryTx {
    shared: Arc<Shared>,
    working: Tables,
    touched_rooms: HashMap<String, HashSet<RoomField>>,
    touched_members: HashSet<MemberKey>,
    new_pollings: Vec<LessonPolling>,
}

impl MemoryTx {
    fn room_mut(&mut self, lesson_id: &str, field: RoomField) -> &mut LessonRoomState {
        self.touched_rooms
            .entry(lesson_id.to_string())
            .or_default()
            .insert(field);
        let state = self
            .working
            .room_states
            .entry(lesson_id.to_string())
            .or_insert_with(|| LessonRoomState::new(lesson_id));
        state.updated_at = DateTime::now();
        state
    }

    fn put_member(&mut self, lesson_id: &str, user_id: &str, state_type: MemberStateType, value: &StateValue) {
        let key = (lesson_id.to_string(), user_id.to_string(), state_type);
        let now = DateTime::now();
        self.working
            .member_states
            .entry(key.clone())
            .and_modify(|s| {
                s.bool_value = value.bool_value;
                s.string_array_value = value.string_array_value.clone();
                s.updated_at = now;
            })
            .or_insert_with(|| LessonMemberState::new(lesson_id, user_id, state_type, value.clone()));
        self.touched_members.insert(key);
    }
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn get_room_state(&mut self, lesson_id: &str) -> DaoResult<Option<LessonRoomState>> {
        self.shared.check(StoreOp::GetRoomState)?;
        Ok(self.working.room_states.get(lesson_id).cloned())
    }

    async fn upsert_current_polling(
        &mut self,
        lesson_id: &str,
        polling: Option<&CurrentPolling>,
    ) -> DaoResult<()> {
        self.shared.check(StoreOp::UpsertCurrentPolling)?;
        self.room_mut(lesson_id, RoomField::CurrentPolling).current_polling = polling.cloned();
        Ok(())
    }

    async fn upsert_current_material(
        &mut self,
        lesson_id: &str,
        material: Option<&CurrentMaterial>,
    ) -> DaoResult<()> {
        self.shared.check(StoreOp::UpsertCurrentMaterial)?;
        self.room_mut(lesson_id, RoomField::CurrentMaterial).current_material = material.cloned();
        Ok(())
    }

    async fn upsert_whiteboard_zoom_state(
        &mut self,
        lesson_id: &str,
        zoom: &WhiteboardZoomState,
    ) -> DaoResult<()> {
        self.shared.check(StoreOp::UpsertWhiteboardZoomState)?;
        self.room_mut(lesson_id, RoomField::WhiteboardZoomState).whiteboard_zoom_state = zoom.clone();
        Ok(())
    }

    async fn set_spotlight(&mut self, lesson_id: &str, user_id: Option<&str>) -> DaoResult<()> {
        self.shared.check(StoreOp::SetSpotlight)?;
        self.room_mut(lesson_id, RoomField::Spotlight).spotlighted_user = user_id.map(str::to_string);
        Ok(())
    }

    async fn upsert_recording_state(
        &mut self,
        lesson_id: &str,
        recording: Option<&CompositeRecordingState>,
    ) -> DaoResult<()> {
        self.shared.check(StoreOp::UpsertRecordingState)?;
        self.room_mut(lesson_id, RoomField::Recording).recording = recording.cloned();
        Ok(())
    }

    async fn upsert_session_time(&mut self, lesson_id: &str, at: DateTime) -> DaoResult<()> {
        self.shared.check(StoreOp::UpsertSessionTime)?;
        self.room_mut(lesson_id, RoomField::SessionTime).session_time = Some(at);
        Ok(())
    }

    async fn get_member_states(
        &mut self,
        filter: &MemberStatesFilter,
    ) -> DaoResult<Vec<LessonMemberState>> {
        self.shared.check(StoreOp::GetMemberStates)?;
        let mut states: Vec<_> = self
            .working
            .member_states
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        states.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(states)
    }

    async fn upsert_member_state(&mut self, state: &LessonMemberState) -> DaoResult<()> {
        self.shared.check(StoreOp::UpsertMemberState)?;
        self.put_member(&state.lesson_id, &state.user_id, state.state_type, &state.value());
        Ok(())
    }

    async fn upsert_all_member_states_by_type(
        &mut self,
        lesson_id: &str,
        state_type: MemberStateType,
        value: &StateValue,
    ) -> DaoResult<()> {
        self.shared.check(StoreOp::UpsertAllMemberStates)?;
        let users: Vec<String> = self
            .working
            .member_states
            .values()
            .filter(|s| s.lesson_id == lesson_id && s.state_type == state_type)
            .map(|s| s.user_id.clone())
            .collect();
        for user_id in &users {
            self.put_member(lesson_id, user_id, state_type, value);
        }
        debug!(lesson_id, state_type = state_type.as_str(), rows = users.len(), "Reset member states");
        Ok(())
    }

    async fn upsert_multi_member_states(
        &mut self,
        lesson_id: &str,
        state_type: MemberStateType,
        user_ids: &[String],
        value: &StateValue,
    ) -> DaoResult<()> {
        self.shared.check(StoreOp::UpsertMultiMemberStates)?;
        for user_id in user_ids {
            self.put_member(lesson_id, user_id, state_type, value);
        }
        Ok(())
    }

    async fn create_polling(&mut self, polling: &LessonPolling) -> DaoResult<()> {
        self.shared.check(StoreOp::CreatePolling)?;
        self.new_pollings.push(polling.clone());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> DaoResult<()> {
        self.shared.check(StoreOp::Commit)?;
        let MemoryTx {
            shared,
            mut working,
            touched_rooms,
            touched_members,
            new_pollings,
        } = *self;

        let mut tables = shared.tables.lock();
        for (lesson_id, fields) in touched_rooms {
            let Some(written) = working.room_states.remove(&lesson_id) else {
                continue;
            };
            match tables.room_states.get_mut(&lesson_id) {
                Some(current) => {
                    for field in fields {
                        field.copy(&written, current);
                    }
                    current.updated_at = written.updated_at;
                }
                None => {
                    tables.room_states.insert(lesson_id, written);
                }
            }
        }
        for key in touched_members {
            if let Some(state) = working.member_states.remove(&key) {
                tables.member_states.insert(key, state);
            }
        }
        tables.pollings.extend(new_pollings);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> DaoResult<()> {
        Ok(())
    }
}

/// In-process conversation store keyed by generated object id.
#[derive(Clone, Default)]
pub struct MemoryConversationStore {
    records: Arc<DashMap<ObjectId, LiveLessonConversation>>,
}

impl MemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn all(&self) -> Vec<LiveLessonConversation> {
        self.records.iter().map(|r| r.value().clone()).collect()
    }
}

#[async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn find(
        &self,
        lesson_id: &str,
        conversation_type: ConversationType,
        participant_ids: Option<&[String]>,
    ) -> DaoResult<Option<LiveLessonConversation>> {
        Ok(self
            .records
            .iter()
            .find(|r| {
                r.lesson_id == lesson_id
                    && r.conversation_type == conversation_type
                    && participant_ids.is_none_or(|ids| r.participant_ids == ids)
            })
            .map(|r| r.value().clone()))
    }

    async fn insert(&self, conversation: &LiveLessonConversation) -> DaoResult<()> {
        let id = conversation.id.unwrap_or_else(ObjectId::new);
        let mut record = conversation.clone();
        record.id = Some(id);
        self.records.insert(id, record);
        Ok(())
    }

    async fn update_participants(
        &self,
        conversation_id: &str,
        participant_ids: &[String],
    ) -> DaoResult<()> {
        let mut found = false;
        for mut record in self.records.iter_mut() {
            if record.conversation_id == conversation_id {
                record.participant_ids = participant_ids.to_vec();
                record.updated_at = DateTime::now();
                found = true;
            }
        }
        if !found {
            return Err(DaoError::NotFound);
        }
        Ok(())
    }
}
