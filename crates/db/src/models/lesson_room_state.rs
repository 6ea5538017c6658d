use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Everything that is currently happening in a lesson's live room.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LessonRoomState {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub lesson_id: String,
    pub current_polling: Option<CurrentPolling>,
    pub current_material: Option<CurrentMaterial>,
    #[serde(default)]
    pub whiteboard_zoom_state: WhiteboardZoomState,
    pub spotlighted_user: Option<String>,
    pub recording: Option<CompositeRecordingState>,
    pub session_time: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl LessonRoomState {
    pub const COLLECTION: &'static str = "lesson_room_states";

    pub fn new(lesson_id: impl Into<String>) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            lesson_id: lesson_id.into(),
            current_polling: None,
            current_material: None,
            whiteboard_zoom_state: WhiteboardZoomState::default(),
            spotlighted_user: None,
            recording: None,
            session_time: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recording.as_ref().is_some_and(|r| r.is_recording)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentPolling {
    pub options: Vec<PollingOption>,
    #[serde(default)]
    pub question: String,
    pub status: PollingStatus,
    pub created_at: DateTime,
    pub stopped_at: Option<DateTime>,
    #[serde(default)]
    pub is_shared: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PollingOption {
    pub answer: String,
    #[serde(default)]
    pub is_correct: bool,
}

impl PollingOption {
    pub fn new(answer: impl Into<String>, is_correct: bool) -> Self {
        Self {
            answer: answer.into(),
            is_correct,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PollingStatus {
    Started,
    Stopped,
    Ended,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentMaterial {
    pub media_id: String,
    pub video_state: Option<MediaPlayerState>,
    pub audio_state: Option<MediaPlayerState>,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaPlayerState {
    #[serde(default)]
    pub current_time_ms: i64,
    pub player_state: PlayerState,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlayerState {
    Playing,
    Paused,
    Ended,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WhiteboardZoomState {
    pub pdf_scale_ratio: f64,
    pub center_x: f64,
    pub center_y: f64,
    pub pdf_width: f64,
    pub pdf_height: f64,
}

impl Default for WhiteboardZoomState {
    fn default() -> Self {
        Self {
            pdf_scale_ratio: 100.0,
            center_x: 0.0,
            center_y: 0.0,
            pdf_width: 0.0,
            pdf_height: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompositeRecordingState {
    pub is_recording: bool,
    pub creator: Option<String>,
    pub started_at: Option<DateTime>,
}
