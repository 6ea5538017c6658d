use liveroom_db::models::{MediaPlayerState, PollingOption, WhiteboardZoomState};

/// A request to mutate a lesson's live room, issued by `commander_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct StateModifyCommand {
    pub commander_id: String,
    pub lesson_id: String,
    pub kind: CommandKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandKind {
    /// `None` stops sharing.
    ShareMaterial(Option<MaterialToShare>),
    StopSharingMaterial,
    UpdateHandsUp { user_id: String, value: bool },
    FoldHandAll,
    UpdateAnnotation { user_ids: Vec<String>, value: bool },
    DisableAllAnnotation,
    UpdateChat { user_ids: Vec<String>, value: bool },
    ResetAllChat,
    StartPolling { question: String, options: Vec<PollingOption> },
    StopPolling,
    SharePolling { is_shared: bool },
    EndPolling,
    SubmitPollingAnswer { user_id: String, answers: Vec<String> },
    ResetPolling,
    /// `None` clears the spotlight.
    Spotlight { user_id: Option<String> },
    WhiteboardZoomState(WhiteboardZoomState),
    UpsertSessionTime,
    RequestRecording,
    StopRecording,
    ClearRecording,
    ResetAllStates,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaterialToShare {
    pub media_id: String,
    pub video_state: Option<MediaPlayerState>,
    pub audio_state: Option<MediaPlayerState>,
}

impl MaterialToShare {
    pub fn new(media_id: impl Into<String>) -> Self {
        Self {
            media_id: media_id.into(),
            video_state: None,
            audio_state: None,
        }
    }
}

impl StateModifyCommand {
    pub fn new(
        commander_id: impl Into<String>,
        lesson_id: impl Into<String>,
        kind: CommandKind,
    ) -> Self {
        Self {
            commander_id: commander_id.into(),
            lesson_id: lesson_id.into(),
            kind,
        }
    }

    /// Builds a sub-command with the same commander and lesson.
    pub fn derive(&self, kind: CommandKind) -> Self {
        Self {
            commander_id: self.commander_id.clone(),
            lesson_id: self.lesson_id.clone(),
            kind,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

impl CommandKind {
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::ShareMaterial(_) => "ShareMaterial",
            CommandKind::StopSharingMaterial => "StopSharingMaterial",
            CommandKind::UpdateHandsUp { .. } => "UpdateHandsUp",
            CommandKind::FoldHandAll => "FoldHandAll",
            CommandKind::UpdateAnnotation { .. } => "UpdateAnnotation",
            CommandKind::DisableAllAnnotation => "DisableAllAnnotation",
            CommandKind::UpdateChat { .. } => "UpdateChat",
            CommandKind::ResetAllChat => "ResetAllChat",
            CommandKind::StartPolling { .. } => "StartPolling",
            CommandKind::StopPolling => "StopPolling",
            CommandKind::SharePolling { .. } => "SharePolling",
            CommandKind::EndPolling => "EndPolling",
            CommandKind::SubmitPollingAnswer { .. } => "SubmitPollingAnswer",
            CommandKind::ResetPolling => "ResetPolling",
            CommandKind::Spotlight { .. } => "Spotlight",
            CommandKind::WhiteboardZoomState(_) => "WhiteboardZoomState",
            CommandKind::UpsertSessionTime => "UpsertSessionTime",
            CommandKind::RequestRecording => "RequestRecording",
            CommandKind::StopRecording => "StopRecording",
            CommandKind::ClearRecording => "ClearRecording",
            CommandKind::ResetAllStates => "ResetAllStates",
        }
    }

    /// The user a self-service command acts on, if the command is one.
    pub fn self_service_target(&self) -> Option<&str> {
        match self {
            CommandKind::UpdateHandsUp { user_id, .. }
            | CommandKind::SubmitPollingAnswer { user_id, .. } => Some(user_id),
            _ => None,
        }
    }
}
