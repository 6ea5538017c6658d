use std::sync::Arc;

use futures::future::BoxFuture;
use liveroom_config::LiveRoomSettings;
use liveroom_db::models::VirtualLesson;
use tracing::{debug, warn};

use super::collaborators::{LessonReader, MediaLookup, UserRoleLookup};
use super::command::{CommandKind, StateModifyCommand};
use super::error::{LiveRoomError, LiveRoomResult, StoreContext};
use super::handlers;
use super::permission::CommandPermissionChecker;
use crate::dao::base::DaoError;
use crate::store::{RoomStateStore, StoreTx};

/// Resolves commands to their handlers and runs them inside a transaction.
pub struct CommandDispatcher {
    pub(crate) store: Arc<dyn RoomStateStore>,
    pub(crate) lessons: Arc<dyn LessonReader>,
    pub(crate) users: Arc<dyn UserRoleLookup>,
    pub(crate) media: Arc<dyn MediaLookup>,
    pub(crate) settings: LiveRoomSettings,
}

impl CommandDispatcher {
    pub fn new(
        store: Arc<dyn RoomStateStore>,
        lessons: Arc<dyn LessonReader>,
        users: Arc<dyn UserRoleLookup>,
        media: Arc<dyn MediaLookup>,
        settings: LiveRoomSettings,
    ) -> Self {
        Self {
            store,
            lessons,
            users,
            media,
            settings,
        }
    }

    pub async fn virtual_lesson(&self, lesson_id: &str) -> LiveRoomResult<VirtualLesson> {
        match self.lessons.get_virtual_lesson(lesson_id).await {
            Ok(lesson) => Ok(lesson),
            Err(DaoError::NotFound) => Err(LiveRoomError::LessonNotFound(lesson_id.to_string())),
            Err(e) => Err(e).store_context("LessonReader.get_virtual_lesson", lesson_id),
        }
    }

    pub async fn permission_checker(&self, lesson_id: &str) -> LiveRoomResult<CommandPermissionChecker> {
        let lesson = self.virtual_lesson(lesson_id).await?;
        Ok(CommandPermissionChecker::new(lesson, Arc::clone(&self.users)))
    }

    /// Authorizes the commander against the lesson, then dispatches.
    pub async fn check_permission_and_dispatch(&self, command: &StateModifyCommand) -> LiveRoomResult<()> {
        let checker = self.permission_checker(&command.lesson_id).await?;
        checker.check(command).await?;
        self.dispatch(command).await
    }

    /// Runs the command in a new transaction, committing on success and
    /// rolling back on any error.
    pub async fn dispatch(&self, command: &StateModifyCommand) -> LiveRoomResult<()> {
        let lesson_id = command.lesson_id.as_str();
        let mut tx = self
            .store
            .begin()
            .await
            .store_context("RoomStateStore.begin", lesson_id)?;

        match self.dispatch_with_transaction(tx.as_mut(), command).await {
            Ok(()) => tx.commit().await.store_context("StoreTx.commit", lesson_id),
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(lesson_id, command = command.name(), %rollback_err, "Rollback failed");
                }
                Err(err)
            }
        }
    }

    /// Runs the command inside a transaction owned by the caller. Nothing is
    /// committed or rolled back here.
    pub fn dispatch_with_transaction<'a>(
        &'a self,
        tx: &'a mut dyn StoreTx,
        command: &'a StateModifyCommand,
    ) -> BoxFuture<'a, LiveRoomResult<()>> {
        Box::pin(async move {
            debug!(
                lesson_id = %command.lesson_id,
                commander_id = %command.commander_id,
                command = command.name(),
                "Dispatching command"
            );

            match &command.kind {
                CommandKind::ShareMaterial(material) => {
                    handlers::material::share_material(self, tx, command, material.as_ref()).await
                }
                CommandKind::StopSharingMaterial => {
                    handlers::material::stop_sharing_material(self, tx, command).await
                }
                CommandKind::UpdateHandsUp { user_id, value } => {
                    handlers::member::update_hands_up(tx, command, user_id, *value).await
                }
                CommandKind::FoldHandAll => handlers::member::fold_hand_all(tx, command).await,
                CommandKind::UpdateAnnotation { user_ids, value } => {
                    handlers::member::update_annotation(tx, command, user_ids, *value).await
                }
                CommandKind::DisableAllAnnotation => {
                    handlers::member::disable_all_annotation(tx, command).await
                }
                CommandKind::UpdateChat { user_ids, value } => {
                    handlers::member::update_chat(tx, command, user_ids, *value).await
                }
                CommandKind::ResetAllChat => handlers::member::reset_all_chat(tx, command).await,
                CommandKind::StartPolling { question, options } => {
                    handlers::polling::start_polling(self, tx, command, question, options).await
                }
                CommandKind::StopPolling => handlers::polling::stop_polling(tx, command).await,
                CommandKind::SharePolling { is_shared } => {
                    handlers::polling::share_polling(tx, command, *is_shared).await
                }
                CommandKind::EndPolling => handlers::polling::end_polling(tx, command).await,
                CommandKind::SubmitPollingAnswer { user_id, answers } => {
                    handlers::polling::submit_polling_answer(tx, command, user_id, answers).await
                }
                CommandKind::ResetPolling => handlers::polling::reset_polling(tx, command).await,
                CommandKind::Spotlight { user_id } => {
                    handlers::room::spotlight(tx, command, user_id.as_deref()).await
                }
                CommandKind::WhiteboardZoomState(zoom) => {
                    handlers::room::whiteboard_zoom_state(tx, command, zoom).await
                }
                CommandKind::UpsertSessionTime => handlers::room::upsert_session_time(tx, command).await,
                CommandKind::RequestRecording => handlers::room::request_recording(tx, command).await,
                CommandKind::StopRecording => handlers::room::stop_recording(tx, command).await,
                CommandKind::ClearRecording => handlers::room::clear_recording(tx, command).await,
                CommandKind::ResetAllStates => handlers::reset::reset_all_states(self, tx, command).await,
            }
        })
    }
}
