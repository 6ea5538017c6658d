use std::sync::Arc;

use liveroom_db::models::VirtualLesson;
use tracing::warn;

use super::collaborators::UserRoleLookup;
use super::command::StateModifyCommand;
use super::error::{LiveRoomError, LiveRoomResult, StoreContext};

/// Decides whether a commander may issue a command in one lesson.
///
/// Raising/lowering one's own hand and answering a poll are self-service
/// for the lesson's learners. Everything else is reserved to the lesson's
/// teachers; identities that are neither a teacher of the lesson nor a
/// student account (admins, system users) are let through.
pub struct CommandPermissionChecker {
    lesson: VirtualLesson,
    users: Arc<dyn UserRoleLookup>,
}

impl CommandPermissionChecker {
    pub fn new(lesson: VirtualLesson, users: Arc<dyn UserRoleLookup>) -> Self {
        Self { lesson, users }
    }

    pub fn lesson(&self) -> &VirtualLesson {
        &self.lesson
    }

    pub async fn check(&self, command: &StateModifyCommand) -> LiveRoomResult<()> {
        let commander = command.commander_id.as_str();

        if let Some(target) = command.kind.self_service_target() {
            if self.lesson.is_learner(commander) {
                if commander != target {
                    warn!(
                        lesson_id = %command.lesson_id,
                        commander_id = commander,
                        target_user = target,
                        command = command.name(),
                        "Learner acted on another user"
                    );
                    return Err(LiveRoomError::permission_denied(format!(
                        "user {commander} can't {} for user {target}",
                        command.name()
                    )));
                }
                return Ok(());
            }
        }

        self.check_teacher(command).await
    }

    async fn check_teacher(&self, command: &StateModifyCommand) -> LiveRoomResult<()> {
        let commander = command.commander_id.as_str();
        if self.lesson.is_teacher(commander) {
            return Ok(());
        }

        let is_student = self
            .users
            .is_student(commander)
            .await
            .store_context("UserRoleLookup.is_student", &command.lesson_id)?;
        if is_student {
            warn!(
                lesson_id = %command.lesson_id,
                commander_id = commander,
                command = command.name(),
                "Student issued a teacher-only command"
            );
            return Err(LiveRoomError::permission_denied(format!(
                "user {commander} is not a teacher of lesson {}",
                command.lesson_id
            )));
        }

        Ok(())
    }
}
