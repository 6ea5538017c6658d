use bson::DateTime;
use liveroom_db::models::CurrentMaterial;
use tracing::debug;

use crate::live_room::command::{CommandKind, MaterialToShare, StateModifyCommand};
use crate::live_room::dispatcher::CommandDispatcher;
use crate::live_room::error::{LiveRoomError, LiveRoomResult, StoreContext};
use crate::store::StoreTx;

pub(crate) async fn share_material(
    dispatcher: &CommandDispatcher,
    tx: &mut dyn StoreTx,
    command: &StateModifyCommand,
    material: Option<&MaterialToShare>,
) -> LiveRoomResult<()> {
    let lesson_id = command.lesson_id.as_str();

    let current = match material {
        Some(material) => {
            let lesson = dispatcher.virtual_lesson(lesson_id).await?;
            let media_ids = match lesson.lesson_group_id.as_deref() {
                Some(group_id) => dispatcher
                    .media
                    .media_ids(group_id)
                    .await
                    .store_context("MediaLookup.media_ids", lesson_id)?,
                None => Vec::new(),
            };
            if !media_ids.iter().any(|id| id == &material.media_id) {
                return Err(LiveRoomError::validation(format!(
                    "media {} not belong to lesson {}",
                    material.media_id, lesson_id
                )));
            }

            Some(CurrentMaterial {
                media_id: material.media_id.clone(),
                video_state: material.video_state.clone(),
                audio_state: material.audio_state.clone(),
                updated_at: DateTime::now(),
            })
        }
        None => None,
    };

    tx.upsert_current_material(lesson_id, current.as_ref())
        .await
        .store_context("LessonRoomState.upsert_current_material", lesson_id)?;

    debug!(
        lesson_id,
        media_id = ?current.as_ref().map(|m| m.media_id.as_str()),
        "Current material updated"
    );
    Ok(())
}

/// Sharing "no material" within the caller's transaction.
pub(crate) async fn stop_sharing_material(
    dispatcher: &CommandDispatcher,
    tx: &mut dyn StoreTx,
    command: &StateModifyCommand,
) -> LiveRoomResult<()> {
    let sub = command.derive(CommandKind::ShareMaterial(None));
    dispatcher.dispatch_with_transaction(tx, &sub).await
}
