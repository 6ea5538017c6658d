use liveroom_db::models::WhiteboardZoomState;
use tracing::info;

use crate::live_room::command::{CommandKind, StateModifyCommand};
use crate::live_room::dispatcher::CommandDispatcher;
use crate::live_room::error::LiveRoomResult;
use crate::store::StoreTx;

/// Sub-commands of a full room reset, in the order they run.
pub fn reset_all_states_sequence() -> Vec<CommandKind> {
    vec![
        CommandKind::StopSharingMaterial,
        CommandKind::DisableAllAnnotation,
        CommandKind::FoldHandAll,
        CommandKind::ResetPolling,
        CommandKind::WhiteboardZoomState(WhiteboardZoomState::default()),
        CommandKind::Spotlight { user_id: None },
        CommandKind::ResetAllChat,
        CommandKind::ClearRecording,
    ]
}

/// Runs every reset inside the caller's transaction. The first failure
/// aborts the sequence and is returned unchanged.
pub(crate) async fn reset_all_states(
    dispatcher: &CommandDispatcher,
    tx: &mut dyn StoreTx,
    command: &StateModifyCommand,
) -> LiveRoomResult<()> {
    for kind in reset_all_states_sequence() {
        let sub = command.derive(kind);
        dispatcher.dispatch_with_transaction(&mut *tx, &sub).await?;
    }

    info!(
        lesson_id = %command.lesson_id,
        commander_id = %command.commander_id,
        "Live room states reset"
    );
    Ok(())
}
