//! One handler per command kind. Handlers only ever see an open
//! transaction; the dispatcher decides where it comes from.

pub(crate) mod material;
pub(crate) mod member;
pub(crate) mod polling;
pub(crate) mod reset;
pub(crate) mod room;

use liveroom_db::models::LessonRoomState;

use super::error::{LiveRoomResult, StoreContext};
use crate::store::StoreTx;

pub(crate) async fn load_room_state(
    tx: &mut dyn StoreTx,
    lesson_id: &str,
) -> LiveRoomResult<Option<LessonRoomState>> {
    tx.get_room_state(lesson_id)
        .await
        .store_context("LessonRoomState.get", lesson_id)
}

pub use reset::reset_all_states_sequence;
