mod lesson_member_state;
mod lesson_polling;
mod lesson_room_state;
mod live_lesson_conversation;
mod user;
mod virtual_lesson;

pub use lesson_member_state::*;
pub use lesson_polling::*;
pub use lesson_room_state::*;
pub use live_lesson_conversation::*;
pub use user::*;
pub use virtual_lesson::*;
