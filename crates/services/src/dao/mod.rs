pub mod base;
pub mod conversation;
pub mod lesson;
pub mod room_state;

pub use base::{BaseDao, DaoError, DaoResult};
pub use conversation::ConversationDao;
pub use lesson::{LessonDao, UserDao};
pub use room_state::MongoRoomStateStore;
