pub mod concurrency;
pub mod conversation;
pub mod dao;
pub mod live_room;
pub mod store;

pub use concurrency::{BoundedMapOutcome, TaskFailure, bounded_map};
pub use conversation::{
    ConversationProvider, ConversationService, ConversationStore, HttpConversationProvider,
    PrivateConversations,
};
pub use dao::*;
pub use live_room::{
    CommandDispatcher, CommandKind, CommandPermissionChecker, LiveRoomError, LiveRoomResult,
    MaterialToShare, StateModifyCommand,
};
pub use store::{MemoryConversationStore, MemoryRoomStateStore, RoomStateStore, StoreOp, StoreTx};
