//! Command engine for a lesson's live room: who may do what, and how each
//! command mutates the room inside a single transaction.

mod collaborators;
mod command;
mod dispatcher;
mod error;
mod handlers;
mod permission;
pub mod polling;

pub use collaborators::{LessonReader, MediaLookup, UserRoleLookup};
pub use command::{CommandKind, MaterialToShare, StateModifyCommand};
pub use dispatcher::CommandDispatcher;
pub use error::{LiveRoomError, LiveRoomResult};
pub(crate) use error::StoreContext;
pub use handlers::reset_all_states_sequence;
pub use permission::CommandPermissionChecker;
