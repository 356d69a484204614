// Use cases layer: application workflows for the duel engine.

pub mod coordinator;
pub mod reducer;
pub mod session;

pub use coordinator::{GameCoordinator, GameSettings};
pub use reducer::{ClientView, reduce};
pub use session::RoomSession;
