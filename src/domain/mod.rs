// Domain layer: room/event/spawn types and the store port.

pub mod errors;
pub mod event;
pub mod ports;
pub mod room;
pub mod spawn;

pub use errors::{GameError, StoreError};
pub use event::{EndResult, EventRecord, GameEvent, ScoreResult};
pub use ports::GameStore;
pub use room::{Room, RoomPatch, RoomPhase, ScoreBoard, champion};
pub use spawn::{Spawn, SpawnBounds, generate_spawn};
