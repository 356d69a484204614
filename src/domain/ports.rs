use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::watch;

use crate::domain::errors::StoreError;
use crate::domain::event::EventRecord;
use crate::domain::room::{Room, RoomPatch};

// Port for the shared room/event store used by game workflows. The store
// offers no transactions or compare-and-swap; callers do blind
// read-modify-write sequences and accept the races that implies.
#[async_trait]
pub trait GameStore: Send + Sync {
    // Query-by-code returning zero or one room.
    async fn find_room_by_code(&self, code: &str) -> Result<Option<Room>, StoreError>;

    // Create a lobby room with a store-assigned id and creation timestamp.
    async fn create_room(&self, code: &str, max_rounds: u32) -> Result<Room, StoreError>;

    async fn get_room(&self, room_id: &str) -> Result<Room, StoreError>;

    // Partial field update; unset patch fields keep their stored value.
    async fn update_room(&self, room_id: &str, patch: RoomPatch) -> Result<(), StoreError>;

    // Append an event to the room's log. The store assigns the timestamp at
    // write time and publishes the record as the room's latest event.
    async fn append_event(
        &self,
        room_id: &str,
        kind: &str,
        payload: Map<String, Value>,
    ) -> Result<(), StoreError>;

    // Latest-event feed for a room. A subscriber that falls behind observes
    // only the newest record; dropping the receiver releases the listener.
    async fn subscribe_latest_event(
        &self,
        room_id: &str,
    ) -> Result<watch::Receiver<Option<EventRecord>>, StoreError>;
}
