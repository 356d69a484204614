// In-memory implementation of the shared room/event store. Deliberately
// offers no conditional update or transaction: concurrent read-modify-write
// sequences against the same room can race, exactly as the engine documents.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::{RwLock, watch};
use uuid::Uuid;

use crate::domain::errors::StoreError;
use crate::domain::event::EventRecord;
use crate::domain::ports::GameStore;
use crate::domain::room::{Room, RoomPatch, RoomPhase, ScoreBoard};

// Append-only log plus the latest-event channel for one room.
struct RoomFeed {
    log: Vec<EventRecord>,
    latest_tx: watch::Sender<Option<EventRecord>>,
}

impl RoomFeed {
    fn new() -> Self {
        let (latest_tx, _) = watch::channel(None);
        Self {
            log: Vec::new(),
            latest_tx,
        }
    }
}

/// In-memory room/event store shared by every connected client.
#[derive(Default)]
pub struct InMemoryStore {
    rooms: RwLock<HashMap<String, Room>>,
    feeds: RwLock<HashMap<String, RoomFeed>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full append-only log for a room, oldest first. Diagnostic accessor;
    /// clients only ever receive the latest record.
    pub async fn event_log(&self, room_id: &str) -> Vec<EventRecord> {
        let feeds = self.feeds.read().await;
        feeds
            .get(room_id)
            .map(|feed| feed.log.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl GameStore for InMemoryStore {
    async fn find_room_by_code(&self, code: &str) -> Result<Option<Room>, StoreError> {
        let rooms = self.rooms.read().await;
        // Zero-or-one semantics: first match wins. Duplicate-code rooms can
        // exist after a racing create; which one is found is unspecified.
        Ok(rooms.values().find(|room| room.code == code).cloned())
    }

    async fn create_room(&self, code: &str, max_rounds: u32) -> Result<Room, StoreError> {
        let room = Room {
            id: Uuid::new_v4().to_string(),
            code: code.to_string(),
            phase: RoomPhase::Lobby,
            score: ScoreBoard::new(),
            round: 0,
            max_rounds,
            created_at: epoch_millis(),
        };

        let mut rooms = self.rooms.write().await;
        rooms.insert(room.id.clone(), room.clone());
        Ok(room)
    }

    async fn get_room(&self, room_id: &str) -> Result<Room, StoreError> {
        let rooms = self.rooms.read().await;
        rooms.get(room_id).cloned().ok_or(StoreError::RoomNotFound)
    }

    async fn update_room(&self, room_id: &str, patch: RoomPatch) -> Result<(), StoreError> {
        let mut rooms = self.rooms.write().await;
        let room = rooms.get_mut(room_id).ok_or(StoreError::RoomNotFound)?;
        patch.apply(room);
        Ok(())
    }

    async fn append_event(
        &self,
        room_id: &str,
        kind: &str,
        payload: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let mut feeds = self.feeds.write().await;
        let feed = feeds
            .entry(room_id.to_string())
            .or_insert_with(RoomFeed::new);

        // Store-assigned timestamp, clamped so the log stays monotone even if
        // the wall clock steps backwards between appends.
        let floor = feed.log.last().map(|record| record.timestamp).unwrap_or(0);
        let record = EventRecord {
            kind: kind.to_string(),
            payload,
            timestamp: epoch_millis().max(floor),
        };

        feed.log.push(record.clone());
        let _ = feed.latest_tx.send(Some(record));
        Ok(())
    }

    async fn subscribe_latest_event(
        &self,
        room_id: &str,
    ) -> Result<watch::Receiver<Option<EventRecord>>, StoreError> {
        // Subscribing to a not-yet-written path is valid, as with any
        // path-addressed realtime store; the feed is created on first touch.
        let mut feeds = self.feeds.write().await;
        let feed = feeds
            .entry(room_id.to_string())
            .or_insert_with(RoomFeed::new);
        Ok(feed.latest_tx.subscribe())
    }
}

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
