// Game coordinator: the mutating workflows of a duel match. Whichever client
// performs an action runs these against the shared store; there is no single
// arbiter process.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::domain::errors::GameError;
use crate::domain::event::{EndResult, GameEvent, ScoreResult};
use crate::domain::ports::GameStore;
use crate::domain::room::{Room, RoomPatch, RoomPhase, ScoreBoard, champion};
use crate::domain::spawn::{SpawnBounds, generate_spawn};

/// Match configuration shared by every room this coordinator creates.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSettings {
    pub max_rounds: u32,
    pub bounds: SpawnBounds,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            max_rounds: crate::domain::event::DEFAULT_MAX_ROUNDS,
            bounds: SpawnBounds::default(),
        }
    }
}

/// Orchestrates join/create, start, and hit resolution over the store port.
pub struct GameCoordinator<S> {
    store: Arc<S>,
    settings: GameSettings,
}

impl<S: GameStore> GameCoordinator<S> {
    pub fn new(store: Arc<S>, settings: GameSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Finds the room with a matching code, creating a fresh lobby when none
    /// exists. Two clients racing on a new code can each create a room; the
    /// store has no find-or-create primitive and this engine does not add one.
    pub async fn join_or_create_room(&self, code: &str) -> Result<Room, GameError> {
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            return Err(GameError::EmptyRoomCode);
        }

        if let Some(room) = self.store.find_room_by_code(&code).await? {
            debug!(room_id = %room.id, %code, "joined existing room");
            return Ok(room);
        }

        let room = self.store.create_room(&code, self.settings.max_rounds).await?;
        info!(room_id = %room.id, %code, "created room");
        Ok(room)
    }

    /// Moves the room into play at round 1 and emits the opening START/SPAWN
    /// pair. Not idempotent: a second call re-initializes score and round and
    /// emits a duplicate pair; gating the "host starts" action is a UI concern.
    pub async fn start_game(&self, room_id: &str) -> Result<(), GameError> {
        self.store
            .update_room(
                room_id,
                RoomPatch {
                    phase: Some(RoomPhase::Playing),
                    round: Some(1),
                    score: Some(ScoreBoard::new()),
                },
            )
            .await?;

        self.emit(
            room_id,
            &GameEvent::Start {
                score: ScoreBoard::new(),
                round: 1,
                max_rounds: self.settings.max_rounds,
            },
        )
        .await;

        self.spawn_next(room_id).await;
        info!(room_id, "game started");
        Ok(())
    }

    /// Credits the reporting player with the current round, then either ends
    /// the game or advances to the next round with a fresh target. The hit is
    /// trusted as reported; no check that `spawn_id` is the active target.
    pub async fn resolve_hit(
        &self,
        room_id: &str,
        spawn_id: &str,
        player_name: &str,
    ) -> Result<ScoreResult, GameError> {
        if player_name.trim().is_empty() {
            return Err(GameError::EmptyPlayerName);
        }

        let room = self.store.get_room(room_id).await?;
        let mut score = room.score.clone();
        *score.entry(player_name.to_string()).or_insert(0) += 1;

        // Blind read-modify-write: a concurrent hit can lose an increment.
        self.store
            .update_room(
                room_id,
                RoomPatch {
                    score: Some(score.clone()),
                    ..RoomPatch::default()
                },
            )
            .await?;

        let result = ScoreResult {
            score: score.clone(),
            winner: player_name.to_string(),
            round: room.round,
            max_rounds: room.max_rounds,
            spawn_id: spawn_id.to_string(),
        };
        self.emit(room_id, &GameEvent::Score(result.clone())).await;

        if room.round >= room.max_rounds {
            let end = EndResult {
                champion: champion(&score).unwrap_or_default(),
                score,
                rounds_played: room.round,
                max_rounds: room.max_rounds,
            };
            self.emit(room_id, &GameEvent::End(end)).await;
            self.store
                .update_room(
                    room_id,
                    RoomPatch {
                        phase: Some(RoomPhase::Finished),
                        ..RoomPatch::default()
                    },
                )
                .await?;
            info!(room_id, winner = player_name, "game finished");
        } else {
            self.store
                .update_room(
                    room_id,
                    RoomPatch {
                        round: Some(room.round + 1),
                        ..RoomPatch::default()
                    },
                )
                .await?;
            self.spawn_next(room_id).await;
        }

        Ok(result)
    }

    async fn spawn_next(&self, room_id: &str) {
        let spawn = generate_spawn(&self.settings.bounds, &mut rand::rng());
        debug!(room_id, spawn_id = %spawn.spawn_id, "spawned target");
        self.emit(room_id, &GameEvent::Spawn(spawn)).await;
    }

    // Event appends are best-effort: a failed append is logged and the action
    // continues with whatever was already committed. A lost SPAWN leaves the
    // round stalled until a client re-triggers an action.
    async fn emit(&self, room_id: &str, event: &GameEvent) {
        if let Err(e) = self
            .store
            .append_event(room_id, event.kind(), event.to_payload())
            .await
        {
            error!(room_id, kind = event.kind(), error = ?e, "failed to append event");
        }
    }
}
