// Wire protocol DTOs and conversions for the public room API. The WebSocket
// event feed pushes raw `EventRecord` JSON (`{type, payload, timestamp}`),
// the same shape the store keeps.

use serde::{Deserialize, Serialize};

use crate::domain::event::ScoreResult;
use crate::domain::room::{Room, RoomPhase, ScoreBoard};

/// Join-or-create request; the code is a short human-entered string.
#[derive(Debug, Clone, Deserialize)]
pub struct JoinRoomRequest {
    pub code: String,
}

/// Room snapshot returned by join and lookup.
#[derive(Debug, Clone, Serialize)]
pub struct RoomDto {
    pub room_id: String,
    pub code: String,
    pub state: RoomPhase,
    pub score: ScoreBoard,
    pub round: u32,
    pub max_rounds: u32,
}

impl From<Room> for RoomDto {
    fn from(room: Room) -> Self {
        Self {
            room_id: room.id,
            code: room.code,
            state: room.phase,
            score: room.score,
            round: room.round,
            max_rounds: room.max_rounds,
        }
    }
}

/// Hit report for a spawn; the reporting client is trusted.
#[derive(Debug, Clone, Deserialize)]
pub struct HitRequest {
    pub spawn_id: String,
    pub player_name: String,
}

/// Outcome of one resolved hit as returned to the reporting client.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreResultDto {
    pub score: ScoreBoard,
    pub winner: String,
    pub round: u32,
    pub max_rounds: u32,
    pub spawn_id: String,
}

impl From<ScoreResult> for ScoreResultDto {
    fn from(result: ScoreResult) -> Self {
        Self {
            score: result.score,
            winner: result.winner,
            round: result.round,
            max_rounds: result.max_rounds,
            spawn_id: result.spawn_id,
        }
    }
}
