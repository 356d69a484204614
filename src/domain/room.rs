use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-player score table. A `BTreeMap` keeps iteration order stable so the
/// champion tie-break is deterministic (first maximal entry by name).
pub type ScoreBoard = BTreeMap<String, u32>;

/// Lifecycle of a room record in the shared store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomPhase {
    Lobby,
    Playing,
    Finished,
}

/// Authoritative shared record for one duel match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Room {
    // Opaque store-assigned identity.
    pub id: String,
    // Human-entered join code; dedup key at join time, not guaranteed unique.
    pub code: String,
    pub phase: RoomPhase,
    pub score: ScoreBoard,
    pub round: u32,
    pub max_rounds: u32,
    // Store-assigned creation timestamp (epoch millis).
    pub created_at: u64,
}

/// Partial update applied to a room record; unset fields keep their value.
#[derive(Debug, Clone, Default)]
pub struct RoomPatch {
    pub phase: Option<RoomPhase>,
    pub round: Option<u32>,
    pub score: Option<ScoreBoard>,
}

impl RoomPatch {
    pub fn apply(self, room: &mut Room) {
        if let Some(phase) = self.phase {
            room.phase = phase;
        }
        if let Some(round) = self.round {
            room.round = round;
        }
        if let Some(score) = self.score {
            room.score = score;
        }
    }
}

/// Returns the player with the strictly highest score, `None` for an empty
/// board. Ties resolve to the first maximal entry in iteration order, which
/// for a `BTreeMap` is the lexicographically smallest name.
pub fn champion(score: &ScoreBoard) -> Option<String> {
    let mut best: Option<(&String, u32)> = None;
    for (name, &points) in score {
        match best {
            Some((_, top)) if points <= top => {}
            _ => best = Some((name, points)),
        }
    }
    best.map(|(name, _)| name.clone())
}
