// Game events and the single decode boundary between the loosely-typed
// payload maps held by the store and the typed union the engine works with.

use crate::domain::room::ScoreBoard;
use crate::domain::spawn::{DEFAULT_TTL_MS, Spawn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Rounds per match when a record carries no `maxRounds` field.
pub const DEFAULT_MAX_ROUNDS: u32 = 5;

/// Raw event record as stored in a room's append-only log. Immutable once
/// appended; only the latest record per room is guaranteed delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub payload: Map<String, Value>,
    // Store-assigned write timestamp (epoch millis).
    pub timestamp: u64,
}

/// Outcome of one resolved hit. `round` is the round prior to increment, the
/// one the hit target belonged to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub score: ScoreBoard,
    pub winner: String,
    pub round: u32,
    pub max_rounds: u32,
    pub spawn_id: String,
}

/// End-of-game summary emitted exactly once per match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndResult {
    pub champion: String,
    pub score: ScoreBoard,
    pub rounds_played: u32,
    pub max_rounds: u32,
}

/// Closed union of the events a room's log can carry.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Start {
        score: ScoreBoard,
        round: u32,
        max_rounds: u32,
    },
    Spawn(Spawn),
    Score(ScoreResult),
    End(EndResult),
}

impl GameEvent {
    /// Wire tag stored in the record's `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::Start { .. } => "START",
            GameEvent::Spawn(_) => "SPAWN",
            GameEvent::Score(_) => "SCORE",
            GameEvent::End(_) => "END",
        }
    }

    /// Encodes the typed event into the loose payload map the store keeps.
    pub fn to_payload(&self) -> Map<String, Value> {
        let mut payload = Map::new();
        match self {
            GameEvent::Start {
                score,
                round,
                max_rounds,
            } => {
                payload.insert("score".into(), score_value(score));
                payload.insert("round".into(), Value::from(*round));
                payload.insert("maxRounds".into(), Value::from(*max_rounds));
            }
            GameEvent::Spawn(spawn) => {
                payload.insert("spawnId".into(), Value::from(spawn.spawn_id.clone()));
                payload.insert("cx".into(), Value::from(spawn.cx));
                payload.insert("cy".into(), Value::from(spawn.cy));
                payload.insert("r".into(), Value::from(spawn.r));
                payload.insert("ttlMs".into(), Value::from(spawn.ttl_ms));
            }
            GameEvent::Score(result) => {
                payload.insert("score".into(), score_value(&result.score));
                payload.insert("winner".into(), Value::from(result.winner.clone()));
                payload.insert("round".into(), Value::from(result.round));
                payload.insert("maxRounds".into(), Value::from(result.max_rounds));
                payload.insert("spawnId".into(), Value::from(result.spawn_id.clone()));
            }
            GameEvent::End(end) => {
                payload.insert("champion".into(), Value::from(end.champion.clone()));
                payload.insert("score".into(), score_value(&end.score));
                payload.insert("roundsPlayed".into(), Value::from(end.rounds_played));
                payload.insert("maxRounds".into(), Value::from(end.max_rounds));
            }
        }
        payload
    }

    /// Decodes a stored record. Unknown types yield `None`; missing scalar
    /// fields fall back to safe defaults so reduction never fails. A spawn
    /// without identity or geometry is unusable and is dropped here.
    pub fn decode(record: &EventRecord) -> Option<GameEvent> {
        let payload = &record.payload;
        match record.kind.as_str() {
            "START" => Some(GameEvent::Start {
                score: score_field(payload),
                round: u32_field(payload, "round", 1),
                max_rounds: u32_field(payload, "maxRounds", DEFAULT_MAX_ROUNDS),
            }),
            "SPAWN" => {
                let spawn_id = payload.get("spawnId")?.as_str()?.to_string();
                let cx = payload.get("cx")?.as_f64()?;
                let cy = payload.get("cy")?.as_f64()?;
                let r = payload.get("r")?.as_f64()?;
                Some(GameEvent::Spawn(Spawn {
                    spawn_id,
                    cx,
                    cy,
                    r,
                    ttl_ms: u32_field(payload, "ttlMs", DEFAULT_TTL_MS),
                }))
            }
            "SCORE" => Some(GameEvent::Score(ScoreResult {
                score: score_field(payload),
                winner: str_field(payload, "winner"),
                round: u32_field(payload, "round", 0),
                max_rounds: u32_field(payload, "maxRounds", DEFAULT_MAX_ROUNDS),
                spawn_id: str_field(payload, "spawnId"),
            })),
            "END" => Some(GameEvent::End(EndResult {
                champion: str_field(payload, "champion"),
                score: score_field(payload),
                rounds_played: u32_field(payload, "roundsPlayed", 0),
                max_rounds: u32_field(payload, "maxRounds", DEFAULT_MAX_ROUNDS),
            })),
            _ => None,
        }
    }
}

fn score_value(score: &ScoreBoard) -> Value {
    Value::Object(
        score
            .iter()
            .map(|(name, &points)| (name.clone(), Value::from(points)))
            .collect(),
    )
}

fn score_field(payload: &Map<String, Value>) -> ScoreBoard {
    let Some(Value::Object(entries)) = payload.get("score") else {
        return ScoreBoard::new();
    };
    entries
        .iter()
        .map(|(name, value)| (name.clone(), value.as_u64().unwrap_or(0) as u32))
        .collect()
}

fn str_field(payload: &Map<String, Value>, key: &str) -> String {
    payload
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn u32_field(payload: &Map<String, Value>, key: &str, default: u32) -> u32 {
    payload
        .get(key)
        .and_then(Value::as_u64)
        .map(|n| n as u32)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: &str, payload: Map<String, Value>) -> EventRecord {
        EventRecord {
            kind: kind.to_string(),
            payload,
            timestamp: 0,
        }
    }

    #[test]
    fn encode_decode_keeps_score_event_intact() {
        let event = GameEvent::Score(ScoreResult {
            score: [("Ana".to_string(), 2), ("Beto".to_string(), 1)]
                .into_iter()
                .collect(),
            winner: "Ana".to_string(),
            round: 3,
            max_rounds: 5,
            spawn_id: "s-42".to_string(),
        });

        let decoded = GameEvent::decode(&record(event.kind(), event.to_payload()));
        assert_eq!(decoded, Some(event));
    }

    #[test]
    fn unknown_event_type_is_dropped() {
        assert_eq!(GameEvent::decode(&record("PING", Map::new())), None);
    }

    #[test]
    fn start_with_empty_payload_falls_back_to_defaults() {
        let decoded = GameEvent::decode(&record("START", Map::new()));
        assert_eq!(
            decoded,
            Some(GameEvent::Start {
                score: ScoreBoard::new(),
                round: 1,
                max_rounds: DEFAULT_MAX_ROUNDS,
            })
        );
    }

    #[test]
    fn score_with_missing_fields_defaults_per_field() {
        let mut payload = Map::new();
        payload.insert("winner".into(), Value::from("Ana"));

        let decoded = GameEvent::decode(&record("SCORE", payload));
        assert_eq!(
            decoded,
            Some(GameEvent::Score(ScoreResult {
                score: ScoreBoard::new(),
                winner: "Ana".to_string(),
                round: 0,
                max_rounds: DEFAULT_MAX_ROUNDS,
                spawn_id: String::new(),
            }))
        );
    }

    #[test]
    fn spawn_without_geometry_is_unusable() {
        let mut payload = Map::new();
        payload.insert("spawnId".into(), Value::from("s1"));
        payload.insert("cx".into(), Value::from(10.0));
        // cy and r missing.

        assert_eq!(GameEvent::decode(&record("SPAWN", payload)), None);
    }

    #[test]
    fn malformed_score_entries_default_to_zero() {
        let mut entries = Map::new();
        entries.insert("Ana".into(), Value::from("not-a-number"));
        let mut payload = Map::new();
        payload.insert("score".into(), Value::Object(entries));

        let Some(GameEvent::Score(result)) = GameEvent::decode(&record("SCORE", payload)) else {
            panic!("expected a score event");
        };
        assert_eq!(result.score.get("Ana"), Some(&0));
    }
}
