// Client reducer: a pure fold of incoming events into the state the
// presentation layer observes. Delivery is latest-event-only, so every event
// fully specifies the new observable state rather than a delta; a skipped
// intermediate event only delays convergence.

use crate::domain::event::{EndResult, GameEvent, ScoreResult};
use crate::domain::room::ScoreBoard;
use crate::domain::spawn::Spawn;

/// Client-local observable snapshot of one room.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientView {
    pub room_id: String,
    pub code: String,
    pub score: ScoreBoard,
    pub round: u32,
    pub max_rounds: u32,
    pub game_started: bool,
    pub game_ended: bool,
    pub champion: Option<String>,
    // At most one active target at a time.
    pub active_spawn: Option<Spawn>,
    // Transient result of the most recently resolved round.
    pub last_round: Option<ScoreResult>,
    // Terminal summary once the game ends.
    pub summary: Option<EndResult>,
}

/// Folds one event into the next view. Pure: same `(view, event)` pair, same
/// result, independent of anything else.
pub fn reduce(view: &ClientView, event: &GameEvent) -> ClientView {
    let mut next = view.clone();
    match event {
        GameEvent::Start {
            score,
            round,
            max_rounds,
        } => {
            next.score = score.clone();
            next.round = *round;
            next.max_rounds = *max_rounds;
            next.game_started = true;
            next.game_ended = false;
        }
        GameEvent::Spawn(spawn) => {
            next.active_spawn = Some(spawn.clone());
        }
        GameEvent::Score(result) => {
            next.score = result.score.clone();
            next.round = result.round;
            next.active_spawn = None;
            next.last_round = Some(result.clone());
        }
        GameEvent::End(end) => {
            next.score = end.score.clone();
            next.game_ended = true;
            next.champion = Some(end.champion.clone());
            next.active_spawn = None;
            next.summary = Some(end.clone());
        }
    }
    next
}
