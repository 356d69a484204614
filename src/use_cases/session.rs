// Room session: binds one named player to one room and keeps the observable
// view current by folding the room's latest-event feed through the reducer.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::errors::GameError;
use crate::domain::event::GameEvent;
use crate::domain::ports::GameStore;
use crate::domain::room::Room;
use crate::use_cases::coordinator::{GameCoordinator, GameSettings};
use crate::use_cases::reducer::{ClientView, reduce};

/// Client-side handle for one player's participation in a room. Exposes the
/// presentation contract: push-updated view/error/busy observables plus the
/// join, start, and report-hit actions.
pub struct RoomSession<S> {
    coordinator: GameCoordinator<S>,
    store: Arc<S>,
    player_name: String,
    room_id: Option<String>,
    view_tx: watch::Sender<ClientView>,
    error_tx: watch::Sender<Option<String>>,
    busy_tx: watch::Sender<bool>,
    // Level-triggered stop flag for the current listener task. Setting it or
    // dropping the sender stops the listener; a signal raised between polls
    // is still observed on the next one.
    stop_tx: Option<watch::Sender<bool>>,
}

impl<S: GameStore + 'static> RoomSession<S> {
    pub fn new(store: Arc<S>, settings: GameSettings, player_name: String) -> Self {
        let (view_tx, _) = watch::channel(ClientView::default());
        let (error_tx, _) = watch::channel(None);
        let (busy_tx, _) = watch::channel(false);

        Self {
            coordinator: GameCoordinator::new(store.clone(), settings),
            store,
            player_name,
            room_id: None,
            view_tx,
            error_tx,
            busy_tx,
            stop_tx: None,
        }
    }

    /// Latest observed room view (snapshot, active spawn, round result,
    /// end-of-game summary).
    pub fn view(&self) -> watch::Receiver<ClientView> {
        self.view_tx.subscribe()
    }

    /// User-facing error message, if any.
    pub fn error(&self) -> watch::Receiver<Option<String>> {
        self.error_tx.subscribe()
    }

    /// True while a join/start action is in flight.
    pub fn busy(&self) -> watch::Receiver<bool> {
        self.busy_tx.subscribe()
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Joins (or creates) the room for `code` and starts observing its event
    /// feed. A second join replaces the previous subscription.
    pub async fn join(&mut self, code: &str) -> Result<Room, GameError> {
        self.busy_tx.send_replace(true);
        let result = self.coordinator.join_or_create_room(code).await;
        self.busy_tx.send_replace(false);

        let room = match result {
            Ok(room) => room,
            Err(e) => {
                self.error_tx
                    .send_replace(Some(format!("failed to join room: {e:?}")));
                return Err(e);
            }
        };

        // Stop a previous listener before re-seeding the view.
        self.stop_tx = None;
        self.room_id = Some(room.id.clone());
        self.view_tx.send_replace(ClientView {
            room_id: room.id.clone(),
            code: room.code.clone(),
            score: room.score.clone(),
            round: room.round,
            max_rounds: room.max_rounds,
            ..ClientView::default()
        });

        self.observe(&room.id).await?;
        info!(room_id = %room.id, player = %self.player_name, "session joined room");
        Ok(room)
    }

    /// Starts the game in the joined room. No-op before a successful join.
    pub async fn start_game(&self) -> Result<(), GameError> {
        let Some(room_id) = self.room_id.as_deref() else {
            return Ok(());
        };

        self.busy_tx.send_replace(true);
        let result = self.coordinator.start_game(room_id).await;
        self.busy_tx.send_replace(false);

        if let Err(e) = &result {
            self.error_tx
                .send_replace(Some(format!("failed to start game: {e:?}")));
        }
        result
    }

    /// Reports a hit on `spawn_id` for this session's player. Failures are
    /// logged but not surfaced on the error observable; the next event
    /// resynchronizes the view either way.
    pub async fn report_hit(&self, spawn_id: &str) -> Result<(), GameError> {
        let Some(room_id) = self.room_id.as_deref() else {
            return Ok(());
        };

        match self
            .coordinator
            .resolve_hit(room_id, spawn_id, &self.player_name)
            .await
        {
            Ok(result) => {
                // Immediate local feedback; the SCORE event confirms it.
                self.view_tx
                    .send_modify(|view| view.last_round = Some(result));
                Ok(())
            }
            Err(e) => {
                warn!(room_id, spawn_id, error = ?e, "hit report failed");
                Err(e)
            }
        }
    }

    /// Stops observing the room and releases the event subscription.
    pub fn leave(&mut self) {
        self.stop_tx = None;
        self.room_id = None;
        debug!(player = %self.player_name, "session left room");
    }

    async fn observe(&mut self, room_id: &str) -> Result<(), GameError> {
        let mut events = match self.store.subscribe_latest_event(room_id).await {
            Ok(rx) => rx,
            Err(e) => {
                self.error_tx
                    .send_replace(Some(format!("failed to observe room events: {e:?}")));
                return Err(e.into());
            }
        };

        let view_tx = self.view_tx.clone();
        let error_tx = self.error_tx.clone();
        let (stop_tx, mut stop_rx) = watch::channel(false);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    // Resolves once the flag is raised or the sender is
                    // dropped; either way the subscription is released.
                    _ = stop_rx.wait_for(|&stop| stop) => break,
                    changed = events.changed() => {
                        if changed.is_err() {
                            // Feed closed by the store; surface and stop, no
                            // auto-resubscribe.
                            error_tx.send_replace(Some(
                                "room event feed closed".to_string(),
                            ));
                            break;
                        }
                        let Some(record) = events.borrow_and_update().clone() else {
                            continue;
                        };
                        let Some(event) = GameEvent::decode(&record) else {
                            debug!(kind = %record.kind, "ignoring unknown event");
                            continue;
                        };
                        view_tx.send_modify(|view| *view = reduce(view, &event));
                    }
                }
            }
        });

        self.stop_tx = Some(stop_tx);
        Ok(())
    }
}
