use crate::domain::errors::GameError;
use crate::domain::event::EventRecord;
use crate::domain::ports::GameStore;
use crate::interface_adapters::http::ErrorResponse;
use crate::interface_adapters::protocol::{HitRequest, JoinRoomRequest, RoomDto, ScoreResultDto};
use crate::interface_adapters::state::AppState;

use axum::{
    Json,
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{Sink, SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error};

/// POST /rooms — join the room with the given code, creating it if absent.
pub async fn join_room_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<JoinRoomRequest>,
) -> Response {
    match state.coordinator.join_or_create_room(&payload.code).await {
        Ok(room) => (StatusCode::OK, Json(RoomDto::from(room))).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /rooms/{room_id} — current room snapshot.
pub async fn get_room_handler(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Response {
    match state.store.get_room(&room_id).await {
        Ok(room) => (StatusCode::OK, Json(RoomDto::from(room))).into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// POST /rooms/{room_id}/start — move the room into play.
pub async fn start_game_handler(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Response {
    match state.coordinator.start_game(&room_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /rooms/{room_id}/hits — resolve a reported hit.
pub async fn report_hit_handler(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Json(payload): Json<HitRequest>,
) -> Response {
    match state
        .coordinator
        .resolve_hit(&room_id, &payload.spawn_id, &payload.player_name)
        .await
    {
        Ok(result) => (StatusCode::OK, Json(ScoreResultDto::from(result))).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /rooms/{room_id}/events — WebSocket feed of the room's latest event.
/// Latest-only semantics: a slow client skips superseded records.
pub async fn room_events_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Response {
    // Reject unknown rooms before upgrading; the feed itself never 404s.
    if let Err(e) = state.store.get_room(&room_id).await {
        return error_response(e.into());
    }

    // Subscribe before the upgrade completes so no event is missed.
    let events = match state.store.subscribe_latest_event(&room_id).await {
        Ok(rx) => rx,
        Err(e) => return error_response(e.into()),
    };

    ws.on_upgrade(move |socket| stream_events(socket, events))
}

async fn stream_events(socket: WebSocket, mut events: watch::Receiver<Option<EventRecord>>) {
    let (mut sink, mut stream) = socket.split();

    // Push the current latest record first so late subscribers resync.
    let current = events.borrow_and_update().clone();
    if let Some(record) = current {
        if send_record(&mut sink, &record).await.is_err() {
            return;
        }
    }

    loop {
        tokio::select! {
            changed = events.changed() => {
                if changed.is_err() {
                    // Store dropped the feed; tear the subscription down.
                    debug!("event feed closed by store");
                    break;
                }
                let Some(record) = events.borrow_and_update().clone() else {
                    continue;
                };
                if send_record(&mut sink, &record).await.is_err() {
                    break;
                }
            }
            msg = stream.next() => {
                match msg {
                    None | Some(Ok(Message::Close(_))) => break,
                    Some(Err(e)) => {
                        debug!(error = ?e, "event feed socket error");
                        break;
                    }
                    // The feed is one-way; ignore client frames.
                    Some(Ok(_)) => {}
                }
            }
        }
    }
}

async fn send_record(
    sink: &mut (impl Sink<Message, Error = axum::Error> + Unpin),
    record: &EventRecord,
) -> Result<(), ()> {
    let txt = match serde_json::to_string(record) {
        Ok(txt) => txt,
        Err(e) => {
            error!(error = ?e, "failed to serialize event record");
            return Ok(());
        }
    };
    sink.send(Message::Text(txt.into())).await.map_err(|e| {
        debug!(error = ?e, "event feed client gone");
    })
}

fn error_response(e: GameError) -> Response {
    let (status, message) = match e {
        GameError::EmptyRoomCode => (StatusCode::BAD_REQUEST, "room code is required"),
        GameError::EmptyPlayerName => (StatusCode::BAD_REQUEST, "player name is required"),
        GameError::RoomNotFound => (StatusCode::NOT_FOUND, "room not found"),
        GameError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "store unavailable"),
    };

    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}
