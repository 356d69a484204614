// Domain-level errors for room/game workflows.

#[derive(Debug)]
pub enum StoreError {
    RoomNotFound,
    Unavailable(String),
}

#[derive(Debug)]
pub enum GameError {
    EmptyRoomCode,
    EmptyPlayerName,
    RoomNotFound,
    Store(StoreError),
}

impl From<StoreError> for GameError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::RoomNotFound => GameError::RoomNotFound,
            other => GameError::Store(other),
        }
    }
}
