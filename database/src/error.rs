use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store connection error: {0}")]
    Connection(String),

    #[error("Query execution error: {0}")]
    Query(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("cannot delete {entity} {id}: referenced by {referenced_by}")]
    ReferenceConflict {
        entity: &'static str,
        id: i64,
        referenced_by: &'static str,
    },

    #[error("society references unknown player {0}")]
    UnknownPlayer(i64),

    #[error("society references unknown board game {0}")]
    UnknownBoardGame(i64),

    #[error("board game {boardgame_id} is not the configured game of society {society_id}")]
    GameMismatch { society_id: i64, boardgame_id: i64 },

    #[error("played_at {0} is in the future")]
    FutureTimestamp(DateTime<Utc>),

    #[error("unknown win type: {0}")]
    UnknownWinType(String),
}
