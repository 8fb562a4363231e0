use sqlx::SqlitePool;

use crate::error::StoreError;

const TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS players (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        color TEXT NOT NULL UNIQUE,
        created_by INTEGER
    )",
    "CREATE TABLE IF NOT EXISTS boardgames (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        win_type TEXT NOT NULL,
        created_by INTEGER
    )",
    "CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        number INTEGER NOT NULL,
        name TEXT NOT NULL,
        boardgame_id INTEGER NOT NULL REFERENCES boardgames(id),
        created_by INTEGER
    )",
    "CREATE TABLE IF NOT EXISTS societies (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        player_ids JSON NOT NULL,
        boardgame_ids JSON NOT NULL,
        created_by INTEGER
    )",
    "CREATE TABLE IF NOT EXISTS played_games (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        society_id INTEGER NOT NULL REFERENCES societies(id),
        boardgame_id INTEGER NOT NULL REFERENCES boardgames(id),
        played_at TIMESTAMP NOT NULL,
        present_player_ids JSON NOT NULL,
        winner_id INTEGER,
        winner_points INTEGER,
        points JSON,
        winner_id_task INTEGER,
        task_id INTEGER REFERENCES tasks(id)
    )",
    "CREATE INDEX IF NOT EXISTS idx_played_games_society_played_at
        ON played_games (society_id, played_at)",
];

/// Creates the store's tables and indexes if missing. Idempotent; safe to
/// call on every startup.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), StoreError> {
    for ddl in TABLES {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
    }
    Ok(())
}
