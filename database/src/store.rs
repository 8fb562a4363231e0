use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use types::{BoardGame, Outcome, PlayedGame, Player, Society, Task, TimeWindow, WinType};

use crate::error::StoreError;
use crate::source::RecordSource;

/// SQLite-backed record store for players, board games, tasks, societies
/// and the played-game log. Holds a connection pool; all methods take
/// `&self` and are safe to call concurrently.
pub struct SqliteStore {
    pool: SqlitePool,
}

fn query_err(e: sqlx::Error) -> StoreError {
    StoreError::Query(e.to_string())
}

fn row_to_player(row: &SqliteRow) -> Player {
    Player {
        id: row.get("id"),
        name: row.get("name"),
        color: row.get("color"),
        created_by: row.get("created_by"),
    }
}

fn row_to_boardgame(row: &SqliteRow) -> Result<BoardGame, StoreError> {
    let win_type_str: String = row.get("win_type");
    let win_type = WinType::from_str(&win_type_str)
        .ok_or_else(|| StoreError::UnknownWinType(win_type_str))?;
    Ok(BoardGame {
        id: row.get("id"),
        name: row.get("name"),
        win_type,
        created_by: row.get("created_by"),
    })
}

fn row_to_task(row: &SqliteRow) -> Task {
    Task {
        id: row.get("id"),
        number: row.get("number"),
        name: row.get("name"),
        boardgame_id: row.get("boardgame_id"),
        created_by: row.get("created_by"),
    }
}

fn row_to_society(row: &SqliteRow) -> Result<Society, StoreError> {
    let player_ids: String = row.get("player_ids");
    let boardgame_ids: String = row.get("boardgame_ids");
    Ok(Society {
        id: row.get("id"),
        name: row.get("name"),
        player_ids: serde_json::from_str(&player_ids)?,
        boardgame_ids: serde_json::from_str(&boardgame_ids)?,
        created_by: row.get("created_by"),
    })
}

fn row_to_played_game(row: &SqliteRow) -> Result<PlayedGame, StoreError> {
    let present: String = row.get("present_player_ids");
    let points: Option<String> = row.get("points");
    Ok(PlayedGame {
        id: row.get("id"),
        society_id: row.get("society_id"),
        boardgame_id: row.get("boardgame_id"),
        played_at: row.get("played_at"),
        present_players: serde_json::from_str(&present)?,
        winner_id: row.get("winner_id"),
        winner_points: row.get("winner_points"),
        points: points.as_deref().map(serde_json::from_str).transpose()?,
        winner_id_task: row.get("winner_id_task"),
        task_id: row.get("task_id"),
    })
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // --- players ---

    pub async fn create_player(
        &self,
        name: &str,
        color: &str,
        created_by: Option<i64>,
    ) -> Result<Player, StoreError> {
        let result = sqlx::query("INSERT INTO players (name, color, created_by) VALUES (?, ?, ?)")
            .bind(name)
            .bind(color)
            .bind(created_by)
            .execute(&self.pool)
            .await
            .map_err(query_err)?;
        Ok(Player {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            color: color.to_string(),
            created_by,
        })
    }

    pub async fn players(&self) -> Result<Vec<Player>, StoreError> {
        let rows = sqlx::query("SELECT * FROM players ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(query_err)?;
        Ok(rows.iter().map(row_to_player).collect())
    }

    pub async fn player(&self, player_id: i64) -> Result<Option<Player>, StoreError> {
        let row = sqlx::query("SELECT * FROM players WHERE id = ?")
            .bind(player_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_err)?;
        Ok(row.as_ref().map(row_to_player))
    }

    pub async fn update_player(
        &self,
        player_id: i64,
        name: &str,
        color: &str,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE players SET name = ?, color = ? WHERE id = ?")
            .bind(name)
            .bind(color)
            .bind(player_id)
            .execute(&self.pool)
            .await
            .map_err(query_err)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "player",
                id: player_id,
            });
        }
        Ok(())
    }

    /// Deletion is blocked while any society lists the player.
    pub async fn delete_player(&self, player_id: i64) -> Result<(), StoreError> {
        for society in self.societies().await? {
            if society.has_player(player_id) {
                return Err(StoreError::ReferenceConflict {
                    entity: "player",
                    id: player_id,
                    referenced_by: "society",
                });
            }
        }
        sqlx::query("DELETE FROM players WHERE id = ?")
            .bind(player_id)
            .execute(&self.pool)
            .await
            .map_err(query_err)?;
        Ok(())
    }

    // --- board games ---

    pub async fn create_boardgame(
        &self,
        name: &str,
        win_type: WinType,
        created_by: Option<i64>,
    ) -> Result<BoardGame, StoreError> {
        let result =
            sqlx::query("INSERT INTO boardgames (name, win_type, created_by) VALUES (?, ?, ?)")
                .bind(name)
                .bind(win_type.as_str())
                .bind(created_by)
                .execute(&self.pool)
                .await
                .map_err(query_err)?;
        Ok(BoardGame {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            win_type,
            created_by,
        })
    }

    pub async fn boardgames(&self) -> Result<Vec<BoardGame>, StoreError> {
        let rows = sqlx::query("SELECT * FROM boardgames ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(query_err)?;
        rows.iter().map(row_to_boardgame).collect()
    }

    pub async fn boardgame(&self, boardgame_id: i64) -> Result<Option<BoardGame>, StoreError> {
        let row = sqlx::query("SELECT * FROM boardgames WHERE id = ?")
            .bind(boardgame_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_err)?;
        row.as_ref().map(row_to_boardgame).transpose()
    }

    pub async fn update_boardgame(
        &self,
        boardgame_id: i64,
        name: &str,
        win_type: WinType,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE boardgames SET name = ?, win_type = ? WHERE id = ?")
            .bind(name)
            .bind(win_type.as_str())
            .bind(boardgame_id)
            .execute(&self.pool)
            .await
            .map_err(query_err)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "boardgame",
                id: boardgame_id,
            });
        }
        Ok(())
    }

    /// Deletion is blocked while any society is configured with the game.
    pub async fn delete_boardgame(&self, boardgame_id: i64) -> Result<(), StoreError> {
        for society in self.societies().await? {
            if society.boardgame_ids.contains(&boardgame_id) {
                return Err(StoreError::ReferenceConflict {
                    entity: "boardgame",
                    id: boardgame_id,
                    referenced_by: "society",
                });
            }
        }
        sqlx::query("DELETE FROM boardgames WHERE id = ?")
            .bind(boardgame_id)
            .execute(&self.pool)
            .await
            .map_err(query_err)?;
        Ok(())
    }

    // --- tasks ---

    pub async fn create_task(
        &self,
        number: i64,
        name: &str,
        boardgame_id: i64,
        created_by: Option<i64>,
    ) -> Result<Task, StoreError> {
        let result = sqlx::query(
            "INSERT INTO tasks (number, name, boardgame_id, created_by) VALUES (?, ?, ?, ?)",
        )
        .bind(number)
        .bind(name)
        .bind(boardgame_id)
        .bind(created_by)
        .execute(&self.pool)
        .await
        .map_err(query_err)?;
        Ok(Task {
            id: result.last_insert_rowid(),
            number,
            name: name.to_string(),
            boardgame_id,
            created_by,
        })
    }

    pub async fn tasks(&self, boardgame_id: Option<i64>) -> Result<Vec<Task>, StoreError> {
        let rows = match boardgame_id {
            Some(game_id) => {
                sqlx::query("SELECT * FROM tasks WHERE boardgame_id = ? ORDER BY number, id")
                    .bind(game_id)
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                sqlx::query("SELECT * FROM tasks ORDER BY number, id")
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(query_err)?;
        Ok(rows.iter().map(row_to_task).collect())
    }

    pub async fn update_task(
        &self,
        task_id: i64,
        number: i64,
        name: &str,
        boardgame_id: i64,
    ) -> Result<(), StoreError> {
        let result =
            sqlx::query("UPDATE tasks SET number = ?, name = ?, boardgame_id = ? WHERE id = ?")
                .bind(number)
                .bind(name)
                .bind(boardgame_id)
                .bind(task_id)
                .execute(&self.pool)
                .await
                .map_err(query_err)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "task",
                id: task_id,
            });
        }
        Ok(())
    }

    /// Deletion is blocked while any played game references the task.
    pub async fn delete_task(&self, task_id: i64) -> Result<(), StoreError> {
        let referencing = sqlx::query("SELECT id FROM played_games WHERE task_id = ? LIMIT 1")
            .bind(task_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_err)?;
        if referencing.is_some() {
            return Err(StoreError::ReferenceConflict {
                entity: "task",
                id: task_id,
                referenced_by: "played game",
            });
        }
        sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(task_id)
            .execute(&self.pool)
            .await
            .map_err(query_err)?;
        Ok(())
    }

    // --- societies ---

    async fn assert_members_exist(
        &self,
        player_ids: &BTreeSet<i64>,
        boardgame_ids: &[i64],
    ) -> Result<(), StoreError> {
        for &player_id in player_ids {
            if self.player(player_id).await?.is_none() {
                return Err(StoreError::UnknownPlayer(player_id));
            }
        }
        for &boardgame_id in boardgame_ids {
            if self.boardgame(boardgame_id).await?.is_none() {
                return Err(StoreError::UnknownBoardGame(boardgame_id));
            }
        }
        Ok(())
    }

    pub async fn create_society(
        &self,
        name: &str,
        player_ids: &BTreeSet<i64>,
        boardgame_ids: &[i64],
        created_by: Option<i64>,
    ) -> Result<Society, StoreError> {
        self.assert_members_exist(player_ids, boardgame_ids).await?;
        let result = sqlx::query(
            "INSERT INTO societies (name, player_ids, boardgame_ids, created_by) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(serde_json::to_string(player_ids)?)
        .bind(serde_json::to_string(boardgame_ids)?)
        .bind(created_by)
        .execute(&self.pool)
        .await
        .map_err(query_err)?;
        Ok(Society {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            player_ids: player_ids.clone(),
            boardgame_ids: boardgame_ids.to_vec(),
            created_by,
        })
    }

    pub async fn societies(&self) -> Result<Vec<Society>, StoreError> {
        let rows = sqlx::query("SELECT * FROM societies ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(query_err)?;
        rows.iter().map(row_to_society).collect()
    }

    pub async fn society(&self, society_id: i64) -> Result<Option<Society>, StoreError> {
        let row = sqlx::query("SELECT * FROM societies WHERE id = ?")
            .bind(society_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_err)?;
        row.as_ref().map(row_to_society).transpose()
    }

    pub async fn update_society(
        &self,
        society_id: i64,
        name: &str,
        player_ids: &BTreeSet<i64>,
        boardgame_ids: &[i64],
    ) -> Result<(), StoreError> {
        self.assert_members_exist(player_ids, boardgame_ids).await?;
        let result = sqlx::query(
            "UPDATE societies SET name = ?, player_ids = ?, boardgame_ids = ? WHERE id = ?",
        )
        .bind(name)
        .bind(serde_json::to_string(player_ids)?)
        .bind(serde_json::to_string(boardgame_ids)?)
        .bind(society_id)
        .execute(&self.pool)
        .await
        .map_err(query_err)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "society",
                id: society_id,
            });
        }
        Ok(())
    }

    pub async fn delete_society(&self, society_id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM societies WHERE id = ?")
            .bind(society_id)
            .execute(&self.pool)
            .await
            .map_err(query_err)?;
        Ok(())
    }

    // --- played games ---

    /// Records a session. The board game must be the society's configured
    /// game and the timestamp must not be in the future.
    pub async fn record_played_game(
        &self,
        society_id: i64,
        boardgame_id: i64,
        played_at: DateTime<Utc>,
        present_players: &BTreeSet<i64>,
        outcome: &Outcome,
    ) -> Result<PlayedGame, StoreError> {
        let society = self
            .society(society_id)
            .await?
            .ok_or(StoreError::NotFound {
                entity: "society",
                id: society_id,
            })?;
        if society.primary_boardgame() != Some(boardgame_id) {
            return Err(StoreError::GameMismatch {
                society_id,
                boardgame_id,
            });
        }
        if played_at > Utc::now() {
            return Err(StoreError::FutureTimestamp(played_at));
        }

        let mut game = PlayedGame {
            id: 0,
            society_id,
            boardgame_id,
            played_at,
            present_players: present_players.clone(),
            winner_id: None,
            winner_points: None,
            points: None,
            winner_id_task: None,
            task_id: None,
        };
        game.apply_outcome(outcome);

        let result = sqlx::query(
            "INSERT INTO played_games
             (society_id, boardgame_id, played_at, present_player_ids,
              winner_id, winner_points, points, winner_id_task, task_id)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(society_id)
        .bind(boardgame_id)
        .bind(played_at)
        .bind(serde_json::to_string(&game.present_players)?)
        .bind(game.winner_id)
        .bind(game.winner_points)
        .bind(game.points.as_ref().map(serde_json::to_string).transpose()?)
        .bind(game.winner_id_task)
        .bind(game.task_id)
        .execute(&self.pool)
        .await
        .map_err(query_err)?;

        game.id = result.last_insert_rowid();
        Ok(game)
    }

    pub async fn played_game(&self, game_id: i64) -> Result<Option<PlayedGame>, StoreError> {
        let row = sqlx::query("SELECT * FROM played_games WHERE id = ?")
            .bind(game_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_err)?;
        row.as_ref().map(row_to_played_game).transpose()
    }

    /// Re-applies an outcome to an existing session. Switching win type
    /// clears the previous variant's fields.
    pub async fn update_played_game(
        &self,
        game_id: i64,
        played_at: Option<DateTime<Utc>>,
        present_players: Option<&BTreeSet<i64>>,
        outcome: &Outcome,
    ) -> Result<PlayedGame, StoreError> {
        let mut game = self
            .played_game(game_id)
            .await?
            .ok_or(StoreError::NotFound {
                entity: "played game",
                id: game_id,
            })?;
        if let Some(at) = played_at {
            if at > Utc::now() {
                return Err(StoreError::FutureTimestamp(at));
            }
            game.played_at = at;
        }
        if let Some(present) = present_players {
            game.present_players = present.clone();
        }
        game.apply_outcome(outcome);

        sqlx::query(
            "UPDATE played_games
             SET played_at = ?, present_player_ids = ?, winner_id = ?,
                 winner_points = ?, points = ?, winner_id_task = ?, task_id = ?
             WHERE id = ?",
        )
        .bind(game.played_at)
        .bind(serde_json::to_string(&game.present_players)?)
        .bind(game.winner_id)
        .bind(game.winner_points)
        .bind(game.points.as_ref().map(serde_json::to_string).transpose()?)
        .bind(game.winner_id_task)
        .bind(game.task_id)
        .bind(game_id)
        .execute(&self.pool)
        .await
        .map_err(query_err)?;

        Ok(game)
    }

    pub async fn delete_played_game(&self, game_id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM played_games WHERE id = ?")
            .bind(game_id)
            .execute(&self.pool)
            .await
            .map_err(query_err)?;
        Ok(())
    }

    /// Full session log for a society, newest first.
    pub async fn played_games(&self, society_id: i64) -> Result<Vec<PlayedGame>, StoreError> {
        let rows = sqlx::query(
            "SELECT * FROM played_games WHERE society_id = ? ORDER BY played_at DESC, id DESC",
        )
        .bind(society_id)
        .fetch_all(&self.pool)
        .await
        .map_err(query_err)?;
        rows.iter().map(row_to_played_game).collect()
    }

    pub async fn played_games_page(
        &self,
        society_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<PlayedGame>, StoreError> {
        let rows = sqlx::query(
            "SELECT * FROM played_games WHERE society_id = ?
             ORDER BY played_at DESC, id DESC LIMIT ? OFFSET ?",
        )
        .bind(society_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(query_err)?;
        rows.iter().map(row_to_played_game).collect()
    }

    pub async fn played_games_count(&self, society_id: i64) -> Result<i64, StoreError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM played_games WHERE society_id = ?")
            .bind(society_id)
            .fetch_one(&self.pool)
            .await
            .map_err(query_err)
    }
}

#[async_trait]
impl RecordSource for SqliteStore {
    /// Windowed snapshot fetch for the statistics engine. Rows whose JSON
    /// columns no longer decode are skipped with a warning rather than
    /// failing the whole aggregation.
    async fn played_games_in(
        &self,
        society_id: i64,
        window: &TimeWindow,
    ) -> Result<Vec<PlayedGame>, StoreError> {
        let rows = match (window.from, window.to) {
            (Some(from), Some(to)) => {
                sqlx::query(
                    "SELECT * FROM played_games
                     WHERE society_id = ? AND played_at >= ? AND played_at <= ?
                     ORDER BY played_at, id",
                )
                .bind(society_id)
                .bind(from)
                .bind(to)
                .fetch_all(&self.pool)
                .await
            }
            (Some(from), None) => {
                sqlx::query(
                    "SELECT * FROM played_games
                     WHERE society_id = ? AND played_at >= ?
                     ORDER BY played_at, id",
                )
                .bind(society_id)
                .bind(from)
                .fetch_all(&self.pool)
                .await
            }
            (None, Some(to)) => {
                sqlx::query(
                    "SELECT * FROM played_games
                     WHERE society_id = ? AND played_at <= ?
                     ORDER BY played_at, id",
                )
                .bind(society_id)
                .bind(to)
                .fetch_all(&self.pool)
                .await
            }
            (None, None) => {
                sqlx::query(
                    "SELECT * FROM played_games WHERE society_id = ? ORDER BY played_at, id",
                )
                .bind(society_id)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(query_err)?;

        let mut games = Vec::with_capacity(rows.len());
        for row in &rows {
            match row_to_played_game(row) {
                Ok(game) => games.push(game),
                Err(err) => {
                    let game_id: i64 = row.get("id");
                    tracing::warn!("skipping undecodable played_game row {game_id}: {err}");
                }
            }
        }
        Ok(games)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::init_schema;
    use chrono::TimeZone;

    async fn setup_test_store() -> SqliteStore {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create test pool");
        init_schema(&pool).await.expect("Failed to create schema");
        SqliteStore::new(pool)
    }

    async fn seed_society(store: &SqliteStore) -> (Society, BoardGame, Vec<Player>) {
        let alice = store.create_player("Alice", "#ff0000", None).await.unwrap();
        let bob = store.create_player("Bob", "#00ff00", None).await.unwrap();
        let game = store
            .create_boardgame("Carcassonne", WinType::Winner, None)
            .await
            .unwrap();
        let society = store
            .create_society(
                "Tuesday Club",
                &BTreeSet::from([alice.id, bob.id]),
                &[game.id],
                None,
            )
            .await
            .unwrap();
        (society, game, vec![alice, bob])
    }

    fn day(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 20, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_player_crud_round_trip() {
        let store = setup_test_store().await;
        let player = store.create_player("Alice", "#ff0000", None).await.unwrap();
        assert!(player.id > 0);

        store
            .update_player(player.id, "Alicia", "#ff0001")
            .await
            .unwrap();
        let fetched = store.player(player.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Alicia");
        assert_eq!(fetched.color, "#ff0001");

        store.delete_player(player.id).await.unwrap();
        assert!(store.player(player.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_player_is_not_found() {
        let store = setup_test_store().await;
        let err = store.update_player(99, "Nobody", "#000000").await;
        assert!(matches!(
            err,
            Err(StoreError::NotFound { entity: "player", id: 99 })
        ));
    }

    #[tokio::test]
    async fn test_delete_player_blocked_by_society() {
        let store = setup_test_store().await;
        let (_, _, players) = seed_society(&store).await;

        let err = store.delete_player(players[0].id).await;
        assert!(matches!(err, Err(StoreError::ReferenceConflict { .. })));
        // The record store is unchanged.
        assert!(store.player(players[0].id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_boardgame_blocked_by_society() {
        let store = setup_test_store().await;
        let (_, game, _) = seed_society(&store).await;

        let err = store.delete_boardgame(game.id).await;
        assert!(matches!(err, Err(StoreError::ReferenceConflict { .. })));
        assert!(store.boardgame(game.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_task_blocked_by_played_game() {
        let store = setup_test_store().await;
        let alice = store.create_player("Alice", "#ff0000", None).await.unwrap();
        let game = store
            .create_boardgame("Heist Night", WinType::Task, None)
            .await
            .unwrap();
        let task = store.create_task(1, "Open the vault", game.id, None).await.unwrap();
        let society = store
            .create_society("Crew", &BTreeSet::from([alice.id]), &[game.id], None)
            .await
            .unwrap();
        store
            .record_played_game(
                society.id,
                game.id,
                day(5),
                &BTreeSet::from([alice.id]),
                &Outcome::Task {
                    winner_id_task: alice.id,
                    task_id: task.id,
                },
            )
            .await
            .unwrap();

        let err = store.delete_task(task.id).await;
        assert!(matches!(err, Err(StoreError::ReferenceConflict { .. })));
        assert_eq!(store.tasks(Some(game.id)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_society_rejects_unknown_members() {
        let store = setup_test_store().await;
        let game = store
            .create_boardgame("Carcassonne", WinType::Winner, None)
            .await
            .unwrap();

        let err = store
            .create_society("Ghosts", &BTreeSet::from([42]), &[game.id], None)
            .await;
        assert!(matches!(err, Err(StoreError::UnknownPlayer(42))));

        let alice = store.create_player("Alice", "#ff0000", None).await.unwrap();
        let err = store
            .create_society("Ghosts", &BTreeSet::from([alice.id]), &[99], None)
            .await;
        assert!(matches!(err, Err(StoreError::UnknownBoardGame(99))));
    }

    #[tokio::test]
    async fn test_record_rejects_mismatched_boardgame() {
        let store = setup_test_store().await;
        let (society, _, players) = seed_society(&store).await;
        let other_game = store
            .create_boardgame("Azul", WinType::Points, None)
            .await
            .unwrap();

        let err = store
            .record_played_game(
                society.id,
                other_game.id,
                day(5),
                &BTreeSet::from([players[0].id]),
                &Outcome::Winner {
                    winner_id: players[0].id,
                },
            )
            .await;
        assert!(matches!(err, Err(StoreError::GameMismatch { .. })));
    }

    #[tokio::test]
    async fn test_record_rejects_future_timestamp() {
        let store = setup_test_store().await;
        let (society, game, players) = seed_society(&store).await;

        let err = store
            .record_played_game(
                society.id,
                game.id,
                Utc::now() + chrono::Duration::days(1),
                &BTreeSet::from([players[0].id]),
                &Outcome::Winner {
                    winner_id: players[0].id,
                },
            )
            .await;
        assert!(matches!(err, Err(StoreError::FutureTimestamp(_))));
    }

    #[tokio::test]
    async fn test_update_switching_win_type_resets_fields() {
        let store = setup_test_store().await;
        let (society, game, players) = seed_society(&store).await;
        let recorded = store
            .record_played_game(
                society.id,
                game.id,
                day(5),
                &BTreeSet::from([players[0].id, players[1].id]),
                &Outcome::Points {
                    winner_id: players[0].id,
                    winner_points: 73,
                },
            )
            .await
            .unwrap();
        assert_eq!(recorded.winner_points, Some(73));

        let task = store.create_task(3, "Longest road", game.id, None).await.unwrap();
        let updated = store
            .update_played_game(
                recorded.id,
                None,
                None,
                &Outcome::Task {
                    winner_id_task: players[1].id,
                    task_id: task.id,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.winner_id, None);
        assert_eq!(updated.winner_points, None);
        assert_eq!(updated.winner_id_task, Some(players[1].id));

        let persisted = store.played_game(recorded.id).await.unwrap().unwrap();
        assert_eq!(persisted, updated);
    }

    #[tokio::test]
    async fn test_windowed_fetch_filters_by_played_at() {
        let store = setup_test_store().await;
        let (society, game, players) = seed_society(&store).await;
        for game_day in [1, 5, 9] {
            store
                .record_played_game(
                    society.id,
                    game.id,
                    day(game_day),
                    &BTreeSet::from([players[0].id]),
                    &Outcome::Winner {
                        winner_id: players[0].id,
                    },
                )
                .await
                .unwrap();
        }

        let window = TimeWindow::between(day(2), day(9));
        let games = store.played_games_in(society.id, &window).await.unwrap();
        assert_eq!(games.len(), 2);
        assert!(games.iter().all(|g| window.contains(g.played_at)));

        let all = store
            .played_games_in(society.id, &TimeWindow::unbounded())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_windowed_fetch_skips_undecodable_rows() {
        let store = setup_test_store().await;
        let (society, game, players) = seed_society(&store).await;
        store
            .record_played_game(
                society.id,
                game.id,
                day(1),
                &BTreeSet::from([players[0].id]),
                &Outcome::Winner {
                    winner_id: players[0].id,
                },
            )
            .await
            .unwrap();
        // A drifted row with an unparseable player set.
        sqlx::query(
            "INSERT INTO played_games (society_id, boardgame_id, played_at, present_player_ids)
             VALUES (?, ?, ?, ?)",
        )
        .bind(society.id)
        .bind(game.id)
        .bind(day(2))
        .bind("1,2,3")
        .execute(store.pool())
        .await
        .unwrap();

        let games = store
            .played_games_in(society.id, &TimeWindow::unbounded())
            .await
            .unwrap();
        assert_eq!(games.len(), 1);
    }

    #[tokio::test]
    async fn test_pagination_and_count() {
        let store = setup_test_store().await;
        let (society, game, players) = seed_society(&store).await;
        for game_day in 1..=5 {
            store
                .record_played_game(
                    society.id,
                    game.id,
                    day(game_day),
                    &BTreeSet::from([players[0].id]),
                    &Outcome::Winner {
                        winner_id: players[0].id,
                    },
                )
                .await
                .unwrap();
        }

        assert_eq!(store.played_games_count(society.id).await.unwrap(), 5);

        let page = store.played_games_page(society.id, 0, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        // Newest first.
        assert_eq!(page[0].played_at, day(5));
        assert_eq!(page[1].played_at, day(4));

        let last_page = store.played_games_page(society.id, 4, 2).await.unwrap();
        assert_eq!(last_page.len(), 1);
        assert_eq!(last_page[0].played_at, day(1));
    }
}
