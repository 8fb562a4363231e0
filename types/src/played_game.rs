use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::outcome::{derived_winner, Outcome};

/// One recorded session, as stored. Outcome fields are materialized per
/// win type; the fields belonging to other variants stay `None`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayedGame {
    pub id: i64,
    pub society_id: i64,
    pub boardgame_id: i64,
    pub played_at: DateTime<Utc>,
    pub present_players: BTreeSet<i64>,
    pub winner_id: Option<i64>,
    pub winner_points: Option<i64>,
    pub points: Option<BTreeMap<i64, i64>>,
    pub winner_id_task: Option<i64>,
    pub task_id: Option<i64>,
}

impl PlayedGame {
    /// Clears every outcome field, then populates the ones belonging to
    /// the given outcome. Switching win type on edit must not leave the
    /// previous variant's fields behind.
    pub fn apply_outcome(&mut self, outcome: &Outcome) {
        self.winner_id = None;
        self.winner_points = None;
        self.points = None;
        self.winner_id_task = None;
        self.task_id = None;

        match outcome {
            Outcome::Winner { winner_id } => {
                self.winner_id = Some(*winner_id);
            }
            Outcome::Points {
                winner_id,
                winner_points,
            } => {
                self.winner_id = Some(*winner_id);
                self.winner_points = Some(*winner_points);
            }
            Outcome::HighestPoints { points } => {
                self.winner_id = derived_winner(points);
                self.points = Some(points.clone());
            }
            Outcome::Task {
                winner_id_task,
                task_id,
            } => {
                self.winner_id_task = Some(*winner_id_task);
                self.task_id = Some(*task_id);
            }
        }
    }

    /// Players credited with a win by this session. The game winner and
    /// the task winner are independent credits; a single record may carry
    /// both, and then both players are credited.
    pub fn winners(&self) -> impl Iterator<Item = i64> + '_ {
        self.winner_id.into_iter().chain(self.winner_id_task)
    }
}

impl Display for PlayedGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "game {} (society {}) at {} present: [{}]",
            self.id,
            self.society_id,
            self.played_at,
            self.present_players.iter().join(", ")
        )
    }
}
