use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::win_type::WinType;

/// Result of a single session, shaped by the board game's win type.
/// Exactly one variant is live per record; `PlayedGame::apply_outcome`
/// clears the fields of every other variant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "win_type", rename_all = "snake_case")]
pub enum Outcome {
    Winner {
        winner_id: i64,
    },
    Points {
        winner_id: i64,
        winner_points: i64,
    },
    HighestPoints {
        points: BTreeMap<i64, i64>,
    },
    /// The task winner is independent of the game's per-session winner;
    /// it feeds the per-task statistic, not the per-player win count.
    Task {
        winner_id_task: i64,
        task_id: i64,
    },
}

impl Outcome {
    pub fn win_type(&self) -> WinType {
        match self {
            Outcome::Winner { .. } => WinType::Winner,
            Outcome::Points { .. } => WinType::Points,
            Outcome::HighestPoints { .. } => WinType::HighestPoints,
            Outcome::Task { .. } => WinType::Task,
        }
    }

    /// The player credited as this session's winner, if the variant has
    /// one. For `HighestPoints` the winner is derived from the scores.
    pub fn session_winner(&self) -> Option<i64> {
        match self {
            Outcome::Winner { winner_id } => Some(*winner_id),
            Outcome::Points { winner_id, .. } => Some(*winner_id),
            Outcome::HighestPoints { points } => derived_winner(points),
            Outcome::Task { .. } => None,
        }
    }
}

/// Entrant with the maximum score. Ties go to the lowest player id, so
/// the answer never depends on iteration order.
pub fn derived_winner(points: &BTreeMap<i64, i64>) -> Option<i64> {
    let max = points.values().copied().max()?;
    points
        .iter()
        .find(|(_, &score)| score == max)
        .map(|(&player_id, _)| player_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_winner_takes_maximum() {
        let points = BTreeMap::from([(1, 10), (2, 25), (3, 15)]);
        assert_eq!(derived_winner(&points), Some(2));
    }

    #[test]
    fn test_derived_winner_tie_goes_to_lowest_id() {
        let points = BTreeMap::from([(1, 10), (2, 15), (3, 15)]);
        assert_eq!(derived_winner(&points), Some(2));
    }

    #[test]
    fn test_derived_winner_empty_scores() {
        assert_eq!(derived_winner(&BTreeMap::new()), None);
    }

    #[test]
    fn test_session_winner_per_variant() {
        assert_eq!(Outcome::Winner { winner_id: 7 }.session_winner(), Some(7));
        assert_eq!(
            Outcome::Points {
                winner_id: 4,
                winner_points: 81
            }
            .session_winner(),
            Some(4)
        );
        assert_eq!(
            Outcome::Task {
                winner_id_task: 9,
                task_id: 2
            }
            .session_winner(),
            None
        );
    }
}
