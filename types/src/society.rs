use std::collections::BTreeSet;
use std::fmt::Display;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// A named group of players sharing a board game and one running history
/// of played sessions. Member order is irrelevant; every id must
/// reference an existing player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Society {
    pub id: i64,
    pub name: String,
    pub player_ids: BTreeSet<i64>,
    pub boardgame_ids: Vec<i64>,
    pub created_by: Option<i64>,
}

impl Society {
    /// The society's configured game. Current usage is exactly one board
    /// game per society; extra entries are ignored by the session log.
    pub fn primary_boardgame(&self) -> Option<i64> {
        self.boardgame_ids.first().copied()
    }

    pub fn has_player(&self, player_id: i64) -> bool {
        self.player_ids.contains(&player_id)
    }
}

impl Display for Society {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (players: [{}])",
            self.name,
            self.player_ids.iter().join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_boardgame_is_first_entry() {
        let society = Society {
            id: 1,
            name: "Tuesday Club".to_string(),
            player_ids: BTreeSet::from([1, 2, 3]),
            boardgame_ids: vec![5],
            created_by: None,
        };
        assert_eq!(society.primary_boardgame(), Some(5));
        assert!(society.has_player(2));
        assert!(!society.has_player(9));
    }

    #[test]
    fn test_primary_boardgame_empty() {
        let society = Society {
            id: 1,
            name: "Empty".to_string(),
            player_ids: BTreeSet::new(),
            boardgame_ids: vec![],
            created_by: None,
        };
        assert_eq!(society.primary_boardgame(), None);
    }
}
