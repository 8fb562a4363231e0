use serde::{Deserialize, Serialize};

/// A numbered objective belonging to one board game. Numbers are
/// advisory labels; nothing enforces their uniqueness.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub number: i64,
    pub name: String,
    pub boardgame_id: i64,
    pub created_by: Option<i64>,
}
