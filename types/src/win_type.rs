use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Scoring discipline of a board game. Determines which outcome fields a
/// played-game record carries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinType {
    Winner,
    Points,
    HighestPoints,
    Task,
}

impl WinType {
    pub fn as_str(self) -> &'static str {
        match self {
            WinType::Winner => "winner",
            WinType::Points => "points",
            WinType::HighestPoints => "highest_points",
            WinType::Task => "task",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "winner" => Some(WinType::Winner),
            "points" => Some(WinType::Points),
            "highest_points" => Some(WinType::HighestPoints),
            "task" => Some(WinType::Task),
            _ => None,
        }
    }
}

impl Display for WinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
