use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::win_type::WinType;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardGame {
    pub id: i64,
    pub name: String,
    pub win_type: WinType,
    pub created_by: Option<i64>,
}

impl Display for BoardGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.name, self.win_type)
    }
}
