use async_trait::async_trait;
use types::{PlayedGame, TimeWindow};

use crate::error::StoreError;

/// Seam between the record store and the statistics engine: one call
/// returning a society's session snapshots inside a time window.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn played_games_in(
        &self,
        society_id: i64,
        window: &TimeWindow,
    ) -> Result<Vec<PlayedGame>, StoreError>;
}

/// Record source backed by a plain vector, for engine tests and offline
/// evaluation of already-fetched snapshots.
pub struct MemorySource {
    records: Vec<PlayedGame>,
}

impl MemorySource {
    pub fn new(records: Vec<PlayedGame>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    async fn played_games_in(
        &self,
        society_id: i64,
        window: &TimeWindow,
    ) -> Result<Vec<PlayedGame>, StoreError> {
        Ok(self
            .records
            .iter()
            .filter(|game| game.society_id == society_id && window.contains(game.played_at))
            .cloned()
            .collect())
    }
}
