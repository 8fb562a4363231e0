use std::collections::BTreeMap;

use database::{RecordSource, StoreError};
use serde::Serialize;
use types::{PlayedGame, TimeWindow};

use crate::aggregate;
use crate::calendar::{self, DayBucket, MonthBucket, WeekBucket, YearBucket};

/// Stateless statistics front-end over a record source: each call fetches
/// one point-in-time snapshot and runs pure aggregation over it. Safe to
/// share across concurrent requests.
pub struct StatsService<S> {
    source: S,
}

/// Every statistic computed against the same snapshot, ready for
/// serialization or chart-label lookup.
#[derive(Debug, Serialize)]
pub struct StatsSummary {
    pub most_wins: BTreeMap<i64, u64>,
    pub most_points: BTreeMap<i64, i64>,
    pub most_won_task: BTreeMap<i64, u64>,
    pub highest_points_per_game: BTreeMap<i64, i64>,
    pub most_popular_days: BTreeMap<u32, u64>,
    pub longest_win_streak: BTreeMap<i64, u64>,
    pub games_played: BTreeMap<i64, u64>,
    pub win_ratios: BTreeMap<i64, f64>,
}

/// Buckets offered to the drill-down selectors.
#[derive(Debug, Serialize)]
pub struct AvailablePeriods {
    pub years: Vec<YearBucket>,
    pub months: Vec<MonthBucket>,
    pub weeks: Vec<WeekBucket>,
    pub days: Vec<DayBucket>,
}

impl<S: RecordSource> StatsService<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    async fn snapshot(
        &self,
        society_id: i64,
        window: &TimeWindow,
    ) -> Result<Vec<PlayedGame>, StoreError> {
        self.source.played_games_in(society_id, window).await
    }

    pub async fn most_wins(
        &self,
        society_id: i64,
        window: &TimeWindow,
    ) -> Result<BTreeMap<i64, u64>, StoreError> {
        Ok(aggregate::most_wins(&self.snapshot(society_id, window).await?))
    }

    pub async fn most_points(
        &self,
        society_id: i64,
        window: &TimeWindow,
    ) -> Result<BTreeMap<i64, i64>, StoreError> {
        Ok(aggregate::most_points(
            &self.snapshot(society_id, window).await?,
        ))
    }

    pub async fn most_won_task(
        &self,
        society_id: i64,
        window: &TimeWindow,
    ) -> Result<BTreeMap<i64, u64>, StoreError> {
        Ok(aggregate::most_won_task(
            &self.snapshot(society_id, window).await?,
        ))
    }

    pub async fn highest_points_per_game(
        &self,
        society_id: i64,
        window: &TimeWindow,
    ) -> Result<BTreeMap<i64, i64>, StoreError> {
        Ok(aggregate::highest_points_per_game(
            &self.snapshot(society_id, window).await?,
        ))
    }

    pub async fn most_popular_days(
        &self,
        society_id: i64,
        window: &TimeWindow,
    ) -> Result<BTreeMap<u32, u64>, StoreError> {
        Ok(aggregate::most_popular_days(
            &self.snapshot(society_id, window).await?,
        ))
    }

    pub async fn longest_win_streak(
        &self,
        society_id: i64,
        window: &TimeWindow,
    ) -> Result<BTreeMap<i64, u64>, StoreError> {
        Ok(aggregate::longest_win_streak(
            &self.snapshot(society_id, window).await?,
        ))
    }

    pub async fn games_played(
        &self,
        society_id: i64,
        window: &TimeWindow,
    ) -> Result<BTreeMap<i64, u64>, StoreError> {
        Ok(aggregate::games_played(
            &self.snapshot(society_id, window).await?,
        ))
    }

    pub async fn win_ratios(
        &self,
        society_id: i64,
        window: &TimeWindow,
    ) -> Result<BTreeMap<i64, f64>, StoreError> {
        let games = self.snapshot(society_id, window).await?;
        Ok(aggregate::win_ratios(
            &aggregate::most_wins(&games),
            &aggregate::games_played(&games),
        ))
    }

    /// One fetch, every statistic computed against the same record set.
    pub async fn summary(
        &self,
        society_id: i64,
        window: &TimeWindow,
    ) -> Result<StatsSummary, StoreError> {
        let games = self.snapshot(society_id, window).await?;
        let most_wins = aggregate::most_wins(&games);
        let games_played = aggregate::games_played(&games);
        let win_ratios = aggregate::win_ratios(&most_wins, &games_played);
        Ok(StatsSummary {
            most_points: aggregate::most_points(&games),
            most_won_task: aggregate::most_won_task(&games),
            highest_points_per_game: aggregate::highest_points_per_game(&games),
            most_popular_days: aggregate::most_popular_days(&games),
            longest_win_streak: aggregate::longest_win_streak(&games),
            most_wins,
            games_played,
            win_ratios,
        })
    }

    /// Buckets for cascading selectors: years always, months and weeks
    /// once a year is chosen, days once a month is chosen too.
    pub async fn available_periods(
        &self,
        society_id: i64,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Result<AvailablePeriods, StoreError> {
        let games = self
            .snapshot(society_id, &TimeWindow::unbounded())
            .await?;
        Ok(AvailablePeriods {
            years: calendar::years_with_count(&games),
            months: match year {
                Some(y) => calendar::months_with_count(&games, Some(y)),
                None => Vec::new(),
            },
            weeks: match year {
                Some(y) => calendar::weeks_with_count(&games, Some(y)),
                None => Vec::new(),
            },
            days: match (year, month) {
                (Some(y), Some(m)) => calendar::days_with_count(&games, Some(y), Some(m)),
                _ => Vec::new(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use database::MemorySource;
    use std::collections::BTreeSet;

    fn won_session(id: i64, society_id: i64, day: u32, winner: i64) -> PlayedGame {
        PlayedGame {
            id,
            society_id,
            boardgame_id: 1,
            played_at: Utc.with_ymd_and_hms(2024, 1, day, 20, 0, 0).unwrap(),
            present_players: BTreeSet::from([1, 2]),
            winner_id: Some(winner),
            winner_points: None,
            points: None,
            winner_id_task: None,
            task_id: None,
        }
    }

    #[tokio::test]
    async fn test_summary_uses_one_consistent_snapshot() {
        let source = MemorySource::new(vec![
            won_session(1, 7, 1, 1),
            won_session(2, 7, 2, 1),
            won_session(3, 7, 3, 2),
            won_session(4, 9, 4, 1), // other society
        ]);
        let service = StatsService::new(source);

        let summary = service.summary(7, &TimeWindow::unbounded()).await.unwrap();
        assert_eq!(summary.most_wins, BTreeMap::from([(1, 2), (2, 1)]));
        assert_eq!(summary.games_played, BTreeMap::from([(1, 3), (2, 3)]));
        assert_eq!(summary.win_ratios.get(&1), Some(&(2.0 / 3.0)));
        assert_eq!(summary.longest_win_streak, BTreeMap::from([(1, 2), (2, 1)]));
    }

    #[tokio::test]
    async fn test_unknown_society_yields_empty_summary() {
        let service = StatsService::new(MemorySource::new(vec![won_session(1, 7, 1, 1)]));
        let summary = service.summary(99, &TimeWindow::unbounded()).await.unwrap();
        assert!(summary.most_wins.is_empty());
        assert!(summary.games_played.is_empty());
        assert!(summary.win_ratios.is_empty());
    }

    #[tokio::test]
    async fn test_available_periods_gating() {
        let service = StatsService::new(MemorySource::new(vec![
            won_session(1, 7, 1, 1),
            won_session(2, 7, 15, 2),
        ]));

        let top = service.available_periods(7, None, None).await.unwrap();
        assert_eq!(top.years.len(), 1);
        assert!(top.months.is_empty());
        assert!(top.weeks.is_empty());
        assert!(top.days.is_empty());

        let drilled = service
            .available_periods(7, Some(2024), Some(1))
            .await
            .unwrap();
        assert_eq!(drilled.months.len(), 1);
        assert_eq!(drilled.weeks.len(), 2);
        assert_eq!(drilled.days.len(), 2);
    }
}
